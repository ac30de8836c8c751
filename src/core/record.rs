//! Purpose: Define the three-field dialogue record and its canonical signature.
//! Exports: `Record`, `canonical_signature`.
//! Role: Shared data model for the forward and reverse converters.
//! Invariants: Serialization emits keys in declared order (instruction, input, output).
//! Invariants: Canonical signatures are independent of on-disk key order.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One dialogue entry. Field declaration order is the on-disk key order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub instruction: String,
    pub input: String,
    pub output: String,
}

impl Record {
    pub fn new(
        instruction: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    /// Build the JSON object form directly, keeping key order without
    /// round-tripping through serde.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("instruction".to_string(), Value::from(self.instruction.clone()));
        map.insert("input".to_string(), Value::from(self.input.clone()));
        map.insert("output".to_string(), Value::from(self.output.clone()));
        Value::Object(map)
    }
}

/// Compact serialization with top-level keys sorted, used as the
/// structural-equality key during merge deduplication. Non-object values
/// serialize as-is so hand-edited store entries still get a stable key.
pub fn canonical_signature(value: &Value) -> String {
    let canonical = match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|left, right| left.0.cmp(right.0));
            let mut sorted = Map::new();
            for (key, entry) in entries {
                sorted.insert(key.clone(), entry.clone());
            }
            Value::Object(sorted)
        }
        other => other.clone(),
    };
    canonical.to_string()
}
