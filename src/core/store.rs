//! Purpose: Load, merge, and save the JSON-backed dialogue store.
//! Exports: `Store`, `MergeOutcome`, `STORE_FILE_NAME`, `EXPORT_FILE_NAME`.
//! Role: Persistence layer; the store file is the program's only durable state.
//! Invariants: Existing entries keep their order and key order across a rewrite.
//! Invariants: Merge deduplicates new records against pre-merge contents only.
//! Invariants: Saves rewrite the file whole; there are no partial writes.
use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::record::{Record, canonical_signature};

pub const STORE_FILE_NAME: &str = "dialogue_data.json";
pub const EXPORT_FILE_NAME: &str = "dialogue_data.txt";

/// The persisted record collection. Entries are raw JSON values because the
/// file is hand-editable; shape checks happen on export, not on load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    entries: Vec<Value>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MergeOutcome {
    pub added: u64,
    pub duplicates: u64,
}

impl Store {
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forward-direction load: an absent file, malformed JSON, or a non-array
    /// document all recover as an empty store. Read failures other than
    /// NotFound are real errors.
    pub fn load_lenient(path: &Path) -> Result<Self, Error> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "store absent, starting empty");
                return Ok(Self::default());
            }
            Err(err) => return Err(read_error(err, path)),
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => Ok(Self { entries }),
            Ok(_) => {
                debug!(path = %path.display(), "store is not a JSON array, starting empty");
                Ok(Self::default())
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "store unreadable, starting empty");
                Ok(Self::default())
            }
        }
    }

    /// Reverse-direction load: absent and malformed stores are fatal.
    pub fn load_strict(path: &Path) -> Result<Self, Error> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::new(ErrorKind::NotFound)
                    .with_message("store file not found")
                    .with_path(path)
                    .with_hint("Run `dialogite add` first to create the store."));
            }
            Err(err) => return Err(read_error(err, path)),
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => Ok(Self { entries }),
            Ok(_) => Err(Error::new(ErrorKind::Corrupt)
                .with_message("store is not a JSON array")
                .with_path(path)),
            Err(err) => Err(Error::new(ErrorKind::Corrupt)
                .with_message("store contains malformed JSON")
                .with_path(path)
                .with_source(err)),
        }
    }

    /// Append new records, keeping only those whose canonical signature is
    /// absent from the pre-merge contents. Duplicates within `batch` are not
    /// checked against each other (matches the original tool's behavior).
    pub fn merge(&mut self, batch: &[Record]) -> MergeOutcome {
        let seen: std::collections::HashSet<String> = self
            .entries
            .iter()
            .map(canonical_signature)
            .collect();

        let mut outcome = MergeOutcome::default();
        for record in batch {
            let value = record.to_value();
            if seen.contains(&canonical_signature(&value)) {
                outcome.duplicates += 1;
                continue;
            }
            self.entries.push(value);
            outcome.added += 1;
        }
        debug!(
            added = outcome.added,
            duplicates = outcome.duplicates,
            total = self.entries.len(),
            "merged batch into store"
        );
        outcome
    }

    /// Rewrite the store file whole: pretty-printed JSON array, two-space
    /// indent, per-entry key order preserved, non-ASCII left unescaped.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let body = serde_json::to_string_pretty(&Value::Array(self.entries.clone()))
            .map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode store")
                    .with_source(err)
            })?;
        std::fs::write(path, body).map_err(|err| write_error(err, path))?;
        debug!(path = %path.display(), entries = self.entries.len(), "store saved");
        Ok(())
    }
}

fn read_error(err: io::Error, path: &Path) -> Error {
    let kind = match err.kind() {
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    };
    Error::new(kind)
        .with_message("failed to read store file")
        .with_path(path)
        .with_source(err)
}

fn write_error(err: io::Error, path: &Path) -> Error {
    let kind = match err.kind() {
        io::ErrorKind::PermissionDenied => ErrorKind::Permission,
        _ => ErrorKind::Io,
    };
    Error::new(kind)
        .with_message("failed to write file")
        .with_path(path)
        .with_source(err)
}
