//! Purpose: Reconstitute store entries as pipe-delimited text lines.
//! Exports: `render_lines`, `write_lines`.
//! Role: Reverse-conversion engine; validates every entry before any output exists.
//! Invariants: Validation failures carry the 1-based entry index and the entry itself.
//! Invariants: The export file is written only after the whole store validates.
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::core::error::{Error, ErrorKind};
use crate::core::store::Store;

/// Render every store entry as `prompt_part||output`. The first invalid
/// entry aborts the whole export.
pub fn render_lines(store: &Store) -> Result<Vec<String>, Error> {
    let mut lines = Vec::with_capacity(store.len());
    for (offset, entry) in store.entries().iter().enumerate() {
        let index = (offset + 1) as u64;
        lines.push(render_entry(entry, index)?);
    }
    Ok(lines)
}

fn render_entry(entry: &Value, index: u64) -> Result<String, Error> {
    let object = entry.as_object().ok_or_else(|| {
        Error::new(ErrorKind::Corrupt)
            .with_message("store entry is not a JSON object")
            .with_index(index)
            .with_record(entry.clone())
    })?;
    if !object.contains_key("output") {
        return Err(Error::new(ErrorKind::Corrupt)
            .with_message("missing required field `output`")
            .with_index(index)
            .with_record(entry.clone()));
    }

    let instruction = coerce_text(object.get("instruction"));
    let input = coerce_text(object.get("input"));
    let output = coerce_text(object.get("output"));

    let prompt_part = if input.is_empty() {
        instruction
    } else if instruction.is_empty() {
        input
    } else {
        format!("{instruction}|{input}")
    };

    if prompt_part.is_empty() {
        return Err(Error::new(ErrorKind::Corrupt)
            .with_message("`instruction` and `input` must not both be empty")
            .with_index(index)
            .with_record(entry.clone()));
    }
    if output.is_empty() {
        return Err(Error::new(ErrorKind::Corrupt)
            .with_message("`output` must not be empty")
            .with_index(index)
            .with_record(entry.clone()));
    }

    Ok(format!("{prompt_part}||{output}"))
}

// Strings pass through, null and absent become empty, anything else keeps
// its compact JSON form. Always trimmed.
fn coerce_text(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    text.trim().to_string()
}

/// Write the rendered lines joined with `\n` (no trailing newline),
/// overwriting the export file.
pub fn write_lines(lines: &[String], path: &Path) -> Result<(), Error> {
    let body = lines.join("\n");
    std::fs::write(path, body).map_err(|err| {
        let kind = match err.kind() {
            io::ErrorKind::PermissionDenied => ErrorKind::Permission,
            _ => ErrorKind::Io,
        };
        Error::new(kind)
            .with_message("failed to write export file")
            .with_path(path)
            .with_source(err)
    })
}
