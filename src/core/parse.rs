//! Purpose: Parse pipe-delimited dialogue text into records with line-accurate errors.
//! Exports: `parse_batch`, `REQUIRED_FIELDS`.
//! Role: Forward-conversion front end; isolates line format rules from the CLI.
//! Invariants: A batch parses fully or fails; no partial record list escapes.
//! Invariants: Reported line numbers are 1-based and count blank lines.
use crate::core::error::{Error, ErrorKind};
use crate::core::record::Record;

pub const REQUIRED_FIELDS: usize = 3;

/// Parse the whole input text. Blank lines (after trim) are skipped;
/// the first malformed line aborts the batch.
pub fn parse_batch(text: &str) -> Result<Vec<Record>, Error> {
    let mut records = Vec::new();
    for (offset, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = (offset + 1) as u64;
        records.push(parse_line(line, line_number)?);
    }
    Ok(records)
}

fn parse_line(line: &str, line_number: u64) -> Result<Record, Error> {
    if let Some((head, output)) = line.split_once("||") {
        // Round-trip form: head carries instruction and optional input.
        let (instruction, input) = match head.split_once('|') {
            Some((instruction, input)) => (instruction, input),
            None => (head, ""),
        };
        return Ok(Record::new(
            instruction.trim(),
            input.trim(),
            output.trim(),
        ));
    }

    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() != REQUIRED_FIELDS {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!(
                "expected {REQUIRED_FIELDS} pipe-delimited fields, found {}",
                parts.len()
            ))
            .with_line(line_number)
            .with_hint("Use instruction|input|output, or prompt||output for round-trip lines."));
    }
    Ok(Record::new(
        parts[0].trim(),
        parts[1].trim(),
        parts[2].trim(),
    ))
}
