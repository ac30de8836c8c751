//! Purpose: Hold top-level CLI command dispatch for `dialogite`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Validation always precedes any on-disk write.
//! Invariants: Summaries report counts and absolute paths.

use std::io::Read;

use serde::Serialize;

use super::*;

#[derive(Debug, Serialize)]
struct AddSummary {
    parsed: u64,
    added: u64,
    duplicates: u64,
    total: u64,
    store_path: String,
}

#[derive(Debug, Serialize)]
struct ExportSummary {
    lines: u64,
    export_path: String,
}

pub(super) fn dispatch_command(command: Command, data_dir: PathBuf) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "dialogite", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_json(json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Add { text, file, json } => {
            let input = read_input_text(text, file)?;
            if input.trim().is_empty() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("no dialogue text supplied")
                    .with_hint(
                        "Pass lines inline, with -f/--file, or on stdin: dialogite add 'ask|ctx|answer'.",
                    ));
            }
            let batch = parse_batch(&input)?;

            ensure_data_dir(&data_dir)?;
            let store_path = data_dir.join(STORE_FILE_NAME);
            let mut store = Store::load_lenient(&store_path)?;
            let outcome = store.merge(&batch);
            store.save(&store_path)?;

            let summary = AddSummary {
                parsed: batch.len() as u64,
                added: outcome.added,
                duplicates: outcome.duplicates,
                total: store.len() as u64,
                store_path: absolute_display_path(&store_path),
            };
            if json {
                emit_json(summary_json(&summary)?);
            } else {
                emit_add_human(&summary);
            }
            Ok(RunOutcome::ok())
        }
        Command::Export { json } => {
            let store_path = data_dir.join(STORE_FILE_NAME);
            let export_path = data_dir.join(EXPORT_FILE_NAME);

            let store = Store::load_strict(&store_path)?;
            let lines = render_lines(&store)?;
            write_lines(&lines, &export_path)?;

            let summary = ExportSummary {
                lines: lines.len() as u64,
                export_path: absolute_display_path(&export_path),
            };
            if json {
                emit_json(summary_json(&summary)?);
            } else {
                emit_export_human(&summary);
            }
            Ok(RunOutcome::ok())
        }
    }
}

fn summary_json(summary: &impl Serialize) -> Result<Value, Error> {
    serde_json::to_value(summary).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode summary")
            .with_source(err)
    })
}

fn emit_add_human(summary: &AddSummary) {
    let duplicates = if summary.duplicates > 0 {
        format!(" ({} duplicate(s) skipped)", summary.duplicates)
    } else {
        String::new()
    };
    println!(
        "Added {} of {} parsed record(s){duplicates}.",
        summary.added, summary.parsed
    );
    println!("store: {} ({} record(s) total)", summary.store_path, summary.total);
}

fn emit_export_human(summary: &ExportSummary) {
    println!("Exported {} line(s).", summary.lines);
    println!("file: {}", summary.export_path);
}

fn read_input_text(text: Option<String>, file: Option<String>) -> Result<String, Error> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(file) = file {
        if file == "-" {
            return read_stdin_text();
        }
        return std::fs::read_to_string(&file).map_err(|err| {
            let kind = match err.kind() {
                io::ErrorKind::NotFound => ErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => ErrorKind::Permission,
                _ => ErrorKind::Io,
            };
            Error::new(kind)
                .with_message("failed to read input file")
                .with_path(file)
                .with_source(err)
        });
    }
    if io::stdin().is_terminal() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("no dialogue text supplied")
            .with_hint(
                "Pass lines inline, with -f/--file, or on stdin: dialogite add 'ask|ctx|answer'.",
            ));
    }
    read_stdin_text()
}

fn read_stdin_text() -> Result<String, Error> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(buffer)
}

fn ensure_data_dir(data_dir: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(data_dir).map_err(|err| {
        let kind = match err.kind() {
            io::ErrorKind::PermissionDenied => ErrorKind::Permission,
            _ => ErrorKind::Io,
        };
        Error::new(kind)
            .with_message("failed to create data directory")
            .with_path(data_dir)
            .with_source(err)
    })
}
