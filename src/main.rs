//! Purpose: `dialogite` CLI entry point and argument surface.
//! Role: Binary crate root; parses args, runs commands, prints summaries.
//! Invariants: Commands emit stable output (human by default, JSON with --json).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `core::error::to_exit_code`.
//! Invariants: All store mutations go through `core::store::Store`.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};

mod command_dispatch;
mod data_paths;

use data_paths::{absolute_display_path, default_data_dir};
use dialogite::core::error::{Error, ErrorKind, to_exit_code};
use dialogite::core::export::{render_lines, write_lines};
use dialogite::core::parse::parse_batch;
use dialogite::core::store::{EXPORT_FILE_NAME, STORE_FILE_NAME, Store};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `dialogite --help` for usage."));
            }
        },
    };

    let data_dir = cli.dir.unwrap_or_else(default_data_dir);
    command_dispatch::dispatch_command(cli.command, data_dir)
}

#[derive(Parser, Debug)]
#[command(
    name = "dialogite",
    version,
    about = "Convert pipe-delimited dialogue lines to and from a JSON record store",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Records have three fields: instruction, input, output.

Mental model:
  - `add` parses lines and merges them into the JSON store (write)
  - `export` reconstitutes the store as delimited text lines (read)
"#,
    after_help = r#"EXAMPLES
  $ dialogite add 'translate|hello|你好'
  $ dialogite add -f lines.txt
  $ cat lines.txt | dialogite add
  $ dialogite export

LEARN MORE
  Line formats accepted by `add`:
    instruction|input|output     three fields, exactly two pipes
    prompt||output               round-trip form (prompt may be instruction|input)

  $ dialogite <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        help = "Data directory for the store and export files (default: ~/.dialogite)",
        value_hint = ValueHint::DirPath
    )]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(
        about = "Parse dialogue lines and merge them into the JSON store",
        long_about = r#"Parse pipe-delimited dialogue lines and merge them into the store.

Each non-blank line becomes one record. New records that structurally match
an existing store entry are skipped."#,
        after_help = r#"EXAMPLES
  $ dialogite add 'translate|hello|你好'
  $ dialogite add 'greet||hello there'
  $ dialogite add -f lines.txt
  $ cat lines.txt | dialogite add

NOTES
  - Lines use instruction|input|output, or prompt||output for round-trip text
  - Fields are trimmed; blank lines are skipped
  - A malformed line aborts the whole batch; the store is never partially updated
  - Store location: <dir>/dialogue_data.json (see --dir)"#
    )]
    Add {
        #[arg(help = "Dialogue lines as a single argument (quote the whole block)")]
        text: Option<String>,
        #[arg(
            short = 'f',
            long = "file",
            help = "Read dialogue lines from a file (use - for stdin)",
            conflicts_with = "text",
            value_hint = ValueHint::FilePath
        )]
        file: Option<String>,
        #[arg(long, help = "Emit JSON instead of human-readable output")]
        json: bool,
    },
    #[command(
        about = "Reconstitute the store as delimited text lines",
        long_about = r#"Read the JSON store, validate every record, and write one
`prompt||output` line per record to the export file.

The export file is only written when every record validates."#,
        after_help = r#"EXAMPLES
  $ dialogite export
  $ dialogite export --json

NOTES
  - Records with instruction and input export as instruction|input||output
  - Fails with the record index when a record is invalid (missing or empty
    output, or instruction and input both empty)
  - Export location: <dir>/dialogue_data.txt (see --dir)"#
    )]
    Export {
        #[arg(long, help = "Emit JSON instead of human-readable output")]
        json: bool,
    },
    #[command(
        about = "Print version info as JSON",
        after_help = r#"EXAMPLES
  $ dialogite version"#
    )]
    Version,
    #[command(
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout."#,
        after_help = r#"EXAMPLES
  $ dialogite completion bash > ~/.local/share/bash-completion/completions/dialogite
  $ dialogite completion zsh > ~/.zfunc/_dialogite
  $ dialogite completion fish > ~/.config/fish/completions/dialogite.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

fn emit_error(err: &Error) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, true));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Corrupt => "corrupt data".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    use std::error::Error as StdError;
    let mut causes = Vec::new();
    let mut cur = StdError::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(line) = err.line() {
        inner.insert("line".to_string(), json!(line));
    }
    if let Some(index) = err.index() {
        inner.insert("record_index".to_string(), json!(index));
    }
    if let Some(record) = err.record() {
        inner.insert("record".to_string(), record.clone());
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(line) = err.line() {
        lines.push(format!(
            "{} {line}",
            colorize_label("line:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(index) = err.index() {
        lines.push(format!(
            "{} {index}",
            colorize_label("record:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(record) = err.record() {
        let pretty = serde_json::to_string_pretty(record)
            .unwrap_or_else(|_| record.to_string());
        lines.push(format!(
            "{}\n{pretty}",
            colorize_label("offending record:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
