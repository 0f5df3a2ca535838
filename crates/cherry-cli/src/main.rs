use std::path::{Path, PathBuf};
use std::process;

use cherry_core::{Diagnostic, Entry, List, ParseOutcome, ValueKind};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// Cherry configuration language CLI
///
/// Check, inspect, query and format Cherry files.
#[derive(Parser)]
#[command(name = "cherry", version, about, long_about = None)]
struct Cli {
    /// Log parser activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a Cherry file for lexical, syntax and semantic errors
    Check {
        /// Path to .cherry file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed document, even if parsing stopped early
    Dump {
        /// Path to .cherry file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a file in canonical form
    Fmt {
        /// Path to .cherry file
        file: PathBuf,
    },

    /// Read one entry (or list) from a section
    Get {
        /// Path to .cherry file
        file: PathBuf,
        /// Section name
        section: String,
        /// Entry or list name
        key: String,
        /// Coerce the value before printing
        #[arg(long = "as", value_enum)]
        read_as: Option<ReadAs>,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReadAs {
    String,
    Bool,
    /// Any number literal, printed as f64
    Number,
    I64,
    U64,
    F64,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check { file, json } => cmd_check(&file, json),
        Commands::Dump { file, json } => cmd_dump(&file, json),
        Commands::Fmt { file } => cmd_fmt(&file),
        Commands::Get {
            file,
            section,
            key,
            read_as,
        } => cmd_get(&file, &section, &key, read_as),
        Commands::Version => {
            println!(
                "cherry {} (cherry-core {})",
                env!("CARGO_PKG_VERSION"),
                cherry_core::VERSION
            );
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Helpers ───────────────────────────────────────────────

/// Read and parse a file; `Err` carries the exit code for an I/O failure
fn load(file: &Path) -> Result<ParseOutcome, i32> {
    match std::fs::read_to_string(file) {
        Ok(source) => {
            tracing::debug!(file = %file.display(), bytes = source.len(), "loaded");
            Ok(cherry_core::parse(&source))
        }
        Err(e) => {
            eprintln!("{} cannot read {}: {}", "error:".red().bold(), file.display(), e);
            Err(2)
        }
    }
}

fn report(file: &Path, diagnostic: &Diagnostic) {
    eprintln!(
        "{} {}: {}",
        "error:".red().bold(),
        file.display(),
        diagnostic
    );
}

fn report_all(file: &Path, outcome: &ParseOutcome) {
    for d in outcome.diagnostics() {
        report(file, d);
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_check(file: &Path, json: bool) -> i32 {
    let outcome = match load(file) {
        Ok(o) => o,
        Err(code) => return code,
    };
    let valid = outcome.is_clean();

    if json {
        let diagnostics: Vec<&Diagnostic> = outcome.diagnostics().collect();
        let result = serde_json::json!({
            "file": file.display().to_string(),
            "valid": valid,
            "sections": outcome.document.len(),
            "diagnostics": diagnostics,
        });
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                return 2;
            }
        }
    } else if valid {
        println!(
            "{} {} is valid ({} sections)",
            "✓".green().bold(),
            file.display(),
            outcome.document.len()
        );
    } else {
        report_all(file, &outcome);
        println!(
            "{} {} has {} error(s)",
            "✗".red().bold(),
            file.display(),
            outcome.diagnostics().count()
        );
    }

    if valid {
        0
    } else {
        1
    }
}

fn cmd_dump(file: &Path, json: bool) -> i32 {
    let outcome = match load(file) {
        Ok(o) => o,
        Err(code) => return code,
    };
    report_all(file, &outcome);

    if json {
        match serde_json::to_string_pretty(&outcome.document) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                return 2;
            }
        }
    } else {
        print!("{}", outcome.document);
    }

    if outcome.is_clean() {
        0
    } else {
        1
    }
}

fn cmd_fmt(file: &Path) -> i32 {
    let outcome = match load(file) {
        Ok(o) => o,
        Err(code) => return code,
    };

    if !outcome.is_clean() {
        report_all(file, &outcome);
        return 1;
    }

    print!("{}", outcome.document);
    0
}

fn cmd_get(file: &Path, section: &str, key: &str, read_as: Option<ReadAs>) -> i32 {
    let outcome = match load(file) {
        Ok(o) => o,
        Err(code) => return code,
    };
    report_all(file, &outcome);

    let section = match outcome.document.section(section) {
        Some(s) => s,
        None => {
            eprintln!("{} no section `{}`", "error:".red().bold(), section);
            return 1;
        }
    };

    if let Some(entry) = section.entry(key) {
        return print_entry(file, entry, read_as);
    }
    if let Some(list) = section.list(key) {
        return print_list(file, list, read_as);
    }

    eprintln!(
        "{} no entry or list `{}` in section `{}`",
        "error:".red().bold(),
        key,
        section.id()
    );
    1
}

fn print_entry(file: &Path, entry: &Entry, read_as: Option<ReadAs>) -> i32 {
    let read_as = read_as.unwrap_or(match entry.kind() {
        ValueKind::Boolean => ReadAs::Bool,
        ValueKind::Number | ValueKind::String => ReadAs::String,
    });

    let (text, diagnostic) = match read_as {
        ReadAs::String => (entry.as_str().to_string(), None),
        ReadAs::Bool => stringify(entry.as_boolean().into_parts()),
        ReadAs::Number | ReadAs::F64 => stringify(entry.as_number::<f64>().into_parts()),
        ReadAs::I64 => stringify(entry.as_number::<i64>().into_parts()),
        ReadAs::U64 => stringify(entry.as_number::<u64>().into_parts()),
    };

    match diagnostic {
        Some(d) => {
            report(file, &d);
            1
        }
        None => {
            println!("{}", text);
            0
        }
    }
}

fn print_list(file: &Path, list: &List, read_as: Option<ReadAs>) -> i32 {
    let mut code = 0;
    for index in 0..list.len() {
        let (text, diagnostic) = match read_as.unwrap_or(ReadAs::String) {
            ReadAs::String => stringify(list.element_as_string(index).into_parts()),
            ReadAs::Bool => stringify(list.element_as_boolean(index).into_parts()),
            ReadAs::Number | ReadAs::F64 => {
                stringify(list.element_as_number::<f64>(index).into_parts())
            }
            ReadAs::I64 => stringify(list.element_as_number::<i64>(index).into_parts()),
            ReadAs::U64 => stringify(list.element_as_number::<u64>(index).into_parts()),
        };
        match diagnostic {
            Some(d) => {
                report(file, &d);
                code = 1;
            }
            None => println!("{}", text),
        }
    }
    code
}

fn stringify<T: ToString>((value, diagnostic): (T, Option<Diagnostic>)) -> (String, Option<Diagnostic>) {
    (value.to_string(), diagnostic)
}
