use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use otto_core::SyntaxError;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Otto pipeline language front end.
#[derive(Parser)]
#[command(name = "otto", version, about = "Otto pipeline language front end")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .otto file and emit its Orf document as JSON
    Parse {
        /// Path to the .otto source file
        file: PathBuf,
    },

    /// Parse a .otto file and report syntax errors without building
    Check {
        /// Path to the .otto source file
        file: PathBuf,
    },

    /// Validate a serialized Orf JSON document for downstream consumption
    Validate {
        /// Path to the Orf JSON file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Parse { file } => cmd_parse(&file, cli.output),
        Commands::Check { file } => cmd_check(&file, cli.output),
        Commands::Validate { file } => cmd_validate(&file),
    };
    process::exit(code);
}

fn read_source(path: &Path) -> Result<String, i32> {
    std::fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {}: {}", path.display(), e);
        2
    })
}

fn report_errors(path: &Path, errors: &[SyntaxError], output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            for error in errors {
                eprintln!("{}:{}", path.display(), error);
            }
        }
        OutputFormat::Json => {
            // Errors are data; emit the list itself, not a prose wrapper.
            match serde_json::to_string(errors) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("error: failed to serialize errors: {}", e),
            }
        }
    }
}

fn cmd_parse(file: &Path, output: OutputFormat) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let outcome = match otto_core::compile(&source) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: internal front-end failure: {}", e);
            return 2;
        }
    };

    if !outcome.errors.is_empty() {
        report_errors(file, &outcome.errors, output);
        return 1;
    }

    let rendered = match output {
        OutputFormat::Text => serde_json::to_string_pretty(&outcome.orf),
        OutputFormat::Json => serde_json::to_string(&outcome.orf),
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("error: failed to serialize document: {}", e);
            2
        }
    }
}

fn cmd_validate(file: &Path) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let value: serde_json::Value = match serde_json::from_str(&source) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("error: {} is not valid JSON: {}", file.display(), e);
            return 1;
        }
    };

    match otto_orf::from_orf(&value) {
        Ok(orf) => {
            println!(
                "{}: valid orf document (version {}, {} stages)",
                file.display(),
                orf.version(),
                orf.stages().len()
            );
            0
        }
        Err(e) => {
            eprintln!("error: {}: {}", file.display(), e);
            1
        }
    }
}

fn cmd_check(file: &Path, output: OutputFormat) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let outcome = otto_core::parse(&source);
    if outcome.errors.is_empty() {
        if output == OutputFormat::Text {
            println!("{}: ok", file.display());
        }
        0
    } else {
        report_errors(file, &outcome.errors, output);
        1
    }
}
