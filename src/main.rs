use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use tyscript::types::{Slot, pretty};
use tyscript::{CheckError, Checked, check_source};

#[derive(Parser)]
#[command(name = "tyscript", about = "Type inference for a functional JavaScript subset")]
struct Cli {
    /// Log the inference pass (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Infer types for a file and report every type error
    Check {
        /// Path to the source file
        file: PathBuf,
        /// Print the type of every node, not only declared names
        #[arg(long)]
        all: bool,
    },
    /// Print the type of the innermost node at a position
    TypeAt {
        /// Path to the source file
        file: PathBuf,
        /// Line, as printed by `check`
        line: usize,
        /// Column, as printed by `check`
        column: usize,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load(file: &Path) -> anyhow::Result<Option<Checked>> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;

    match check_source(&source) {
        Ok(checked) => Ok(Some(checked)),
        Err(CheckError::Parse(errors)) => {
            for error in &errors {
                eprintln!("{error}");
            }
            Ok(None)
        }
        Err(CheckError::Engine(error)) => {
            eprintln!("{}", error.report());
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

fn describe(slot: &Slot) -> String {
    let (line, column) = slot.position.start;
    match &slot.binding {
        Some(name) => format!("{line}:{column} {name}: {}", pretty(&slot.ty)),
        None => format!("{line}:{column} {}: {}", slot.kind, pretty(&slot.ty)),
    }
}

fn check(file: &Path, all: bool) -> anyhow::Result<ExitCode> {
    let Some(checked) = load(file)? else {
        return Ok(ExitCode::FAILURE);
    };

    for slot in checked.inference.entries() {
        if all || slot.binding.is_some() {
            println!("{}", describe(slot));
        }
    }

    let errors = checked.inference.type_errors();
    for error in &errors {
        eprintln!("{}", error.report());
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn type_at(file: &Path, line: usize, column: usize) -> anyhow::Result<ExitCode> {
    let Some(checked) = load(file)? else {
        return Ok(ExitCode::FAILURE);
    };

    match checked.inference.type_at(line, column) {
        Some(slot) => {
            println!("{}", describe(slot));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("no typed node at {line}:{column}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { file, all } => check(&file, all),
        Command::TypeAt { file, line, column } => type_at(&file, line, column),
    }
}
