//! The Kumi Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::Path;
use std::{fs, process};

use clap::Parser as _;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::args::{Command, KumiArgs};
use crate::driver::parse_state;
use crate::grammars::{self, GRAMMARS};
use crate::state::ParseState;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = KumiArgs::parse();
    init_tracing(args.trace);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Parse {
            grammar,
            file,
            json,
        } => handle_parse(&grammar, &file, json),
        Command::List => output::print_grammars(GRAMMARS).into_diagnostic(),
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        process::exit(1);
    }
}

/// Installs a stderr subscriber; `--trace` overrides `RUST_LOG`.
fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("kumi=trace")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// Handles the `parse` subcommand.
fn handle_parse(name: &str, path: &Path, json: bool) -> Result<()> {
    let entry = grammars::find(name).ok_or_else(|| {
        let known: Vec<&str> = GRAMMARS.iter().map(|entry| entry.name).collect();
        miette::miette!(
            code = "kumi::cli::unknown_grammar",
            help = format!("available grammars: {}", known.join(", ")),
            "Unknown grammar '{}'",
            name
        )
    })?;
    let source = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    info!(grammar = entry.name, bytes = source.len(), "parsing");
    let terminal = parse_state(
        &entry.build(),
        ParseState::new(&source),
        &path.display().to_string(),
    )?;

    let parsed = output::ParseOutput::new(terminal.stack(), terminal.context());
    if json {
        output::print_json(&parsed).into_diagnostic()
    } else {
        output::print_values(&parsed).into_diagnostic()
    }
}
