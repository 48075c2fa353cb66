//! Handles all user-facing output for the CLI.
//!
//! Colored, human-readable listings go through `termcolor`; machine-readable
//! output through `serde_json`. Diagnostics are rendered by `miette` in
//! [`crate::cli`], not here.

use std::collections::BTreeMap;
use std::io::{self, Write};

use im::Vector;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::grammars::GrammarEntry;
use crate::state::Context;
use crate::value::Value;

// ============================================================================
// JSON OUTPUT
// ============================================================================

/// Everything a parse produced, in a stable order.
#[derive(Debug, Serialize)]
pub struct ParseOutput<'a> {
    pub values: Vec<&'a Value>,
    pub context: BTreeMap<&'a str, &'a Value>,
}

impl<'a> ParseOutput<'a> {
    pub fn new(values: &'a Vector<Value>, context: &'a Context) -> Self {
        Self {
            values: values.iter().collect(),
            context: context
                .iter()
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
        }
    }
}

pub fn print_json(output: &ParseOutput<'_>) -> serde_json::Result<()> {
    let text = serde_json::to_string_pretty(output)?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// HUMAN-READABLE OUTPUT
// ============================================================================

/// Prints one value per line, followed by the context entries sorted by key.
pub fn print_values(output: &ParseOutput<'_>) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for (index, value) in output.values.iter().enumerate() {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(stdout, "{:>4}", index)?;
        stdout.reset()?;
        writeln!(stdout, "  {}", value)?;
    }
    for (key, value) in &output.context {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(stdout, "{}", key)?;
        stdout.reset()?;
        writeln!(stdout, " = {}", value)?;
    }
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(
        stdout,
        "parsed {} value(s), {} context entr{}",
        output.values.len(),
        output.context.len(),
        if output.context.len() == 1 { "y" } else { "ies" }
    )?;
    stdout.reset()
}

pub fn print_grammars(grammars: &[GrammarEntry]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let width = grammars.iter().map(|entry| entry.name.len()).max().unwrap_or(0);
    for entry in grammars {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(stdout, "{:<width$}", entry.name, width = width)?;
        stdout.reset()?;
        writeln!(stdout, "  {}", entry.description)?;
    }
    Ok(())
}
