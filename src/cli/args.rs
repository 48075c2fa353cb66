//! Defines the command-line arguments and subcommands for the Kumi CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "kumi",
    version,
    about = "Run bundled parser-combinator grammars over text files."
)]
pub struct KumiArgs {
    /// Log every driver iteration and alternation trial to stderr.
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a file with a bundled grammar and print the produced values.
    Parse {
        /// Name of the grammar, as shown by `kumi list`.
        #[arg(required = true)]
        grammar: String,
        /// The path to the input file.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the values and context as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the bundled grammars with their descriptions.
    List,
}
