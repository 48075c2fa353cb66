//! # Sample Grammars
//!
//! Complete grammars built only from the public combinator API, each paired
//! with the record shapes it assembles. The CLI looks grammars up by name.
//!
//! ## Registry Invariant
//! [`GRAMMARS`] is the single list of bundled grammars. Anything that needs a
//! grammar by name (the CLI, tests) goes through [`find`].

use crate::parser::Parser;

pub mod instructions;
pub mod strategy;
pub mod terminal;
pub mod troop;

/// A named grammar constructor.
#[derive(Debug, Clone, Copy)]
pub struct GrammarEntry {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Parser,
}

impl GrammarEntry {
    /// Builds a fresh parser tree for this grammar.
    pub fn build(&self) -> Parser {
        (self.build)()
    }
}

pub static GRAMMARS: &[GrammarEntry] = &[
    GrammarEntry {
        name: "strategy",
        description: "rounds of `<A|B|C> <X|Y|Z>` as Round records of two moves",
        build: strategy::grammar,
    },
    GrammarEntry {
        name: "strategy-outcome",
        description: "rounds of `<A|B|C> <X|Y|Z>` where the second column is the desired outcome",
        build: strategy::outcome_grammar,
    },
    GrammarEntry {
        name: "instructions",
        description: "`noop` / `addx <n>` lines as Instruction records",
        build: instructions::grammar,
    },
    GrammarEntry {
        name: "terminal",
        description: "a `$ cd` / `$ ls` transcript, collected into a directory map in context",
        build: terminal::grammar,
    },
    GrammarEntry {
        name: "troop",
        description: "multi-line monkey blocks as nested Monkey records",
        build: troop::grammar,
    },
];

/// Looks up a bundled grammar by name.
pub fn find(name: &str) -> Option<&'static GrammarEntry> {
    GRAMMARS.iter().find(|entry| entry.name == name)
}
