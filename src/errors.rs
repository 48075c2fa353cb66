//! Kumi Error Handling
//!
//! Parse failures are plain data carried on [`ParseState`](crate::state::ParseState);
//! nothing in the combinator runtime panics or returns early through `Result`.
//! The only place an error leaves the state is [`ParseReport`], built at the
//! public boundary (`parse_all`, the CLI) to render a `miette` diagnostic.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::matchers::NumberKind;
use crate::state::ParseState;
use crate::value::ValueType;

// ============================================================================
// ERROR TAXONOMY
// ============================================================================

/// Every way a parse can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A primitive matcher did not find its expected token.
    #[error("Expected {expected} but received '{found}'")]
    Mismatch { expected: String, found: String },

    /// A numeric matcher consumed no digits.
    #[error("Expected number but got '{found}'")]
    NotANumber { found: String },

    /// A digit run was consumed but does not fit the requested kind.
    #[error("Expected {kind} but '{text}' is not a valid {kind}")]
    InvalidNumber { text: String, kind: NumberKind },

    /// No alternative of an alternation matched.
    #[error("Expected only one parser to match but received none:{}", render_failures(.failures))]
    Exhausted { failures: Vec<BranchFailure> },

    /// More than one alternative of an alternation matched.
    #[error("Expected only one parser to match but received: {}", .branches.join(", "))]
    Ambiguous { branches: Vec<String> },

    /// The driver's cursor did not move between two iterations.
    #[error("Parser did not move between iterations (warning: {})", render_warning(.warning))]
    NoProgress { warning: Option<Box<ParseError>> },

    /// Fewer stack values than the record shape needs.
    #[error("Expected parser results to contain {expected} results but contained: {actual}")]
    Arity {
        shape: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A stack value does not carry the type its field declares.
    #[error("Expected field '{field}' of type {expected} but got: {found}")]
    FieldType {
        shape: &'static str,
        field: &'static str,
        expected: ValueType,
        found: ValueType,
    },

    /// Raised by hand-written parsers.
    #[error("{message}")]
    Custom { message: String },
}

/// One failed branch of an exhausted alternation.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchFailure {
    pub label: String,
    pub error: ParseError,
}

impl fmt::Display for BranchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.label)
    }
}

fn render_failures(failures: &[BranchFailure]) -> String {
    failures.iter().map(|failure| format!("\n{}", failure)).collect()
}

fn render_warning(warning: &Option<Box<ParseError>>) -> String {
    match warning {
        Some(warning) => warning.to_string(),
        None => "none".to_string(),
    }
}

/// Coarse classification of a [`ParseError`], used for diagnostic codes and
/// test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A primitive matcher rejected the input
    Match,
    /// An alternation had zero or several winners
    Alternation,
    /// The driver stopped making progress
    Progress,
    /// Record assembly failed
    Assembly,
    /// A hand-written parser rejected the input
    Grammar,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Match => "match",
            ErrorCategory::Alternation => "alternation",
            ErrorCategory::Progress => "progress",
            ErrorCategory::Assembly => "assembly",
            ErrorCategory::Grammar => "grammar",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ParseError {
    /// Convenience constructor for hand-written parsers.
    pub fn custom(message: impl Into<String>) -> Self {
        ParseError::Custom {
            message: message.into(),
        }
    }

    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Mismatch { .. } | Self::NotANumber { .. } | Self::InvalidNumber { .. } => {
                ErrorCategory::Match
            }
            Self::Exhausted { .. } | Self::Ambiguous { .. } => ErrorCategory::Alternation,
            Self::NoProgress { .. } => ErrorCategory::Progress,
            Self::Arity { .. } | Self::FieldType { .. } => ErrorCategory::Assembly,
            Self::Custom { .. } => ErrorCategory::Grammar,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::Mismatch { .. } => "mismatch",
            Self::NotANumber { .. } => "not_a_number",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::Exhausted { .. } => "exhausted",
            Self::Ambiguous { .. } => "ambiguous",
            Self::NoProgress { .. } => "no_progress",
            Self::Arity { .. } => "arity_mismatch",
            Self::FieldType { .. } => "type_mismatch",
            Self::Custom { .. } => "custom",
        }
    }

    /// Full diagnostic code, e.g. `kumi::alternation::exhausted`.
    pub fn code(&self) -> String {
        format!("kumi::{}::{}", self.category(), self.code_suffix())
    }

    fn help(&self) -> Option<String> {
        match self {
            Self::Ambiguous { .. } => {
                Some("alternatives of one_of must be mutually exclusive on this input".into())
            }
            Self::NoProgress { .. } => Some(
                "the grammar succeeded without consuming input; wrap a consuming parser around it"
                    .into(),
            ),
            Self::Arity { shape, .. } | Self::FieldType { shape, .. } => Some(format!(
                "check that the grammar pushes the fields of `{}` in declaration order",
                shape
            )),
            _ => None,
        }
    }
}

// ============================================================================
// REPORTING: ParseError + source, for miette rendering
// ============================================================================

/// A terminal parse failure paired with the input it happened in.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ParseReport {
    pub error: ParseError,
    /// Label of the parser that produced the failed state.
    pub label: String,
    /// Byte offset of the cursor when the failure surfaced.
    pub offset: usize,
    /// Width of the labelled span: one character, or zero at end of input.
    pub len: usize,
    pub input: Arc<NamedSource<String>>,
}

impl ParseReport {
    /// Builds a report from a failed state, or `None` if the state succeeded.
    pub fn from_state(state: &ParseState, source_name: &str) -> Option<Self> {
        let error = state.error()?.clone();
        Some(Self {
            error,
            label: state.name().to_string(),
            offset: state.byte_offset(),
            len: state.peek_char().map_or(0, char::len_utf8),
            input: Arc::new(NamedSource::new(source_name, state.input_text())),
        })
    }
}

impl Diagnostic for ParseReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.error.help() {
            Some(help) => format!("{} (while running {})", help, self.label),
            None => format!("while running {}", self.label),
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.input.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let text = match self.error.category() {
            ErrorCategory::Match => "unexpected input here",
            ErrorCategory::Alternation => "no single alternative matched here",
            ErrorCategory::Progress => "parsing stalled here",
            ErrorCategory::Assembly => "record assembled here",
            ErrorCategory::Grammar => "rejected here",
        };
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(text.to_string()),
            self.offset,
            self.len,
        ))))
    }
}
