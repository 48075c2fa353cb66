//! # Kumi
//!
//! A backtracking parser-combinator runtime. Parsers thread an owned
//! [`ParseState`] holding the input, a cursor, a stack of typed [`Value`]s and
//! a persistent context map. Grammars are trees of [`Parser`]s; records are
//! assembled from the stack against statically declared shapes.
//!
//! ```rust
//! use kumi::prelude::*;
//!
//! let grammar = sequence_of([integer(), char('+'), integer()]);
//! let result = grammar.run("10+5");
//! assert!(!result.is_failed());
//! assert_eq!(result.stack().len(), 3);
//! ```

pub use crate::errors::{BranchFailure, ErrorCategory, ParseError, ParseReport};
pub use crate::parser::Parser;
pub use crate::state::{Context, ParseState};
pub use crate::value::{Keyword, Record, Value, ValueType};

pub mod cli;
pub mod combinators;
pub mod driver;
pub mod errors;
pub mod grammars;
pub mod keyword;
pub mod matchers;
pub mod parser;
pub mod record;
pub mod state;
pub mod value;

/// Everything a grammar author needs in scope.
pub mod prelude {
    pub use crate::combinators::{group, list, one_of, one_or_more, optional, repeat, sequence_of};
    pub use crate::driver::{parse_all, parse_state, parse_till_end};
    pub use crate::errors::{ErrorCategory, ParseError, ParseReport};
    pub use crate::keyword::{keyword, string_map, KeywordSet};
    pub use crate::matchers::{
        char, char_silent, float, integer, letter, line_end, literal, literal_silent, long,
        number, space, spaces, word, NumberKind,
    };
    pub use crate::parser::Parser;
    pub use crate::record::{to_record, FieldSpec, RecordShape};
    pub use crate::state::{Context, ParseState};
    pub use crate::value::{Keyword, Record, Value, ValueType};
}
