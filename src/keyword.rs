//! # Keyword Mapping
//!
//! Recognises a closed set of tokens and replaces the matched token with a
//! mapped value. [`string_map`] maps to arbitrary values; [`keyword`] maps to
//! the variants of a [`KeywordSet`] enumeration.

use std::collections::HashMap;

use crate::combinators::one_of;
use crate::errors::ParseError;
use crate::matchers::literal;
use crate::parser::Parser;
use crate::state::ParseState;
use crate::value::{Keyword, Value};

/// Matches exactly one of the table's keys and pushes its mapped value.
///
/// On failure the error lists the mismatch of every key that was tried.
///
/// Example:
///   string_map([("a", Value::Int(1)), ("b", Value::Int(2))]) on "b" ; => stack [2]
pub fn string_map<K: Into<String>>(table: impl IntoIterator<Item = (K, Value)>) -> Parser {
    let table: Vec<(String, Value)> = table.into_iter().map(|(k, v)| (k.into(), v)).collect();
    let keys: Vec<String> = table.iter().map(|(key, _)| key.clone()).collect();
    let alternatives = one_of(keys.iter().map(|key| literal(key)));
    let lookup: HashMap<String, Value> = table.into_iter().collect();
    let label = format!("string_map({})", keys.join(", "));
    Parser::new(label, move |state: ParseState| {
        let mut next = alternatives.parse(state);
        if next.is_failed() {
            return next;
        }
        let mapped = match next.pop_last() {
            Some(Value::Str(key)) => lookup.get(&key).cloned().ok_or(key),
            other => Err(other.map(|v| v.to_string()).unwrap_or_default()),
        };
        match mapped {
            Ok(value) => {
                next.push(value);
                next
            }
            Err(key) => next.fail(ParseError::custom(format!(
                "Expected map to contain key {}",
                key
            ))),
        }
    })
}

/// A closed enumeration recognised from text.
///
/// Implementors list their `(token, variant)` pairs explicitly; one variant
/// may have several tokens.
///
/// # Example
///
/// ```rust
/// use kumi::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Op {
///     Add,
///     Mul,
/// }
///
/// impl KeywordSet for Op {
///     const FAMILY: &'static str = "Op";
///
///     fn table() -> Vec<(&'static str, Self)> {
///         vec![("+", Op::Add), ("*", Op::Mul)]
///     }
///
///     fn name(self) -> &'static str {
///         match self {
///             Op::Add => "Add",
///             Op::Mul => "Mul",
///         }
///     }
/// }
///
/// let result = keyword::<Op>().run("*");
/// assert_eq!(Op::from_value(&result.stack()[0]), Some(Op::Mul));
/// ```
pub trait KeywordSet: Sized + Copy + 'static {
    /// Family name, used as the keyword's type tag.
    const FAMILY: &'static str;

    fn table() -> Vec<(&'static str, Self)>;

    /// Variant name, unique within the family.
    fn name(self) -> &'static str;

    fn keyword(self) -> Keyword {
        Keyword {
            family: Self::FAMILY,
            name: self.name(),
        }
    }

    fn from_keyword(keyword: Keyword) -> Option<Self> {
        if keyword.family != Self::FAMILY {
            return None;
        }
        Self::table()
            .into_iter()
            .map(|(_, variant)| variant)
            .find(|variant| variant.name() == keyword.name)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_keyword().and_then(Self::from_keyword)
    }
}

/// Matches one token of `K` and pushes the variant as a [`Value::Keyword`].
pub fn keyword<K: KeywordSet>() -> Parser {
    let inner = string_map(
        K::table()
            .into_iter()
            .map(|(token, variant)| (token, Value::Keyword(variant.keyword()))),
    );
    let label = format!("keyword({})", K::FAMILY);
    Parser::new(label, move |state: ParseState| inner.parse(state))
}
