//! The [`Parser`] handle shared by matchers, combinators and custom grammar
//! productions.

use std::fmt;
use std::rc::Rc;

use crate::state::ParseState;

type ParseFn = dyn Fn(ParseState) -> ParseState;

/// A cloneable parser: a static label plus a state transition.
///
/// Every parser, built in or hand-written, goes through [`Parser::parse`],
/// which passes failed states straight through and stamps the parser's label
/// as the state's diagnostic name.
#[derive(Clone)]
pub struct Parser {
    label: Rc<str>,
    run: Rc<ParseFn>,
}

impl Parser {
    /// Wraps a state transition into a parser.
    ///
    /// `run` only ever sees states without an error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kumi::prelude::*;
    ///
    /// // Doubles the integer on top of the stack.
    /// let double = Parser::new("double()", |mut state: ParseState| match state.pop_last() {
    ///     Some(Value::Int(n)) => {
    ///         state.push(n * 2);
    ///         state
    ///     }
    ///     other => state.fail(ParseError::custom(format!("Expected int but got {:?}", other))),
    /// });
    /// let result = sequence_of([integer(), double]).run("21");
    /// assert_eq!(result.stack()[0], Value::Int(42));
    /// ```
    pub fn new(
        label: impl Into<String>,
        run: impl Fn(ParseState) -> ParseState + 'static,
    ) -> Self {
        let label: String = label.into();
        Self {
            label: Rc::from(label),
            run: Rc::new(run),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parse(&self, state: ParseState) -> ParseState {
        let mut next = if state.is_failed() {
            state
        } else {
            (self.run)(state)
        };
        next.set_name(Rc::clone(&self.label));
        next
    }

    /// Applies the parser to a fresh state over `input`.
    pub fn run(&self, input: &str) -> ParseState {
        self.parse(ParseState::new(input))
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parser").field(&self.label).finish()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Joins parser labels for composite labels such as `sequence_of(a, b)`.
pub(crate) fn join_labels(parsers: &[Parser]) -> String {
    parsers
        .iter()
        .map(Parser::label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseError;

    #[test]
    fn failed_state_passes_through() {
        let calls = Rc::new(std::cell::Cell::new(0));
        let counter = Rc::clone(&calls);
        let parser = Parser::new("count()", move |state| {
            counter.set(counter.get() + 1);
            state.advance(1)
        });
        let failed = ParseState::new("abc").fail(ParseError::custom("boom"));
        let result = parser.parse(failed);
        assert_eq!(calls.get(), 0);
        assert_eq!(result.cursor(), 0);
        assert_eq!(result.name(), "count()");
        assert_eq!(result.error(), Some(&ParseError::custom("boom")));
    }

    #[test]
    fn label_is_stamped_on_success() {
        let parser = Parser::new("skip()", |state: ParseState| state.advance(1));
        let result = parser.run("ab");
        assert_eq!(result.name(), "skip()");
        assert_eq!(result.cursor(), 1);
    }
}
