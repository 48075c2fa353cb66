//! # Driver
//!
//! Applies a grammar across a whole input and converts the terminal state
//! into a conventional `Result` at the public boundary.

use im::Vector;
use tracing::{debug, trace};

use crate::errors::{ParseError, ParseReport};
use crate::parser::Parser;
use crate::state::ParseState;
use crate::value::Value;

/// Applies `parser` repeatedly until the input is consumed.
///
/// Stops at the first error. An iteration that leaves the cursor where it was
/// fails with [`ParseError::NoProgress`], carrying the pending warning. A
/// residual warning is cleared when the whole input was consumed.
///
/// Example:
///   parse_till_end(sequence_of([integer(), optional(space())])) on "1 2 3"
///   ; => stack [1, 2, 3]
pub fn parse_till_end(parser: Parser) -> Parser {
    let label = format!("parse_till_end({})", parser.label());
    Parser::new(label, move |state: ParseState| {
        let mut current = state;
        let mut iteration = 0usize;
        while !current.is_done() {
            let before = current.cursor();
            current = parser.parse(current);
            iteration += 1;
            trace!(
                iteration,
                from = before,
                to = current.cursor(),
                ok = !current.is_failed(),
                "driver iteration"
            );
            if current.is_failed() {
                return current;
            }
            if current.cursor() == before {
                let warning = current.warning().cloned().map(Box::new);
                debug!(iteration, cursor = before, "driver made no progress");
                return current.fail(ParseError::NoProgress { warning });
            }
        }
        current.clear_warning();
        current
    })
}

/// Runs `grammar` over `input`, returning the produced values or a report
/// pointing at the failure.
///
/// `source_name` names the input in the rendered diagnostic.
pub fn parse_all(
    grammar: &Parser,
    input: &str,
    source_name: &str,
) -> Result<Vector<Value>, ParseReport> {
    parse_state(grammar, ParseState::new(input), source_name).map(ParseState::into_stack)
}

/// Like [`parse_all`], but starts from a prepared state and returns the whole
/// terminal state, so callers can read the context.
pub fn parse_state(
    grammar: &Parser,
    state: ParseState,
    source_name: &str,
) -> Result<ParseState, ParseReport> {
    let terminal = grammar.parse(state);
    match ParseReport::from_state(&terminal, source_name) {
        Some(report) => Err(report),
        None => Ok(terminal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{optional, sequence_of};
    use crate::matchers::{char, integer, space};

    #[test]
    fn consumes_whole_input() {
        let grammar = parse_till_end(sequence_of([integer(), optional(space())]));
        let values = parse_all(&grammar, "1 2 3", "numbers").unwrap();
        assert_eq!(values, Vector::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn fails_on_stall() {
        let grammar = parse_till_end(optional(integer()));
        let result = grammar.run("1x");
        assert_eq!(
            result.error(),
            Some(&ParseError::NoProgress { warning: None })
        );
        assert_eq!(result.stack().len(), 1);
    }

    #[test]
    fn empty_input_is_trivially_done() {
        let result = parse_till_end(integer()).run("");
        assert!(!result.is_failed());
        assert!(result.stack().is_empty());
    }

    #[test]
    fn report_points_at_failure() {
        let grammar = parse_till_end(sequence_of([integer(), space()]));
        let report = parse_all(&grammar, "1 2x\n", "numbers").unwrap_err();
        assert_eq!(report.error.to_string(), "Expected ' ' but received 'x'");
        assert_eq!(report.label, "parse_till_end(sequence_of(number(int), space()))");
        assert_eq!((report.offset, report.len), (3, 1));
    }

    #[test]
    fn report_offset_is_the_rejected_character() {
        let grammar = sequence_of([char('a'), char('b')]);
        let report = parse_all(&grammar, "ac", "letters").unwrap_err();
        assert_eq!((report.offset, report.len), (1, 1));

        let report = parse_all(&grammar, "é", "letters").unwrap_err();
        assert_eq!((report.offset, report.len), (0, 2));
    }
}
