//! # Combinators
//!
//! Higher-order parsers composing other parsers: sequencing, alternation,
//! optionality, grouping and repetition.
//!
//! ## Failure discipline
//!
//! - Every combinator passes a failed state through unchanged.
//! - [`optional`] is the only recovery point: it discards a failure and rolls
//!   back to the state it started from.
//! - [`one_or_more`] demotes the failure that stopped it to a warning.

use tracing::{debug, trace};

use crate::errors::{BranchFailure, ParseError};
use crate::parser::{join_labels, Parser};
use crate::state::ParseState;
use crate::value::Value;

/// Applies each parser in order over the same evolving state, stopping at the
/// first failure.
///
/// Example:
///   sequence_of([integer(), char('+'), integer()]) on "1+2" ; => stack [1, '+', 2]
pub fn sequence_of(parsers: impl IntoIterator<Item = Parser>) -> Parser {
    let parsers: Vec<Parser> = parsers.into_iter().collect();
    let label = format!("sequence_of({})", join_labels(&parsers));
    Parser::new(label, move |state: ParseState| {
        let mut current = state;
        for parser in &parsers {
            current = parser.parse(current);
            if current.is_failed() {
                break;
            }
        }
        current
    })
}

/// Runs every alternative against its own snapshot of the starting state and
/// requires exactly one of them to succeed.
///
/// Zero successes fail with [`ParseError::Exhausted`], listing every branch
/// failure; several fail with [`ParseError::Ambiguous`]. The winning branch's
/// state, stack and context included, becomes the continuation.
pub fn one_of(parsers: impl IntoIterator<Item = Parser>) -> Parser {
    let parsers: Vec<Parser> = parsers.into_iter().collect();
    let label = format!("one_of({})", join_labels(&parsers));
    Parser::new(label, move |state: ParseState| {
        let mut passed = Vec::new();
        let mut failures = Vec::new();
        for parser in &parsers {
            let trial = parser.parse(state.snapshot());
            trace!(
                branch = parser.label(),
                cursor = state.cursor(),
                ok = !trial.is_failed(),
                "alternation trial"
            );
            match trial.error() {
                Some(error) => failures.push(BranchFailure {
                    label: trial.name().to_string(),
                    error: error.clone(),
                }),
                None => passed.push(trial),
            }
        }

        match passed.len() {
            1 => passed.remove(0),
            0 => {
                debug!(cursor = state.cursor(), branches = failures.len(), "alternation exhausted");
                state.fail(ParseError::Exhausted { failures })
            }
            _ => {
                let branches: Vec<String> =
                    passed.iter().map(|trial| trial.name().to_string()).collect();
                debug!(cursor = state.cursor(), ?branches, "alternation ambiguous");
                state.fail(ParseError::Ambiguous { branches })
            }
        }
    })
}

/// Runs `parser`; on failure, rolls back to the starting state as if nothing
/// had been attempted.
pub fn optional(parser: Parser) -> Parser {
    let label = format!("optional({})", parser.label());
    Parser::new(label, move |state: ParseState| {
        let attempt = parser.parse(state.snapshot());
        if attempt.is_failed() {
            state
        } else {
            attempt
        }
    })
}

/// Wraps the values `parser` pushed into a single list value.
///
/// Pushes nothing if `parser` pushed nothing. Only net stack growth is
/// wrapped: a value `parser` pops and replaces with another stays where it
/// is, unwrapped.
pub fn group(parser: Parser) -> Parser {
    let label = format!("group({})", parser.label());
    Parser::new(label, move |state: ParseState| collect(&parser, state, false))
}

/// Like [`group`], but always pushes a list, empty if `parser` pushed nothing.
/// Like `group`, only net stack growth is wrapped.
pub fn list(parser: Parser) -> Parser {
    let label = format!("list({})", parser.label());
    Parser::new(label, move |state: ParseState| collect(&parser, state, true))
}

fn collect(parser: &Parser, state: ParseState, keep_empty: bool) -> ParseState {
    let depth = state.stack().len();
    let mut next = parser.parse(state);
    if next.is_failed() {
        return next;
    }
    let added = next.stack().len().saturating_sub(depth);
    if added > 0 || keep_empty {
        let items = next.slice_last(added).unwrap_or_default();
        next.push(Value::List(items));
    }
    next
}

/// Applies `parser` exactly `times` times in sequence.
pub fn repeat(times: usize, parser: Parser) -> Parser {
    let label = format!("repeat({}, {})", times, parser.label());
    Parser::new(label, move |state: ParseState| {
        let mut current = state;
        for _ in 0..times {
            current = parser.parse(current);
            if current.is_failed() {
                break;
            }
        }
        current
    })
}

/// Applies `parser` until it fails or the input is exhausted.
///
/// Returns the state after the last successful application and records the
/// failure that stopped the loop as a warning. Zero successful applications
/// still succeed. An application that succeeds without consuming input also
/// ends the loop.
pub fn one_or_more(parser: Parser) -> Parser {
    let label = format!("one_or_more({})", parser.label());
    Parser::new(label, move |state: ParseState| {
        let mut previous = state.snapshot();
        let mut current = state;
        let mut repetitions = 0usize;
        while !current.is_failed() && !current.is_done() {
            let attempt = parser.parse(current.snapshot());
            let stalled = !attempt.is_failed() && ParseState::same_position(&attempt, &current);
            previous = std::mem::replace(&mut current, attempt);
            if stalled {
                break;
            }
            if !current.is_failed() {
                repetitions += 1;
            }
        }

        match current.error().cloned() {
            Some(stop) => {
                debug!(
                    repetitions,
                    cursor = previous.cursor(),
                    reason = %stop,
                    "repetition stopped"
                );
                previous.set_warning(stop);
                previous
            }
            None => current,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{char, integer, letter, space};

    #[test]
    fn sequence_stops_at_first_failure() {
        let result = sequence_of([letter(), space(), char('+')]).run("a  +");
        assert_eq!(result.error().unwrap().to_string(), "Expected '+' but received ' '");
        assert_eq!(result.stack().len(), 1);
    }

    #[test]
    fn one_of_picks_single_winner() {
        let grammar = one_of([space(), letter()]);
        let result = grammar.run("a");
        assert!(!result.is_failed());
        assert_eq!(result.stack()[0], Value::Char('a'));
        assert_eq!(result.name(), "one_of(space(), letter())");
    }

    #[test]
    fn one_of_rejects_two_winners() {
        let result = one_of([letter(), letter()]).run("a");
        assert_eq!(
            result.error().unwrap().to_string(),
            "Expected only one parser to match but received: letter(), letter()"
        );
        assert!(result.stack().is_empty());
    }

    #[test]
    fn optional_rolls_back() {
        let grammar = sequence_of([integer(), optional(sequence_of([char(','), integer()]))]);
        let result = grammar.run("1,x");
        assert!(!result.is_failed());
        assert_eq!(result.cursor(), 1);
        assert_eq!(result.stack().len(), 1);
    }

    #[test]
    fn group_skips_empty_list_but_list_keeps_it() {
        let silent = crate::matchers::char_silent('-');
        assert!(group(silent.clone()).run("-").stack().is_empty());
        assert_eq!(list(silent).run("-").stack()[0], Value::List(vec![]));
    }

    #[test]
    fn group_wraps_net_growth_only() {
        let replace = Parser::new("replace", |mut state: ParseState| {
            state.pop_last();
            state.push(Value::Int(7));
            state
        });
        let result = sequence_of([integer(), group(replace.clone())]).run("5");
        assert_eq!(result.stack().iter().cloned().collect::<Vec<_>>(), vec![Value::Int(7)]);

        let result = sequence_of([integer(), list(replace)]).run("5");
        assert_eq!(
            result.stack().iter().cloned().collect::<Vec<_>>(),
            vec![Value::Int(7), Value::List(vec![])]
        );
    }

    #[test]
    fn repeat_exact_count() {
        let result = repeat(2, letter()).run("abc");
        assert_eq!(result.cursor(), 2);
        assert!(repeat(4, letter()).run("abc").is_failed());
    }

    #[test]
    fn one_or_more_warns_on_stop() {
        let result = one_or_more(sequence_of([integer(), space()])).run("10 15 20  ");
        assert!(!result.is_failed());
        assert_eq!(
            result.stack().iter().cloned().collect::<Vec<_>>(),
            vec![Value::Int(10), Value::Int(15), Value::Int(20)]
        );
        assert_eq!(
            result.warning().unwrap().to_string(),
            "Expected number but got ' '"
        );
    }

    #[test]
    fn one_or_more_allows_zero_repetitions() {
        let result = one_or_more(letter()).run("1");
        assert!(!result.is_failed());
        assert_eq!(result.cursor(), 0);
        assert!(result.warning().is_some());
    }

    #[test]
    fn one_or_more_stops_on_stall() {
        let result = one_or_more(optional(letter())).run("ab1");
        assert!(!result.is_failed());
        assert_eq!(result.cursor(), 2);
    }
}
