// Scenario tests for the primitive matchers, combinators and driver, run
// through the public prelude only.

use kumi::prelude::*;
use pretty_assertions::assert_eq;

fn values(state: &ParseState) -> Vec<Value> {
    state.stack().iter().cloned().collect()
}

// ============================================================================
// LINE TERMINATORS
// ============================================================================

#[test]
fn line_end_accepts_lf() {
    let result = line_end().run("\n");
    assert!(!result.is_failed());
    assert_eq!(result.cursor(), 1);
    assert!(result.stack().is_empty());
}

#[test]
fn line_end_accepts_crlf() {
    let result = line_end().run("\r\n");
    assert!(!result.is_failed());
    assert_eq!(result.cursor(), 2);
}

#[test]
fn line_end_rejects_lone_cr() {
    let result = line_end().run("\r");
    assert_eq!(
        result.error().map(ToString::to_string).as_deref(),
        Some("Expected '\\n' but received 'null'")
    );
}

// ============================================================================
// SEQUENCES AND NUMBERS
// ============================================================================

#[test]
fn sequence_of_arithmetic() {
    let grammar = sequence_of([integer(), char('+'), integer(), char('+'), integer()]);
    let result = grammar.run("10+523+3");
    assert!(!result.is_failed());
    assert_eq!(
        values(&result),
        vec![
            Value::Int(10),
            Value::Char('+'),
            Value::Int(523),
            Value::Char('+'),
            Value::Int(3)
        ]
    );
}

#[test]
fn number_rejects_dot() {
    let result = integer().run(".");
    assert_eq!(
        result.error().map(ToString::to_string).as_deref(),
        Some("Expected number but got '.'")
    );
    assert_eq!(result.error().map(ParseError::category), Some(ErrorCategory::Match));
}

#[test]
fn failing_sequence_keeps_only_earlier_values() {
    let result = sequence_of([integer(), char('+'), integer()]).run("10+x");
    assert!(result.is_failed());
    assert_eq!(values(&result), vec![Value::Int(10), Value::Char('+')]);
}

// ============================================================================
// GROUPS AND REPETITION
// ============================================================================

#[test]
fn grouped_repetition() {
    let grammar = one_or_more(group(sequence_of([letter(), char('+'), letter()])));
    let result = grammar.run("a+bz+d");
    assert!(!result.is_failed());
    assert!(result.is_done());
    assert_eq!(
        values(&result),
        vec![
            Value::List(vec![Value::Char('a'), Value::Char('+'), Value::Char('b')]),
            Value::List(vec![Value::Char('z'), Value::Char('+'), Value::Char('d')]),
        ]
    );
}

#[test]
fn list_of_separated_items() {
    let item = sequence_of([integer(), optional(sequence_of([char_silent(','), space()]))]);
    let result = sequence_of([list(one_or_more(item)), line_end()]).run("1, 2, 3\n");
    assert!(!result.is_failed());
    assert_eq!(
        values(&result),
        vec![Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])]
    );
}

// ============================================================================
// ALTERNATION
// ============================================================================

#[test]
fn exhausted_alternation_lists_every_branch() {
    let result = one_of([char('a'), integer()]).run("x");
    let error = result.error().unwrap();
    assert_eq!(error.code(), "kumi::alternation::exhausted");
    assert_eq!(
        error.to_string(),
        "Expected only one parser to match but received none:\n\
         Expected 'a' but received 'x' (char(a))\n\
         Expected number but got 'x' (number(int))"
    );
}

#[test]
fn winning_branch_context_is_kept() {
    let remember = Parser::new("remember()", |mut state: ParseState| {
        state.set_context("seen", "yes");
        state.advance(1)
    });
    let result = one_of([sequence_of([char('x'), remember]), char('y')]).run("xz");
    assert!(!result.is_failed());
    assert_eq!(result.context_value("seen"), Some(&Value::from("yes")));
}

#[test]
fn losing_branch_context_is_discarded() {
    let poison = Parser::new("poison()", |mut state: ParseState| {
        state.set_context("poisoned", 1);
        state.fail(ParseError::custom("poisoned"))
    });
    let result = one_of([poison, letter()]).run("a");
    assert!(!result.is_failed());
    assert_eq!(result.context_value("poisoned"), None);
}

// ============================================================================
// DRIVER
// ============================================================================

#[test]
fn parse_till_end_reports_stall_with_warning() {
    let grammar = parse_till_end(one_or_more(sequence_of([integer(), space()])));
    let result = grammar.run("100 100  ");
    assert_eq!(values(&result), vec![Value::Int(100), Value::Int(100)]);
    assert_eq!(
        result.error().map(ToString::to_string).as_deref(),
        Some("Parser did not move between iterations (warning: Expected number but got ' ')")
    );
}

#[test]
fn parse_till_end_with_optional_line_breaks() {
    let grammar = parse_till_end(sequence_of([letter(), optional(line_end())]));
    let result = grammar.run("a\nb");
    assert!(!result.is_failed());
    assert!(result.warning().is_none());
    assert_eq!(values(&result), vec![Value::Char('a'), Value::Char('b')]);
}

#[test]
fn parse_all_returns_values() {
    let grammar = parse_till_end(sequence_of([word(), optional(space())]));
    let parsed = parse_all(&grammar, "alpha beta", "words").unwrap();
    assert_eq!(
        parsed.into_iter().collect::<Vec<_>>(),
        vec![Value::from("alpha"), Value::from("beta")]
    );
}
