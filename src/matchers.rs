//! # Primitive Matchers
//!
//! Atomic recognizers operating directly on a [`ParseState`].
//!
//! ## Matchers Provided
//!
//! - **Literals**: `char`, `char_silent`, `literal`, `literal_silent`
//! - **Classes**: `letter`, `word`
//! - **Numbers**: `number`, `integer`, `long`, `float`
//! - **Layout**: `space`, `spaces`, `line_end`
//!
//! A matcher that rejects its input fails on the state it was given, so the
//! cursor of a failed state points at the offending unit.

use std::fmt;

use crate::errors::ParseError;
use crate::parser::Parser;
use crate::state::ParseState;
use crate::value::Value;

/// Renders an inspected unit for failure messages; end of input is `null`.
fn describe(unit: Option<char>) -> String {
    unit.map_or_else(|| "null".to_string(), String::from)
}

// ============================================================================
// LITERALS
// ============================================================================

fn char_matcher(target: char, capture: bool) -> Parser {
    Parser::new(format!("char({})", target), move |state: ParseState| {
        let (mut next, found) = state.next_char();
        if found != Some(target) {
            return state.fail(ParseError::Mismatch {
                expected: format!("'{}'", target),
                found: describe(found),
            });
        }
        if capture {
            next.push(target);
        }
        next
    })
}

/// Matches one exact character and pushes it.
///
/// Example:
///   char('+') on "+1" ; => stack ['+']
pub fn char(target: char) -> Parser {
    char_matcher(target, true)
}

/// Matches one exact character without pushing it.
pub fn char_silent(target: char) -> Parser {
    char_matcher(target, false)
}

fn literal_matcher(target: &str, capture: bool) -> Parser {
    let target = target.to_string();
    let width = target.chars().count();
    Parser::new(format!("literal({})", target), move |state: ParseState| {
        let remaining = state.remaining();
        let (mut next, found) = state.next_string(width);
        if found.as_deref() != Some(target.as_str()) {
            return state.fail(ParseError::Mismatch {
                expected: format!("'{}'", target),
                found: found.unwrap_or(remaining),
            });
        }
        if capture {
            next.push(target.as_str());
        }
        next
    })
}

/// Matches an exact string and pushes it.
pub fn literal(target: &str) -> Parser {
    literal_matcher(target, true)
}

/// Matches an exact string without pushing it.
pub fn literal_silent(target: &str) -> Parser {
    literal_matcher(target, false)
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

/// Matches one alphabetic character and pushes it.
pub fn letter() -> Parser {
    Parser::new("letter()", |state: ParseState| {
        let (mut next, found) = state.next_char();
        match found {
            Some(c) if c.is_alphabetic() => {
                next.push(c);
                next
            }
            other => state.fail(ParseError::Mismatch {
                expected: "letter".into(),
                found: describe(other),
            }),
        }
    })
}

/// Greedily matches a run of non-whitespace characters and pushes it as a
/// string. Fails if the run is empty.
pub fn word() -> Parser {
    Parser::new("word()", |state: ParseState| {
        let mut next = state;
        let mut buffer = String::new();
        while let Some(c) = next.peek_char().filter(|c| !c.is_whitespace()) {
            buffer.push(c);
            next = next.advance(1);
        }
        if buffer.is_empty() {
            let found = describe(next.peek_char());
            return next.fail(ParseError::Mismatch {
                expected: "string of any length".into(),
                found,
            });
        }
        next.push(buffer);
        next
    })
}

// ============================================================================
// NUMBERS
// ============================================================================

/// The value kind a numeric literal is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// 32-bit signed, pushed as `Value::Int`
    Int,
    /// 64-bit signed, pushed as `Value::Long`
    Long,
    /// 64-bit float, pushed as `Value::Float`
    Float,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Int => write!(f, "int"),
            NumberKind::Long => write!(f, "long"),
            NumberKind::Float => write!(f, "float"),
        }
    }
}

impl NumberKind {
    fn accepts(self, c: char, offset: usize, seen_dot: bool) -> bool {
        c.is_ascii_digit()
            || (c == '-' && offset == 0)
            || (c == '.' && self == NumberKind::Float && offset != 0 && !seen_dot)
    }

    fn convert(self, text: &str) -> Option<Value> {
        match self {
            NumberKind::Int => text.parse::<i32>().ok().map(Value::Int),
            NumberKind::Long => text.parse::<i64>().ok().map(Value::Long),
            NumberKind::Float => text.parse::<f64>().ok().map(Value::Float),
        }
    }
}

/// Greedily matches a numeric literal and pushes it converted to `kind`.
///
/// A leading `-` is accepted only as the first unit; a single `.` only for
/// [`NumberKind::Float`] and never as the first unit.
pub fn number(kind: NumberKind) -> Parser {
    Parser::new(format!("number({})", kind), move |state: ParseState| {
        let mut next = state.snapshot();
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = next.peek_char() {
            if !kind.accepts(c, text.len(), seen_dot) {
                break;
            }
            seen_dot |= c == '.';
            text.push(c);
            next = next.advance(1);
        }
        if text.is_empty() {
            let found = describe(next.peek_char());
            return next.fail(ParseError::NotANumber { found });
        }
        match kind.convert(&text) {
            Some(value) => {
                next.push(value);
                next
            }
            None => state.fail(ParseError::InvalidNumber { text, kind }),
        }
    })
}

pub fn integer() -> Parser {
    number(NumberKind::Int)
}

pub fn long() -> Parser {
    number(NumberKind::Long)
}

pub fn float() -> Parser {
    number(NumberKind::Float)
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Matches exactly `amount` spaces, pushing them as one string if `capture`.
pub fn spaces(amount: usize, capture: bool) -> Parser {
    let expected = " ".repeat(amount);
    let label = if amount == 1 {
        "space()".to_string()
    } else {
        format!("spaces({})", amount)
    };
    Parser::new(label, move |state: ParseState| {
        let remaining = state.remaining();
        let (mut next, found) = state.next_string(amount);
        if found.as_deref() != Some(expected.as_str()) {
            return state.fail(ParseError::Mismatch {
                expected: format!("'{}'", expected),
                found: found.unwrap_or(remaining),
            });
        }
        if capture {
            next.push(expected.as_str());
        }
        next
    })
}

/// Matches a single space without pushing it.
pub fn space() -> Parser {
    spaces(1, false)
}

/// Matches `\n` or `\r\n`. A `\r` not followed by `\n` is rejected.
/// Pushes nothing.
pub fn line_end() -> Parser {
    Parser::new("line_end()", |state: ParseState| {
        let (next, found) = state.next_char();
        match found {
            Some('\n') => next,
            Some('\r') => match next.peek_char() {
                Some('\n') => next.advance(1),
                other => {
                    let found = describe(other);
                    next.fail(ParseError::Mismatch {
                        expected: "'\\n'".into(),
                        found,
                    })
                }
            },
            other => state.fail(ParseError::Mismatch {
                expected: "'\\r' or '\\n'".into(),
                found: describe(other),
            }),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(parser: &Parser, input: &str) -> String {
        parser
            .run(input)
            .error()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    #[test]
    fn char_mismatch_message() {
        assert_eq!(error_of(&char('a'), " a"), "Expected 'a' but received ' '");
        assert_eq!(error_of(&char('a'), ""), "Expected 'a' but received 'null'");
    }

    #[test]
    fn char_silent_pushes_nothing() {
        let result = char_silent('$').run("$");
        assert!(!result.is_failed());
        assert!(result.stack().is_empty());
    }

    #[test]
    fn literal_mismatch_message() {
        assert_eq!(
            error_of(&literal("hello"), " hello"),
            "Expected 'hello' but received ' hell'"
        );
        assert_eq!(error_of(&literal("hello"), "he"), "Expected 'hello' but received 'he'");
    }

    #[test]
    fn letter_rejects_digits() {
        assert_eq!(error_of(&letter(), "1"), "Expected letter but received '1'");
        assert_eq!(letter().run("é").stack()[0], Value::Char('é'));
    }

    #[test]
    fn word_stops_at_whitespace() {
        let result = word().run("abc.d e");
        assert_eq!(result.stack()[0], Value::from("abc.d"));
        assert_eq!(result.cursor(), 5);
        assert_eq!(
            error_of(&word(), " x"),
            "Expected string of any length but received ' '"
        );
    }

    #[test]
    fn numbers_by_kind() {
        assert_eq!(long().run("2147483648").stack()[0], Value::Long(2_147_483_648));
        assert_eq!(float().run("-1.5").stack()[0], Value::Float(-1.5));
        assert_eq!(integer().run("-10+").stack()[0], Value::Int(-10));
    }

    #[test]
    fn int_stops_at_dot() {
        let result = integer().run("1.5");
        assert_eq!(result.stack()[0], Value::Int(1));
        assert_eq!(result.cursor(), 1);
    }

    #[test]
    fn float_accepts_single_dot() {
        let result = float().run("1.5.3");
        assert_eq!(result.stack()[0], Value::Float(1.5));
        assert_eq!(result.cursor(), 3);
        assert_eq!(error_of(&float(), ".5"), "Expected number but got '.'");
    }

    #[test]
    fn number_overflow_is_an_error() {
        let result = integer().run("99999999999");
        assert!(matches!(
            result.error(),
            Some(ParseError::InvalidNumber { kind: NumberKind::Int, .. })
        ));
        assert!(matches!(
            integer().run("-x").error(),
            Some(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn spaces_capture() {
        let result = spaces(3, true).run("   x");
        assert_eq!(result.stack()[0], Value::from("   "));
        assert_eq!(result.name(), "spaces(3)");
        assert_eq!(error_of(&space(), "a "), "Expected ' ' but received 'a'");
    }

    #[test]
    fn line_end_variants() {
        let lf = line_end().run("\n");
        assert!(!lf.is_failed());
        assert_eq!(lf.cursor(), 1);
        let crlf = line_end().run("\r\n");
        assert!(!crlf.is_failed());
        assert_eq!(crlf.cursor(), 2);
        assert_eq!(
            error_of(&line_end(), "x"),
            "Expected '\\r' or '\\n' but received 'x'"
        );
    }
}
