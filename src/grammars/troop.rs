//! Blocks describing a troop of item-throwing monkeys.
//!
//! ```text
//! Monkey 0:
//!   Starting items: 79, 98
//!   Operation: new = old * 19
//!   Test: divisible by 23
//!     If true: throw to monkey 2
//!     If false: throw to monkey 3
//! ```
//!
//! Blocks are separated by a blank line. Each block becomes a `Monkey` record
//! whose `operation` field is itself an `Operation` record.

use crate::combinators::{list, one_of, one_or_more, optional, repeat, sequence_of};
use crate::driver::parse_till_end;
use crate::keyword::{keyword, KeywordSet};
use crate::matchers::{char_silent, integer, line_end, literal_silent, long, space, spaces};
use crate::parser::Parser;
use crate::record::{to_record, FieldSpec, RecordShape};
use crate::value::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Multiply,
}

impl Operator {
    /// Applies the operation; a missing operand means the old value itself.
    /// Returns `None` on overflow.
    pub fn apply(self, old: i64, operand: Option<i64>) -> Option<i64> {
        let operand = operand.unwrap_or(old);
        match self {
            Operator::Add => old.checked_add(operand),
            Operator::Multiply => old.checked_mul(operand),
        }
    }
}

impl KeywordSet for Operator {
    const FAMILY: &'static str = "Operator";

    fn table() -> Vec<(&'static str, Self)> {
        vec![("+", Operator::Add), ("*", Operator::Multiply)]
    }

    fn name(self) -> &'static str {
        match self {
            Operator::Add => "Add",
            Operator::Multiply => "Multiply",
        }
    }
}

/// `operand` is absent when the right-hand side is `old`.
pub fn operation_shape() -> RecordShape {
    RecordShape::new(
        "Operation",
        vec![
            FieldSpec::required("operator", ValueType::Keyword(Operator::FAMILY)),
            FieldSpec::optional("operand", ValueType::Long),
        ],
    )
}

pub fn monkey_shape() -> RecordShape {
    RecordShape::new(
        "Monkey",
        vec![
            FieldSpec::required("id", ValueType::Int),
            FieldSpec::required("items", ValueType::List),
            FieldSpec::required("operation", operation_shape().value_type()),
            FieldSpec::required("divisor", ValueType::Long),
            FieldSpec::required("if_true", ValueType::Int),
            FieldSpec::required("if_false", ValueType::Int),
        ],
    )
}

fn header() -> Parser {
    sequence_of([
        literal_silent("Monkey "),
        integer(),
        char_silent(':'),
        line_end(),
    ])
}

fn items() -> Parser {
    let item = sequence_of([long(), optional(sequence_of([char_silent(','), space()]))]);
    sequence_of([
        spaces(2, false),
        literal_silent("Starting items: "),
        list(one_or_more(item)),
        line_end(),
    ])
}

fn operation() -> Parser {
    to_record(
        operation_shape(),
        sequence_of([
            spaces(2, false),
            literal_silent("Operation: new = old "),
            keyword::<Operator>(),
            space(),
            one_of([long(), literal_silent("old")]),
            line_end(),
        ]),
    )
}

fn divisibility() -> Parser {
    sequence_of([
        spaces(2, false),
        literal_silent("Test: divisible by "),
        long(),
        line_end(),
    ])
}

fn throw_target() -> Parser {
    sequence_of([
        spaces(4, false),
        literal_silent("If "),
        one_of([literal_silent("true: "), literal_silent("false: ")]),
        literal_silent("throw to monkey "),
        integer(),
        optional(line_end()),
    ])
}

pub fn monkey() -> Parser {
    to_record(
        monkey_shape(),
        sequence_of([
            header(),
            items(),
            operation(),
            divisibility(),
            repeat(2, throw_target()),
            optional(line_end()),
        ]),
    )
}

pub fn grammar() -> Parser {
    parse_till_end(monkey())
}
