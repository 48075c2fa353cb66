//! A two-instruction program, one instruction per line.
//!
//! ```text
//! noop
//! addx 3
//! addx -5
//! ```

use crate::combinators::{optional, sequence_of};
use crate::driver::parse_till_end;
use crate::keyword::{keyword, KeywordSet};
use crate::matchers::{integer, line_end, space};
use crate::parser::Parser;
use crate::record::{to_record, FieldSpec, RecordShape};
use crate::value::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Noop,
    AddX,
}

impl KeywordSet for OpCode {
    const FAMILY: &'static str = "OpCode";

    fn table() -> Vec<(&'static str, Self)> {
        vec![("noop", OpCode::Noop), ("addx", OpCode::AddX)]
    }

    fn name(self) -> &'static str {
        match self {
            OpCode::Noop => "Noop",
            OpCode::AddX => "AddX",
        }
    }
}

/// `operand` is absent for `noop`.
pub fn instruction_shape() -> RecordShape {
    RecordShape::new(
        "Instruction",
        vec![
            FieldSpec::required("op", ValueType::Keyword(OpCode::FAMILY)),
            FieldSpec::optional("operand", ValueType::Int),
        ],
    )
}

pub fn grammar() -> Parser {
    parse_till_end(to_record(
        instruction_shape(),
        sequence_of([
            keyword::<OpCode>(),
            optional(sequence_of([space(), integer()])),
            optional(line_end()),
        ]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn operand_is_optional() {
        let result = grammar().run("noop\naddx 3\naddx -5\nnoop");
        assert!(!result.is_failed());
        let rendered: Vec<String> = result.stack().iter().map(Value::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "Instruction { op: OpCode::Noop }",
                "Instruction { op: OpCode::AddX, operand: 3 }",
                "Instruction { op: OpCode::AddX, operand: -5 }",
                "Instruction { op: OpCode::Noop }",
            ]
        );
    }

    #[test]
    fn unknown_opcode_fails() {
        let result = grammar().run("noop\nmulx 2");
        assert!(result.is_failed());
        assert_eq!(result.stack().len(), 1);
    }
}
