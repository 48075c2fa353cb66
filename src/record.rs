//! # Record Assembler
//!
//! Turns the trailing values of the stack into one [`Record`] value, guided by
//! a statically declared [`RecordShape`].
//!
//! Assembly first tries to take one value per field, optional fields included.
//! If that fails and the shape has optional fields, it retries with one value
//! per mandatory field and defaults the optional ones. The consumed values are
//! replaced by the record, which can in turn be a field of an outer record.

use std::rc::Rc;

use crate::errors::ParseError;
use crate::parser::Parser;
use crate::state::ParseState;
use crate::value::{Record, Value, ValueType};

/// One field of a record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: ValueType,
    pub optional: bool,
    /// Value used when an optional field is defaulted; absent if `None`.
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn required(name: &'static str, ty: ValueType) -> Self {
        Self {
            name,
            ty,
            optional: false,
            default: None,
        }
    }

    /// An optional field that is left out of the record when defaulted.
    pub fn optional(name: &'static str, ty: ValueType) -> Self {
        Self {
            name,
            ty,
            optional: true,
            default: None,
        }
    }

    /// An optional field that takes `default` when defaulted.
    pub fn defaulted(name: &'static str, ty: ValueType, default: impl Into<Value>) -> Self {
        Self {
            name,
            ty,
            optional: true,
            default: Some(default.into()),
        }
    }
}

/// The ordered field signature of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl RecordShape {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    pub fn value_type(&self) -> ValueType {
        ValueType::Record(self.name)
    }

    fn mandatory(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| !field.optional)
    }

    /// Type-checks the trailing `fields.len()` stack values against `fields`.
    fn check<'a>(
        &self,
        fields: impl ExactSizeIterator<Item = &'a FieldSpec>,
        state: &ParseState,
    ) -> Result<(), ParseError> {
        let stack = state.stack();
        let expected = fields.len();
        if stack.len() < expected {
            return Err(ParseError::Arity {
                shape: self.name,
                expected,
                actual: stack.len(),
            });
        }
        let trailing = stack.iter().skip(stack.len() - expected);
        for (field, value) in fields.zip(trailing) {
            if !field.ty.accepts(value) {
                return Err(ParseError::FieldType {
                    shape: self.name,
                    field: field.name,
                    expected: field.ty,
                    found: value.value_type(),
                });
            }
        }
        Ok(())
    }

    /// Replaces the trailing stack values with an assembled record.
    pub fn assemble(&self, state: ParseState) -> ParseState {
        if state.is_failed() {
            return state;
        }
        let full = match self.check(self.fields.iter(), &state) {
            Ok(()) => return self.take(state, self.fields.len(), true),
            Err(error) => error,
        };
        let mandatory: Vec<&FieldSpec> = self.mandatory().collect();
        if mandatory.len() == self.fields.len() {
            return state.fail(full);
        }
        let count = mandatory.len();
        match self.check(mandatory.into_iter(), &state) {
            Ok(()) => self.take(state, count, false),
            Err(_) => state.fail(full),
        }
    }

    /// Replaces the trailing `count` values, already checked, with a record.
    fn take(&self, mut state: ParseState, count: usize, with_optional: bool) -> ParseState {
        let values = state.slice_last(count).unwrap_or_default();
        let mut values = values.into_iter();
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if with_optional || !field.optional {
                if let Some(value) = values.next() {
                    fields.push((field.name, value));
                }
            } else if let Some(default) = &field.default {
                fields.push((field.name, default.clone()));
            }
        }
        state.push(Record::new(self.name, fields));
        state
    }
}

/// Runs `parser`, then assembles a record of `shape` from what it left on the
/// stack.
///
/// Example:
///   to_record(pair, sequence_of([word(), space(), integer()])) on "hello 10"
///   ; => stack [Pair { text: "hello", count: 10 }]
pub fn to_record(shape: impl Into<Rc<RecordShape>>, parser: Parser) -> Parser {
    let shape: Rc<RecordShape> = shape.into();
    let label = format!("to_record({}, {})", shape.name, parser.label());
    Parser::new(label, move |state: ParseState| {
        shape.assemble(parser.parse(state))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(values: Vec<Value>) -> ParseState {
        let mut state = ParseState::new("");
        for value in values {
            state.push(value);
        }
        state
    }

    fn command() -> RecordShape {
        RecordShape::new(
            "Command",
            vec![
                FieldSpec::required("op", ValueType::Str),
                FieldSpec::optional("operand", ValueType::Int),
            ],
        )
    }

    #[test]
    fn takes_all_fields_when_types_line_up() {
        let result = command().assemble(state_with(vec![Value::from("addx"), Value::Int(3)]));
        let record = result.stack()[0].as_record().unwrap().clone();
        assert_eq!(record.get("op"), Some(&Value::from("addx")));
        assert_eq!(record.get("operand"), Some(&Value::Int(3)));
        assert_eq!(result.stack().len(), 1);
    }

    #[test]
    fn falls_back_to_mandatory_fields() {
        let previous = Value::Char('x');
        let result = command().assemble(state_with(vec![previous.clone(), Value::from("noop")]));
        assert_eq!(result.stack().len(), 2);
        assert_eq!(result.stack()[0], previous);
        let record = result.stack()[1].as_record().unwrap();
        assert_eq!(record.get("operand"), None);
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn defaulted_field_takes_default() {
        let shape = RecordShape::new(
            "Step",
            vec![
                FieldSpec::required("dir", ValueType::Char),
                FieldSpec::defaulted("count", ValueType::Int, 1),
            ],
        );
        let result = shape.assemble(state_with(vec![Value::Char('R')]));
        let record = result.stack()[0].as_record().unwrap();
        assert_eq!(record.get("count"), Some(&Value::Int(1)));
    }

    #[test]
    fn reports_arity_from_full_attempt() {
        let shape = RecordShape::new(
            "Pair",
            vec![
                FieldSpec::required("text", ValueType::Str),
                FieldSpec::required("count", ValueType::Int),
            ],
        );
        let result = shape.assemble(state_with(vec![Value::Int(10)]));
        assert_eq!(
            result.error().unwrap().to_string(),
            "Expected parser results to contain 2 results but contained: 1"
        );
        assert_eq!(result.stack().len(), 1);
    }

    #[test]
    fn both_attempts_failing_reports_full_attempt() {
        let result = command().assemble(state_with(vec![Value::Int(4)]));
        assert_eq!(
            result.error(),
            Some(&ParseError::Arity {
                shape: "Command",
                expected: 2,
                actual: 1,
            })
        );
        assert_eq!(result.stack().len(), 1);

        let result = command().assemble(state_with(vec![Value::Int(4), Value::Int(5)]));
        assert_eq!(
            result.error(),
            Some(&ParseError::FieldType {
                shape: "Command",
                field: "op",
                expected: ValueType::Str,
                found: ValueType::Int,
            })
        );
    }

    #[test]
    fn nested_record_field() {
        let inner = RecordShape::new("Inner", vec![FieldSpec::required("n", ValueType::Int)]);
        let outer = RecordShape::new(
            "Outer",
            vec![
                FieldSpec::required("label", ValueType::Str),
                FieldSpec::required("inner", inner.value_type()),
            ],
        );
        let state = inner.assemble(state_with(vec![Value::from("x"), Value::Int(5)]));
        let result = outer.assemble(state);
        assert!(!result.is_failed());
        let record = result.stack()[0].as_record().unwrap();
        assert_eq!(record.get("inner").unwrap().value_type(), ValueType::Record("Inner"));
    }
}
