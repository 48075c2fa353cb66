use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Represents a value produced on the parse stack.
///
/// The variant set is closed so record assembly can type-check stack entries
/// exhaustively.
///
/// # Examples
///
/// ```rust
/// use kumi::value::{Value, ValueType};
/// let n = Value::Int(42);
/// assert_eq!(n.value_type(), ValueType::Int);
/// let s = Value::from("hello");
/// assert_eq!(s.type_name(), "string");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Char(char),
    Str(String),
    Int(i32),
    Long(i64),
    Float(f64),
    List(Vec<Value>),
    Record(Record),
    Keyword(Keyword),
}

/// The type tag of a [`Value`], used by field descriptors.
///
/// Record and keyword tags carry the record shape / keyword family name, so a
/// `Record("Operation")` field only accepts records assembled from the
/// `Operation` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Char,
    Str,
    Int,
    Long,
    Float,
    List,
    Record(&'static str),
    Keyword(&'static str),
}

impl ValueType {
    /// Returns true if `value` carries exactly this type tag.
    pub fn accepts(&self, value: &Value) -> bool {
        value.value_type() == *self
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Char => write!(f, "char"),
            ValueType::Str => write!(f, "string"),
            ValueType::Int => write!(f, "int"),
            ValueType::Long => write!(f, "long"),
            ValueType::Float => write!(f, "float"),
            ValueType::List => write!(f, "list"),
            ValueType::Record(shape) => write!(f, "record {}", shape),
            ValueType::Keyword(family) => write!(f, "keyword {}", family),
        }
    }
}

impl Value {
    /// Returns the type tag of the value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Char(_) => ValueType::Char,
            Value::Str(_) => ValueType::Str,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::List(_) => ValueType::List,
            Value::Record(record) => ValueType::Record(record.shape()),
            Value::Keyword(keyword) => ValueType::Keyword(keyword.family),
        }
    }

    /// Returns the bare type name of the value as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kumi::value::Value;
    /// assert_eq!(Value::Long(7).type_name(), "long");
    /// assert_eq!(Value::List(vec![]).type_name(), "list");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Keyword(_) => "keyword",
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained integer widened to `i64` for both `Int` and `Long`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kumi::value::Value;
    /// assert_eq!(Value::Int(3).as_long(), Some(3));
    /// assert_eq!(Value::Long(1 << 40).as_long(), Some(1 << 40));
    /// assert_eq!(Value::from("3").as_long(), None);
    /// ```
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Value::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    /// Helper for formatting list values
    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Char(c) => write!(f, "'{}'", c),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::List(items) => Value::fmt_list(f, items),
            Value::Record(record) => write!(f, "{}", record),
            Value::Keyword(keyword) => write!(f, "{}", keyword),
        }
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Keyword> for Value {
    fn from(keyword: Keyword) -> Self {
        Value::Keyword(keyword)
    }
}

// ============================================================================
// KEYWORDS: enumeration variants recognised from a closed token table
// ============================================================================

/// A variant of a closed keyword family, e.g. `Move::Rock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Keyword {
    pub family: &'static str,
    pub name: &'static str,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.family, self.name)
    }
}

// ============================================================================
// RECORDS: structured values built by the record assembler
// ============================================================================

/// A record assembled from stack values, fields in declaration order.
///
/// Optional fields that were defaulted without a default value are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new(shape: &'static str, fields: Vec<(&'static str, Value)>) -> Self {
        Self { shape, fields }
    }

    /// The name of the shape this record was assembled from.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.shape)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
