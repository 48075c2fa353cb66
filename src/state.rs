//! # Parse State
//!
//! A [`ParseState`] is the full snapshot threaded through every parser: the
//! input, a cursor, the value stack, the context side-channel and the
//! diagnostics of the most recent step.
//!
//! ## Design Principles
//!
//! - **Owned snapshots**: parsers take a state by value and hand back a new
//!   one. Forking a state is a `clone()`.
//! - **Persistent collections**: the stack is an `im::Vector` and the context
//!   an `im::HashMap`, so a fork is O(1) and mutations on one fork are never
//!   visible from another. Alternation isolation follows from the types.
//! - **Errors are data**: once `error` is set, parsers pass the state through
//!   untouched.

use std::rc::Rc;

use im::{HashMap, Vector};

use crate::errors::ParseError;
use crate::value::Value;

/// Named side-channel store carried alongside the stack.
pub type Context = HashMap<String, Value>;

#[derive(Debug, Clone)]
pub struct ParseState {
    input: Rc<[char]>,
    cursor: usize,
    stack: Vector<Value>,
    context: Context,
    name: Rc<str>,
    error: Option<ParseError>,
    warning: Option<ParseError>,
}

impl ParseState {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            cursor: 0,
            stack: Vector::new(),
            context: Context::new(),
            name: Rc::from(""),
            error: None,
            warning: None,
        }
    }

    /// Seeds the context before parsing starts.
    pub fn with_context(self, context: Context) -> Self {
        Self { context, ..self }
    }

    /// An independent copy of this state; mutations on either side are
    /// invisible to the other.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    // ------------------------------------------------------------------------
    // Cursor and input
    // ------------------------------------------------------------------------

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of the cursor within the original text.
    pub fn byte_offset(&self) -> usize {
        self.input[..self.cursor].iter().map(|c| c.len_utf8()).sum()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn input_text(&self) -> String {
        self.input.iter().collect()
    }

    /// Unconsumed input, as text.
    pub fn remaining(&self) -> String {
        self.input[self.cursor..].iter().collect()
    }

    /// True while at least one unit of input is left.
    pub fn has_next(&self) -> bool {
        self.cursor < self.input.len()
    }

    /// True once the whole input has been consumed.
    pub fn is_done(&self) -> bool {
        !self.has_next()
    }

    /// Consumes one unit.
    ///
    /// The returned state is advanced even if the caller then rejects the
    /// character; at end of input the cursor stays put and `None` is returned.
    pub fn next_char(&self) -> (Self, Option<char>) {
        let next = self.peek_char();
        (self.advance(1), next)
    }

    /// Consumes `amount` units, or one unit and `None` when fewer remain.
    pub fn next_string(&self, amount: usize) -> (Self, Option<String>) {
        match self.peek(amount) {
            Some(text) => (self.advance(amount), Some(text)),
            None => (self.advance(1), None),
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.input.get(self.cursor).copied()
    }

    /// Read-only lookahead of exactly `amount` units.
    pub fn peek(&self, amount: usize) -> Option<String> {
        let end = self.cursor.checked_add(amount)?;
        self.input
            .get(self.cursor..end)
            .map(|chars| chars.iter().collect())
    }

    /// Shifts the cursor, clamped to the end of the input.
    pub fn advance(&self, amount: usize) -> Self {
        let mut next = self.clone();
        next.cursor = self.cursor.saturating_add(amount).min(self.input.len());
        next
    }

    pub fn same_position(a: &ParseState, b: &ParseState) -> bool {
        a.cursor == b.cursor
    }

    // ------------------------------------------------------------------------
    // Value stack
    // ------------------------------------------------------------------------

    pub fn stack(&self) -> &Vector<Value> {
        &self.stack
    }

    pub fn into_stack(self) -> Vector<Value> {
        self.stack
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.stack.push_back(value.into());
    }

    pub fn pop_last(&mut self) -> Option<Value> {
        self.stack.pop_back()
    }

    pub fn pop_first(&mut self) -> Option<Value> {
        self.stack.pop_front()
    }

    /// Removes the last `amount` values, preserving their order.
    ///
    /// Returns `None` and leaves the stack untouched when fewer exist.
    pub fn slice_last(&mut self, amount: usize) -> Option<Vec<Value>> {
        let len = self.stack.len();
        if amount > len {
            return None;
        }
        let tail = self.stack.split_off(len - amount);
        Some(tail.into_iter().collect())
    }

    // ------------------------------------------------------------------------
    // Context side-channel
    // ------------------------------------------------------------------------

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn remove_context(&mut self, key: &str) -> Option<Value> {
        self.context.remove(key)
    }

    // ------------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------------

    /// Label of the most recently completed parser.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: Rc<str>) {
        self.name = name;
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn warning(&self) -> Option<&ParseError> {
        self.warning.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Marks the state as failed.
    pub fn fail(mut self, error: ParseError) -> Self {
        self.error = Some(error);
        self
    }

    pub(crate) fn set_warning(&mut self, warning: ParseError) {
        self.warning = Some(warning);
    }

    pub(crate) fn clear_warning(&mut self) {
        self.warning = None;
    }
}
