//! The polymorphic value carried by every block attribute.
//!
//! A block's configs, inputs, and outputs are dynamically typed: the same
//! attribute might hold a bool on one block and a float on another, and an
//! input that is not yet linked needs to distinguish "nothing has arrived
//! yet" (`Empty`) from "explicitly turned off" (`NotActive`). [`Value`] is
//! the tagged sum that models all of that, and is the only thing the
//! attribute containers and the kernel ever move around.
//!
//! No type coercion lives here. Callers that need a checked, narrowed read
//! (`as_bool`, `as_int_range`, ...) go through the validator in `fb-traits`.

use serde::{Deserialize, Serialize};

/// A reference from an input attribute back to the output that feeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub block: String,
    pub output: String,
}

impl Link {
    pub fn new(block: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            output: output.into(),
        }
    }
}

/// A single attribute value.
///
/// `NotActive` and `Empty` are both "no payload" but mean different things:
/// `Empty` is the state of a linked input before its upstream has ever
/// published, `NotActive` is an explicit "off" (what the enable gate and
/// error paths force outputs to). `Null` exists for block types that want a
/// real optional-value semantic distinct from either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A short symbolic tag, used for `status`, `exec_method`, and similar
    /// closed-vocabulary fields. Kept distinct from `Str` so validators can
    /// tell "any string" apart from "one of these known tags".
    Tag(String),
    /// An ordered bag of named sub-values, for block types whose config
    /// genuinely needs structure (e.g. a select-spec). Rarely used.
    Composite(Vec<(String, Value)>),
    NotActive,
    Empty,
    Null,
}

impl Value {
    pub fn is_active(&self) -> bool {
        !matches!(self, Value::NotActive | Value::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            Value::Tag(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&str> {
        match self {
            Value::Tag(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_active_and_empty_are_both_inactive_but_distinct() {
        assert!(!Value::NotActive.is_active());
        assert!(!Value::Empty.is_active());
        assert_ne!(Value::NotActive, Value::Empty);
    }

    #[test]
    fn float_reads_widen_from_int() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(3.5).as_float(), Some(3.5));
        assert_eq!(Value::Bool(true).as_float(), None);
    }

    #[test]
    fn round_trips_through_json() {
        let v = Value::Composite(vec![
            ("a".to_string(), Value::Bool(true)),
            ("b".to_string(), Value::Int(4)),
        ]);
        let s = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn link_is_plain_data() {
        let l = Link::new("upstream", "value");
        assert_eq!(l.block, "upstream");
        assert_eq!(l.output, "value");
    }
}
