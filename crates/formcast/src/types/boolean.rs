use super::Coercer;
use crate::value::Value;

/// Strings that read as `true`. Matching is exact and case-sensitive.
const TRUE_STRINGS: &[&str] = &["1", "t", "T", "true", "TRUE", "on", "ON"];

/// Boolean coercion.
///
/// Only `true`, the integer `1` and the strings in `TRUE_STRINGS` are true.
/// Everything else is false, never Nil.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl Coercer for BooleanType {
    fn typecast(&self, value: Value) -> Value {
        let truthy = match &value {
            Value::Bool(b) => *b,
            Value::Integer(n) => *n == 1,
            Value::String(s) => TRUE_STRINGS.contains(&s.as_str()),
            _ => false,
        };
        Value::Bool(truthy)
    }
}
