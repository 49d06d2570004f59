use super::Coercer;
use crate::value::Value;

/// Converts any value to its canonical string form (see `Display for Value`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl Coercer for StringType {
    fn typecast(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}
