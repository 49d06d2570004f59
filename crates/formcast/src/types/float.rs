use super::numeric::parse_float_prefix;
use super::Coercer;
use crate::value::Value;

/// Float coercion. Same rules as [`IntegerType`](super::IntegerType), keeping
/// the fraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl Coercer for FloatType {
    fn typecast(&self, value: Value) -> Value {
        if value.is_blank() {
            return Value::Nil;
        }
        match value {
            Value::Float(f) => Value::Float(f),
            Value::Integer(n) => Value::Float(n as f64),
            Value::String(s) => Value::Float(parse_float_prefix(&s)),
            _ => Value::Nil,
        }
    }
}
