use super::numeric::{parse_int_prefix, truncate};
use super::Coercer;
use crate::value::Value;

/// Integer coercion.
///
/// Blank input becomes Nil. Strings read their leading integer (`"12px"` is
/// 12, `"foo"` is 0), floats truncate toward zero, and values without a
/// numeric reading (`true`, dates, collections, objects) become Nil.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

impl Coercer for IntegerType {
    fn typecast(&self, value: Value) -> Value {
        if value.is_blank() {
            return Value::Nil;
        }
        match value {
            Value::Integer(n) => Value::Integer(n),
            Value::Float(f) => truncate(f).map_or(Value::Nil, Value::Integer),
            Value::String(s) => parse_int_prefix(&s).map_or(Value::Nil, Value::Integer),
            _ => Value::Nil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_integer_typecast() {
        let cases = [
            (Value::Integer(123), Value::Integer(123)),
            (Value::from("123"), Value::Integer(123)),
            (Value::from("foo"), Value::Integer(0)),
            (Value::Float(123.4), Value::Integer(123)),
            (Value::Float(-7.9), Value::Integer(-7)),
            (Value::Bool(false), Value::Nil),
            (Value::Bool(true), Value::Nil),
            (Value::Object(Object::new("foo")), Value::Nil),
        ];
        for (input, expected) in cases {
            assert_eq!(IntegerType.typecast(input.clone()), expected, "input: {input:?}");
        }
    }

    #[test]
    fn blank_input_is_nil() {
        assert_eq!(IntegerType.typecast(Value::Nil), Value::Nil);
        assert_eq!(IntegerType.typecast("".into()), Value::Nil);
        assert_eq!(IntegerType.typecast("   ".into()), Value::Nil);
        assert_eq!(IntegerType.typecast(Value::List(vec![])), Value::Nil);
    }

    #[test]
    fn out_of_range_is_nil() {
        assert_eq!(IntegerType.typecast("99999999999999999999".into()), Value::Nil);
        assert_eq!(IntegerType.typecast(Value::Float(f64::INFINITY)), Value::Nil);
        assert_eq!(IntegerType.typecast(Value::Float(f64::NAN)), Value::Nil);
        assert_eq!(IntegerType.typecast(Value::Float(1e19)), Value::Nil);
    }
}
