use super::Coercer;
use crate::value::Value;

/// Identity coercer used by attributes declared without a type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseType;

impl Coercer for BaseType {
    fn typecast(&self, value: Value) -> Value {
        value
    }
}
