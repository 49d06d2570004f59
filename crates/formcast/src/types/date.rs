use tracing::trace;

use super::calendar::{date_from_parts, parse_date};
use super::{Coercer, CompositeCoercer};
use crate::value::Value;

/// Calendar date coercion.
///
/// Strings go through the permissive parser (after any configured patterns),
/// date-times keep their date, everything else is Nil. Composite assignment
/// takes exactly `(year, month, day)`.
#[derive(Debug, Clone, Default)]
pub struct DateType {
    formats: Vec<String>,
}

impl DateType {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Coercer for DateType {
    fn typecast(&self, value: Value) -> Value {
        match value {
            Value::Date(date) => Value::Date(date),
            Value::DateTime(datetime) => Value::Date(datetime.date()),
            Value::String(s) => match parse_date(&s, &self.formats) {
                Some(date) => Value::Date(date),
                None => {
                    trace!(input = %s, "unparseable date");
                    Value::Nil
                }
            },
            _ => Value::Nil,
        }
    }

    fn composite(&self) -> Option<&dyn CompositeCoercer> {
        Some(self)
    }
}

impl CompositeCoercer for DateType {
    fn complex_typecast(&self, parts: &[Value]) -> Value {
        date_from_parts(parts).map_or(Value::Nil, Value::Date)
    }
}
