use chrono::Timelike;
use tracing::trace;

use super::calendar::{datetime_from_parts, parse_datetime};
use super::{Coercer, CompositeCoercer};
use crate::value::Value;

/// Date and time coercion at whole-second precision.
///
/// Offsets in the input are normalised to UTC. A plain date becomes midnight.
/// Composite assignment takes `(year, month, day[, hour, minute, second])`.
#[derive(Debug, Clone, Default)]
pub struct DateTimeType {
    formats: Vec<String>,
}

impl DateTimeType {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Coercer for DateTimeType {
    fn typecast(&self, value: Value) -> Value {
        match value {
            Value::DateTime(datetime) => datetime
                .with_nanosecond(0)
                .map_or(Value::Nil, Value::DateTime),
            Value::Date(date) => date.and_hms_opt(0, 0, 0).map_or(Value::Nil, Value::DateTime),
            Value::String(s) => match parse_datetime(&s, &self.formats) {
                Some(datetime) => Value::DateTime(datetime),
                None => {
                    trace!(input = %s, "unparseable date_time");
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

impl CompositeCoercer for DateTimeType {
    fn complex_typecast(&self, parts: &[Value]) -> Value {
        datetime_from_parts(parts).map_or(Value::Nil, Value::DateTime)
    }
}
