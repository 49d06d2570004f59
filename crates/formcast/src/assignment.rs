//! # Batch Assignment
//!
//! [`Assignment`] routes a flat batch of `(key, value)` pairs onto a host.
//!
//! ## Keys
//!
//! - A **simple key** names a setter: `"name"`, `"age"`.
//! - A **composite key** names one positional part of a field:
//!   `"birthday(1i)"`, `"birthday(2i)"`, `"birthday(3i)"`. The suffix is a
//!   1-based position followed by a kind, `i` (integer part) or `f` (float
//!   part). The field is everything before the first `(`, possibly empty.
//!   Every key of that shape is composite, whatever its position.
//!
//! ## Routing
//!
//! Simple keys are assigned immediately, in batch order. Composite parts are
//! converted to numbers and buffered per field; once the whole batch has been
//! scanned each buffered field is flushed through the host's composite setter,
//! in the order the fields were first seen. Missing positions are passed as
//! Nil, which the composite coercer turns into a Nil value.
//!
//! Positions are buffered up to [`MAX_COMPOSITE_PARTS`]. A field with a
//! position of 0 or beyond that limit is overlong: its composite setter
//! receives `MAX_COMPOSITE_PARTS + 1` parts, more than any built-in composite
//! type accepts, so the field becomes Nil.
//!
//! ## Failure
//!
//! The first key the host cannot handle aborts the batch with
//! [`FormError::UnknownAttribute`] (simple keys) or
//! [`FormError::MissingCompositeSetter`] (composite fields). Assignments made
//! before that point stay applied. With [`UnknownKeys::Ignore`] such keys are
//! skipped instead.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::FormcastConfig;
use crate::error::{FormError, Result};
use crate::host::AttributeHost;
use crate::types::{parse_float_prefix, parse_int_prefix, truncate};
use crate::value::Value;

/// Highest composite position buffered. Fields with a position beyond it are
/// flushed as overlong.
pub const MAX_COMPOSITE_PARTS: usize = 16;

/// What to do with keys the host has no setter for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Abort the batch with an error.
    #[default]
    Raise,
    /// Skip the key and carry on.
    Ignore,
}

/// Numeric kind of a composite part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Integer,
    Float,
}

impl PartKind {
    fn from_suffix(suffix: u8) -> Option<Self> {
        match suffix {
            b'i' => Some(PartKind::Integer),
            b'f' => Some(PartKind::Float),
            _ => None,
        }
    }

    /// Convert a raw part value to this kind.
    ///
    /// Strings read their numeric prefix, Nil reads as zero, numbers convert.
    /// Anything else has no numeric reading and becomes Nil.
    pub fn coerce(self, value: &Value) -> Value {
        match (self, value) {
            (PartKind::Integer, Value::Nil) => Value::Integer(0),
            (PartKind::Integer, Value::Integer(n)) => Value::Integer(*n),
            (PartKind::Integer, Value::Float(f)) => {
                truncate(*f).map_or(Value::Nil, Value::Integer)
            }
            (PartKind::Integer, Value::String(s)) => {
                parse_int_prefix(s).map_or(Value::Nil, Value::Integer)
            }
            (PartKind::Float, Value::Nil) => Value::Float(0.0),
            (PartKind::Float, Value::Integer(n)) => Value::Float(*n as f64),
            (PartKind::Float, Value::Float(f)) => Value::Float(*f),
            (PartKind::Float, Value::String(s)) => Value::Float(parse_float_prefix(s)),
            _ => Value::Nil,
        }
    }
}

/// A parsed composite key such as `birthday(3i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeKey<'a> {
    pub attribute: &'a str,
    /// 1-based. Saturates at `usize::MAX` for absurdly long digit runs.
    pub position: usize,
    pub kind: PartKind,
}

impl<'a> CompositeKey<'a> {
    /// Parse `key`, returning `None` for anything that is not a composite key.
    pub fn parse(key: &'a str) -> Option<Self> {
        let body = key.strip_suffix(')')?;
        let kind = PartKind::from_suffix(*body.as_bytes().last()?)?;
        let body = &body[..body.len() - 1];

        let digits_start = body
            .bytes()
            .rposition(|b| !b.is_ascii_digit())
            .map_or(0, |index| index + 1);
        let digits = &body[digits_start..];
        if digits.is_empty() || !body[..digits_start].ends_with('(') {
            return None;
        }

        let attribute = &key[..key.find('(')?];
        let position = digits.parse().unwrap_or(usize::MAX);

        Some(Self {
            attribute,
            position,
            kind,
        })
    }
}

/// Parts collected for one composite field.
#[derive(Debug, Default)]
struct PartBuffer {
    parts: Vec<Value>,
    overlong: bool,
}

impl PartBuffer {
    fn put(&mut self, position: usize, part: Value) {
        if !(1..=MAX_COMPOSITE_PARTS).contains(&position) {
            self.overlong = true;
            return;
        }
        if self.parts.len() < position {
            self.parts.resize(position, Value::Nil);
        }
        self.parts[position - 1] = part;
    }

    fn into_parts(mut self) -> Vec<Value> {
        if self.overlong {
            self.parts.resize(MAX_COMPOSITE_PARTS + 1, Value::Nil);
        }
        self.parts
    }
}

/// One batch assignment onto a host.
///
/// ```ignore
/// Assignment::new(&mut form)
///     .unknown_keys(UnknownKeys::Ignore)
///     .perform(params)?;
/// ```
pub struct Assignment<'h, H: AttributeHost + ?Sized> {
    host: &'h mut H,
    unknown: UnknownKeys,
}

impl<'h, H: AttributeHost + ?Sized> Assignment<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self {
            host,
            unknown: UnknownKeys::default(),
        }
    }

    /// Assignment using the unknown-key policy from `config`.
    pub fn configured(host: &'h mut H, config: &FormcastConfig) -> Self {
        Self::new(host).unknown_keys(config.unknown_keys())
    }

    pub fn unknown_keys(mut self, unknown: UnknownKeys) -> Self {
        self.unknown = unknown;
        self
    }

    /// Shorthand for `unknown_keys(UnknownKeys::Ignore)`.
    pub fn ignoring_unknown(self) -> Self {
        self.unknown_keys(UnknownKeys::Ignore)
    }

    /// Apply `batch` to the host.
    pub fn perform<I, K, V>(self, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let Self { host, unknown } = self;
        let mut composites: IndexMap<String, PartBuffer> = IndexMap::new();

        for (key, value) in batch {
            let key = key.as_ref();
            let value = value.into();

            if let Some(composite) = CompositeKey::parse(key) {
                let part = composite.kind.coerce(&value);
                trace!(
                    attribute = composite.attribute,
                    position = composite.position,
                    part = %part.inspect(),
                    "buffered composite part"
                );
                composites
                    .entry(composite.attribute.to_string())
                    .or_default()
                    .put(composite.position, part);
                continue;
            }

            if host.has_setter(key) {
                trace!(attribute = key, "assigning attribute");
                host.set(key, value)?;
            } else if unknown == UnknownKeys::Ignore {
                debug!(key, "skipping unknown attribute");
            } else {
                return Err(FormError::UnknownAttribute(key.to_string()));
            }
        }

        for (attribute, buffer) in composites {
            if host.has_composite_setter(&attribute) {
                let parts = buffer.into_parts();
                debug!(attribute = %attribute, parts = parts.len(), "flushing composite attribute");
                host.set_composite(&attribute, &parts)?;
            } else if unknown == UnknownKeys::Ignore {
                debug!(attribute = %attribute, "skipping attribute without composite setter");
            } else {
                return Err(FormError::MissingCompositeSetter(attribute));
            }
        }

        Ok(())
    }
}
