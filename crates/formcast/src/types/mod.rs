//! # Type Coercion
//!
//! Every declared attribute owns a [`Coercer`]: a pure conversion from an
//! arbitrary [`Value`] to the attribute's type. Coercers never fail. Input
//! that has no sensible reading for the type becomes [`Value::Nil`], leaving it
//! to validation (outside this crate) to report "required" or "invalid".
//!
//! ## Built-in Types
//!
//! | Name | Coercer | Result |
//! |------|---------|--------|
//! | `base` | [`BaseType`] | input unchanged |
//! | `string` | [`StringType`] | canonical string form |
//! | `integer` | [`IntegerType`] | leading-integer parse, truncation |
//! | `float` | [`FloatType`] | leading-decimal parse |
//! | `boolean` | [`BooleanType`] | membership in a fixed truthy set |
//! | `date` | [`DateType`] | permissive date parse, composite capable |
//! | `date_time` | [`DateTimeType`] | permissive timestamp parse, composite capable |
//!
//! ## Composite Coercers
//!
//! Some types can be assembled from several positional inputs, for example a
//! date picked from three `<select>`s. Those coercers expose a
//! [`CompositeCoercer`] through [`Coercer::composite`]; attributes using them
//! accept composite assignment.
//!
//! ## Custom Types
//!
//! A [`TypeRegistry`] maps type names to factories. Register a factory to make
//! a new type name available to declarations:
//!
//! ```ignore
//! let mut types = TypeRegistry::default();
//! types.register("upcase", |_options| Arc::new(Upcase) as Arc<dyn Coercer>);
//! ```

mod base;
mod boolean;
mod calendar;
mod date;
mod date_time;
mod float;
mod integer;
mod numeric;
mod string;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::config::FormcastConfig;
use crate::error::{FormError, Result};
use crate::value::Value;

pub use base::BaseType;
pub use boolean::BooleanType;
pub use date::DateType;
pub use date_time::DateTimeType;
pub use float::FloatType;
pub use integer::IntegerType;
pub use string::StringType;

pub(crate) use numeric::{parse_float_prefix, parse_int_prefix, truncate};

/// Options handed to a coercer factory, e.g. `format` for date types.
pub type CoercerOptions = IndexMap<String, Value>;

/// Builds a coercer for one attribute declaration.
pub type CoercerFactory = Arc<dyn Fn(&CoercerOptions) -> Arc<dyn Coercer> + Send + Sync>;

/// Conversion from an arbitrary value to a typed value.
pub trait Coercer: fmt::Debug + Send + Sync {
    /// Convert `value`. Returns [`Value::Nil`] when there is no sensible
    /// conversion.
    fn typecast(&self, value: Value) -> Value;

    /// The composite form of this coercer, if it has one.
    fn composite(&self) -> Option<&dyn CompositeCoercer> {
        None
    }
}

/// A coercer that can also build its value from positional numeric parts.
pub trait CompositeCoercer: Coercer {
    /// Build a value from `parts`. Missing (`Nil`) or out-of-range parts yield
    /// [`Value::Nil`].
    fn complex_typecast(&self, parts: &[Value]) -> Value;
}

/// Names of the built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    Base,
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
}

impl AttrType {
    pub const ALL: [AttrType; 7] = [
        AttrType::Base,
        AttrType::String,
        AttrType::Integer,
        AttrType::Float,
        AttrType::Boolean,
        AttrType::Date,
        AttrType::DateTime,
    ];

    /// Registry name of this type.
    pub const fn name(self) -> &'static str {
        match self {
            AttrType::Base => "base",
            AttrType::String => "string",
            AttrType::Integer => "integer",
            AttrType::Float => "float",
            AttrType::Boolean => "boolean",
            AttrType::Date => "date",
            AttrType::DateTime => "date_time",
        }
    }
}

impl AsRef<str> for AttrType {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static BUILTIN: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::default()));

/// Shared registry holding the built-in types with default configuration.
pub fn builtin() -> Arc<TypeRegistry> {
    Arc::clone(&BUILTIN)
}

/// Maps type names to coercer factories.
#[derive(Clone)]
pub struct TypeRegistry {
    factories: IndexMap<String, CoercerFactory>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_config(&FormcastConfig::default())
    }
}

impl TypeRegistry {
    /// A registry without any types, not even `base`.
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// The built-in types, with date types honouring `config.date_formats`.
    pub fn with_config(config: &FormcastConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(AttrType::Base, |_| Arc::new(BaseType) as Arc<dyn Coercer>);
        registry.register(AttrType::String, |_| Arc::new(StringType) as Arc<dyn Coercer>);
        registry.register(AttrType::Integer, |_| Arc::new(IntegerType) as Arc<dyn Coercer>);
        registry.register(AttrType::Float, |_| Arc::new(FloatType) as Arc<dyn Coercer>);
        registry.register(AttrType::Boolean, |_| Arc::new(BooleanType) as Arc<dyn Coercer>);

        let configured = config.date_formats();
        let date_formats = configured.clone();
        registry.register(AttrType::Date, move |options| {
            Arc::new(DateType::new(formats_for(options, &date_formats))) as Arc<dyn Coercer>
        });
        registry.register(AttrType::DateTime, move |options| {
            Arc::new(DateTimeType::new(formats_for(options, &configured))) as Arc<dyn Coercer>
        });
        registry
    }

    /// Register (or replace) the factory for `name`.
    pub fn register<F>(&mut self, name: impl AsRef<str>, factory: F)
    where
        F: Fn(&CoercerOptions) -> Arc<dyn Coercer> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.as_ref().to_string(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered type names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the coercer registered under `name`.
    pub fn resolve(&self, name: &str, options: &CoercerOptions) -> Result<Arc<dyn Coercer>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| FormError::UnknownType(name.to_string()))?;
        Ok(factory(options))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Per-attribute `format` option (a pattern or list of patterns) first, then
/// the configured ones.
fn formats_for(options: &CoercerOptions, configured: &[String]) -> Vec<String> {
    let mut formats: Vec<String> = match options.get("format") {
        Some(Value::String(format)) => vec![format.clone()],
        Some(Value::List(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    formats.extend(configured.iter().cloned());
    formats
}
