//! Attribute declarations.
//!
//! An [`AttributeDefinition`] binds a field name to a resolved coercer. Hosts
//! never hold per-field code: getters, setters, predicates and composite
//! setters all look the definition up by name and go through it.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{BaseType, Coercer, CoercerOptions, TypeRegistry};
use crate::value::Value;

/// Options for declaring an attribute.
///
/// ```ignore
/// AttrOptions::typed(AttrType::Date).option("format", "%d.%m.%Y")
/// AttrOptions::typed(AttrType::Boolean).with_default(false)
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrOptions {
    /// Type name looked up in the [`TypeRegistry`]; `None` means identity.
    pub type_name: Option<String>,

    /// Value assigned through the setter when a host is constructed.
    pub default: Option<Value>,

    /// Everything else, forwarded to the coercer factory.
    pub coercer_options: CoercerOptions,
}

impl AttrOptions {
    /// Untyped attribute with no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute of the given type.
    pub fn typed(type_name: impl AsRef<str>) -> Self {
        Self::new().ty(type_name)
    }

    /// Set the type name.
    pub fn ty(mut self, type_name: impl AsRef<str>) -> Self {
        self.type_name = Some(type_name.as_ref().to_string());
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Add a coercer-specific option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.coercer_options.insert(key.into(), value.into());
        self
    }
}

/// A declared attribute: name, coercer and the options it was declared with.
#[derive(Clone)]
pub struct AttributeDefinition {
    name: String,
    coercer: Arc<dyn Coercer>,
    options: AttrOptions,
}

impl AttributeDefinition {
    /// Resolve the coercer for `options` and build the definition.
    ///
    /// Fails with [`FormError::UnknownType`](crate::FormError::UnknownType)
    /// when the type name is not registered in `types`.
    pub fn new(name: impl Into<String>, options: AttrOptions, types: &TypeRegistry) -> Result<Self> {
        let coercer = match &options.type_name {
            Some(type_name) => types.resolve(type_name, &options.coercer_options)?,
            None => Arc::new(BaseType) as Arc<dyn Coercer>,
        };
        Ok(Self {
            name: name.into(),
            coercer,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.options.type_name.as_deref()
    }

    pub fn options(&self) -> &AttrOptions {
        &self.options
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.options.default.as_ref()
    }

    pub fn coercer(&self) -> &dyn Coercer {
        self.coercer.as_ref()
    }

    /// Whether the attribute accepts composite (`name(1i)`-style) assignment.
    pub fn is_composite(&self) -> bool {
        self.coercer.composite().is_some()
    }

    /// The value a setter stores for `value`.
    pub fn typecast(&self, value: Value) -> Value {
        self.coercer.typecast(value)
    }

    /// The value a composite setter stores for `parts`, or `None` when the
    /// coercer has no composite form.
    pub fn complex_typecast(&self, parts: &[Value]) -> Option<Value> {
        self.coercer
            .composite()
            .map(|composite| composite.complex_typecast(parts))
    }
}

impl fmt::Debug for AttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDefinition")
            .field("name", &self.name)
            .field("type", &self.type_name().unwrap_or("base"))
            .field("default", &self.options.default)
            .finish()
    }
}
