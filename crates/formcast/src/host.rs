//! # Attribute Hosts
//!
//! A host is any object carrying declared attributes. It supplies three
//! primitives, and gets everything else from [`AttributeHost`]'s provided
//! methods:
//!
//! | Primitive | Purpose |
//! |-----------|---------|
//! | `registry()` | the host type's [`AttributeRegistry`] |
//! | `store(name, value)` | write one already-typed value |
//! | `read(name)` | read one value back |
//!
//! On top of those, the trait provides the per-attribute behaviours, all
//! resolved through the attribute's definition at call time:
//!
//! - **getter** [`get`](AttributeHost::get): stored value, Nil when unset
//! - **setter** [`set`](AttributeHost::set): stores `coercer.typecast(value)`
//! - **predicate** [`is_present`](AttributeHost::is_present): stored value is not blank
//! - **composite setter** [`set_composite`](AttributeHost::set_composite):
//!   stores `coercer.complex_typecast(parts)` through the setter
//!
//! Declared defaults are applied by
//! [`assign_defaults`](AttributeHost::assign_defaults), which hosts call once
//! when an instance is constructed.
//!
//! The assignment engine only talks to hosts through the capability checks
//! [`has_setter`](AttributeHost::has_setter) and
//! [`has_composite_setter`](AttributeHost::has_composite_setter) and the two
//! setters. Hosts may override those to accept keys that are not declared
//! attributes (a `full_name` key split into two fields, say).
//!
//! [`Form`] is the stock host: a shared registry plus a per-instance map.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assignment::{Assignment, UnknownKeys};
use crate::error::{FormError, Result};
use crate::registry::AttributeRegistry;
use crate::value::Value;

static NIL: Value = Value::Nil;

pub trait AttributeHost {
    /// Registry of the host's type.
    fn registry(&self) -> &AttributeRegistry;

    /// Write an already-typed value.
    fn store(&mut self, name: &str, value: Value);

    /// Read a stored value; `None` when never stored.
    fn read(&self, name: &str) -> Option<&Value>;

    /// Current value of `name`, Nil when unset or undeclared.
    fn get(&self, name: &str) -> &Value {
        self.read(name).unwrap_or(&NIL)
    }

    /// Whether `name` currently holds a non-blank value.
    fn is_present(&self, name: &str) -> bool {
        self.get(name).is_present()
    }

    fn has_setter(&self, name: &str) -> bool {
        self.registry().contains(name)
    }

    fn has_composite_setter(&self, name: &str) -> bool {
        self.registry()
            .get(name)
            .is_some_and(|definition| definition.is_composite())
    }

    /// Typecast `value` through the attribute's coercer and store it.
    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let typed = match self.registry().get(name) {
            Some(definition) => definition.typecast(value),
            None => return Err(FormError::UnknownAttribute(name.to_string())),
        };
        self.store(name, typed);
        Ok(())
    }

    /// Build the attribute's value from positional parts and hand it to
    /// [`set`](Self::set).
    fn set_composite(&mut self, name: &str, parts: &[Value]) -> Result<()> {
        let value = self
            .registry()
            .get(name)
            .and_then(|definition| definition.complex_typecast(parts))
            .ok_or_else(|| FormError::MissingCompositeSetter(name.to_string()))?;
        self.set(name, value)
    }

    /// Pass every declared default through [`set`](Self::set), in declaration
    /// order.
    fn assign_defaults(&mut self) -> Result<()> {
        let defaults: Vec<(String, Value)> = self
            .registry()
            .iter()
            .filter_map(|definition| {
                definition
                    .default_value()
                    .map(|value| (definition.name().to_string(), value.clone()))
            })
            .collect();
        for (name, value) in defaults {
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// Assign a batch, failing on the first key without a setter.
    fn assign_attributes<I, K, V>(&mut self, batch: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Assignment::new(self).perform(batch)
    }

    /// Assign a batch, skipping keys without a setter.
    fn assign_defined_attributes<I, K, V>(&mut self, batch: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Assignment::new(self)
            .unknown_keys(UnknownKeys::Ignore)
            .perform(batch)
    }
}

/// Stock host: a shared registry and per-instance storage.
#[derive(Debug, Clone)]
pub struct Form {
    registry: Arc<AttributeRegistry>,
    values: HashMap<String, Value>,
}

impl Form {
    /// New instance with every declared default assigned through the setter.
    pub fn new(registry: Arc<AttributeRegistry>) -> Self {
        let mut form = Self {
            registry,
            values: HashMap::new(),
        };
        // Defaults only name declared attributes, which the stock setter accepts.
        let assigned = form.assign_defaults();
        debug_assert!(assigned.is_ok());
        form
    }

    /// New instance with `batch` assigned on top of the defaults.
    pub fn with_attributes<I, K, V>(registry: Arc<AttributeRegistry>, batch: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut form = Self::new(registry);
        form.assign_attributes(batch)?;
        Ok(form)
    }

    /// Every declared attribute with its current value, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.registry
            .names()
            .map(move |name| (name, self.get(name)))
    }
}

impl AttributeHost for Form {
    fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    fn store(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn read(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
