//! Per-host attribute registries.
//!
//! Each host type owns one [`AttributeRegistry`]: the ordered set of its
//! declared attributes. Registries never consult each other. A derived host
//! type starts from a snapshot of its base ([`AttributeRegistry::derive`]),
//! after which the two evolve independently: declaring on the base does not
//! reach the derived registry and declaring on the derived registry does not
//! reach the base.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::attribute::{AttrOptions, AttributeDefinition};
use crate::error::Result;
use crate::types::{self, TypeRegistry};

#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    host: String,
    types: Arc<TypeRegistry>,
    definitions: IndexMap<String, AttributeDefinition>,
}

impl AttributeRegistry {
    /// Empty registry for `host`, resolving types through the built-in registry.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_types(host, types::builtin())
    }

    /// Empty registry for `host` resolving types through `types`.
    pub fn with_types(host: impl Into<String>, types: Arc<TypeRegistry>) -> Self {
        Self {
            host: host.into(),
            types,
            definitions: IndexMap::new(),
        }
    }

    /// Name of the host type owning this registry.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Declare an attribute and return its definition.
    ///
    /// Redeclaring an existing name replaces its definition but keeps its
    /// original position.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        options: AttrOptions,
    ) -> Result<&AttributeDefinition> {
        let name = name.into();
        let definition = AttributeDefinition::new(name.clone(), options, &self.types)?;
        debug!(
            host = %self.host,
            attribute = %name,
            attr_type = definition.type_name().unwrap_or("base"),
            "declared attribute"
        );
        let (index, _) = self.definitions.insert_full(name, definition);
        Ok(&self.definitions[index])
    }

    /// Builder form of [`declare`](Self::declare).
    pub fn attribute(mut self, name: impl Into<String>, options: AttrOptions) -> Result<Self> {
        self.declare(name, options)?;
        Ok(self)
    }

    /// Registry for a type derived from this one, starting from a copy of the
    /// current definitions.
    pub fn derive(&self, host: impl Into<String>) -> Self {
        let host = host.into();
        debug!(
            base = %self.host,
            derived = %host,
            attributes = self.definitions.len(),
            "derived attribute registry"
        );
        Self {
            host,
            types: Arc::clone(&self.types),
            definitions: self.definitions.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
