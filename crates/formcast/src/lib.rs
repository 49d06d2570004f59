//! # Formcast
//!
//! Formcast turns loosely typed request parameters into typed attributes on
//! form objects. A form type declares its attributes once; an instance then
//! accepts a flat batch of `key => value` pairs (as submitted by an HTML form
//! or decoded from a JSON body) and stores each value converted to its
//! attribute's type.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Assignment (assignment.rs)                                 │
//! │  - Routes a batch: simple keys now, composite parts later   │
//! │  - Fails fast on keys the host cannot handle                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Hosts (host.rs)                                            │
//! │  - AttributeHost: getter, setter, predicate, composite set  │
//! │  - Form: the stock host                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Declarations (registry.rs, attribute.rs)                   │
//! │  - One registry per host type, ordered, never shared        │
//! │  - Each attribute bound to a coercer at declaration time    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Types (types/)                                             │
//! │  - Coercers: Value in, Value out, never fail                │
//! │  - TypeRegistry: type name -> coercer factory               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Composite Keys
//!
//! Date pickers built from several `<select>`s submit one key per component:
//! `birthday(1i)`, `birthday(2i)`, `birthday(3i)`. The assignment engine
//! collects those parts per field and hands them, in position order, to the
//! field's composite setter after the rest of the batch has been applied.
//! See [`assignment`] for the exact rules.
//!
//! ## Absent Values
//!
//! [`Value::Nil`] means "no value". Coercers return it for input they cannot
//! interpret, getters return it for unset attributes. Coercion never fails;
//! reporting bad input is left to validation built on top of this crate.
//!
//! ## Example
//!
//! ```ignore
//! let registry = AttributeRegistry::new("SignUp")
//!     .attribute("name", AttrOptions::typed(AttrType::String))?
//!     .attribute("birthday", AttrOptions::typed(AttrType::Date))?;
//!
//! let mut form = Form::new(Arc::new(registry));
//! form.assign_attributes(Params::from_json_str(body)?)?;
//! ```

pub mod assignment;
pub mod attribute;
pub mod config;
pub mod error;
pub mod host;
pub mod params;
pub mod registry;
pub mod types;
pub mod value;

pub use assignment::{Assignment, CompositeKey, PartKind, UnknownKeys};
pub use attribute::{AttrOptions, AttributeDefinition};
pub use config::FormcastConfig;
pub use error::{FormError, Result};
pub use host::{AttributeHost, Form};
pub use params::Params;
pub use registry::AttributeRegistry;
pub use types::{AttrType, Coercer, CompositeCoercer, TypeRegistry};
pub use value::{Object, Value};
