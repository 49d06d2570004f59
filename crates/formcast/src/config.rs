//! # Configuration
//!
//! Library-wide settings are managed by [`confique`], which handles layered
//! loading from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `FORMCAST_IGNORE_UNKNOWN`.
//! 2. **Config file**: the TOML file passed to [`FormcastConfig::load`], if it exists.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `ignore_unknown` | `false` | Skip batch keys with no matching setter instead of failing |
//! | `date_formats` | none | Extra `strftime` patterns tried by date and date_time coercers |
//!
//! Settings only take effect where they are handed in: the unknown-key policy
//! through [`Assignment::configured`](crate::Assignment::configured), the date
//! formats through [`TypeRegistry::with_config`](crate::TypeRegistry::with_config).

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::assignment::UnknownKeys;
use crate::error::Result;

/// Configuration for formcast, usually stored in `formcast.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FormcastConfig {
    /// Skip batch keys that have no matching setter instead of failing.
    #[config(default = false, env = "FORMCAST_IGNORE_UNKNOWN")]
    pub ignore_unknown: bool,

    /// Extra `strftime` patterns for date and date_time strings, tried in
    /// order before the built-in parser.
    pub date_formats: Option<Vec<String>>,
}

impl Default for FormcastConfig {
    fn default() -> Self {
        Self {
            ignore_unknown: false,
            date_formats: None,
        }
    }
}

impl FormcastConfig {
    /// Load configuration from the environment, then `path` (when given and
    /// present), then the compiled defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// Policy the assignment engine applies to unresolvable keys.
    pub fn unknown_keys(&self) -> UnknownKeys {
        if self.ignore_unknown {
            UnknownKeys::Ignore
        } else {
            UnknownKeys::Raise
        }
    }

    /// Configured date patterns, empty when unset.
    pub fn date_formats(&self) -> Vec<String> {
        self.date_formats.clone().unwrap_or_default()
    }
}
