//! # Configuration
//!
//! Loaded by [`clapfig`] from `annotag.toml` files, see [`crate::init::load_config`].
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `ANNOTAG__TEMPLATE_SIGIL`, `ANNOTAG__STRICT_ATTRIBUTES`.
//! 2. **Working directory**: `./annotag.toml`.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `template_sigil` | `$` | Prefix marking a template value as a task field reference |
//! | `strict_attributes` | `false` | Reject unknown authoring attributes instead of ignoring them |

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::template::{Resolver, DEFAULT_SIGIL};

/// Configuration for annotag, stored in `annotag.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TagsConfig {
    /// Prefix that turns a template value into a task field reference ("$video").
    #[config(default = "$")]
    pub template_sigil: String,

    /// Fail document loading on attributes a tag does not declare.
    #[config(default = false)]
    pub strict_attributes: bool,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            template_sigil: DEFAULT_SIGIL.to_string(),
            strict_attributes: false,
        }
    }
}

impl TagsConfig {
    /// The sigil character. An empty setting falls back to `$`; only the first
    /// character of a longer one is used.
    pub fn sigil(&self) -> char {
        self.template_sigil.chars().next().unwrap_or(DEFAULT_SIGIL)
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.sigil())
    }
}
