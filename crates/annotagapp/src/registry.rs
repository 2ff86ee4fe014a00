//! # Tag Registry
//!
//! Maps a tag type name to its composed [`TagModel`] and its [`ViewRenderer`].
//!
//! ## Lifecycle
//!
//! The registry is filled once, at startup, through a [`RegistryBuilder`], and then
//! frozen into a [`Registry`] that only supports lookups. There is no unregister, and
//! registering a name twice is an error rather than an overwrite. A process typically
//! builds one registry with [`Registry::with_builtin_tags`] and passes it by reference
//! to every document it opens; dropping it is the teardown.
//!
//! Names are stored lowercase and looked up case-insensitively, so an authoring
//! document may write `TreeSelect` for the `treeselect` tag.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::compose::TagModel;
use crate::error::{AnnotagError, Result};
use crate::tags::{self, validate_tag_name};
use crate::views::ViewRenderer;

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub model: Arc<TagModel>,
    pub view: ViewRenderer,
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<String, RegistryEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: TagModel, view: ViewRenderer) -> Result<&mut Self> {
        let name = model.name().to_string();
        validate_tag_name(&name).map_err(|e| AnnotagError::InvalidTagName {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        if self.entries.contains_key(&name) {
            return Err(AnnotagError::DuplicateTag(name));
        }
        tracing::debug!(tag = %name, "registered tag");
        self.entries.insert(
            name,
            RegistryEntry {
                model: Arc::new(model),
                view,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry holding every built-in tag.
    pub fn with_builtin_tags() -> Result<Self> {
        let mut builder = RegistryBuilder::new();
        tags::register_builtin(&mut builder)?;
        Ok(builder.build())
    }

    pub fn resolve(&self, name: &str) -> Result<&RegistryEntry> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| AnnotagError::UnknownTag(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
