//! # API Facade
//!
//! The API layer is a **thin facade** over the registry and the document store. It is
//! the single entry point for UIs: the CLI uses it, and so would a server or a
//! browser bridge.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that lives in the fragments, `compose`, and `document`.
//! - **I/O**: no stdout, stderr, or file reading. Callers hand in parsed documents.
//! - **Presentation**: returns data structures, not strings.

use crate::compose::TagDescription;
use crate::config::TagsConfig;
use crate::document::{AuthoringDoc, Document, RenderedTag};
use crate::error::Result;
use crate::id::{IdSource, UuidSource};
use crate::registry::Registry;

pub struct TagsApi {
    registry: Registry,
    config: TagsConfig,
    ids: Box<dyn IdSource>,
}

impl TagsApi {
    pub fn new(registry: Registry, config: TagsConfig) -> Self {
        Self {
            registry,
            config,
            ids: Box::new(UuidSource),
        }
    }

    /// An API over every built-in tag.
    pub fn builtin(config: TagsConfig) -> Result<Self> {
        Ok(Self::new(Registry::with_builtin_tags()?, config))
    }

    /// Replaces the id source, e.g. with a [`SequentialSource`](crate::id::SequentialSource)
    /// for reproducible output.
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &TagsConfig {
        &self.config
    }

    pub fn open(&self, doc: &AuthoringDoc) -> Result<Document> {
        Document::from_authoring(&self.registry, doc, self.ids.as_ref(), &self.config)
    }

    pub fn render(&self, document: &Document) -> Result<Vec<RenderedTag>> {
        document.render(&self.registry)
    }

    pub fn describe_tags(&self) -> Vec<TagDescription> {
        self.registry
            .entries()
            .map(|(_, entry)| entry.model.describe())
            .collect()
    }

    pub fn describe_tag(&self, name: &str) -> Result<TagDescription> {
        Ok(self.registry.resolve(name)?.model.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TagOccurrence;
    use crate::error::AnnotagError;
    use crate::id::SequentialSource;

    fn api() -> TagsApi {
        TagsApi::builtin(TagsConfig::default())
            .unwrap()
            .with_ids(SequentialSource::new("api"))
    }

    #[test]
    fn open_uses_configured_ids() {
        let doc = AuthoringDoc {
            tags: vec![TagOccurrence::new("video").attr("value", "$v")],
        };
        let document = api().open(&doc).unwrap();
        assert_eq!(document.id().as_str(), "api-1");
        assert_eq!(document.instances()[0].id().as_str(), "api-2");
    }

    #[test]
    fn strict_config_rejects_unknown_attributes() {
        let config = TagsConfig {
            strict_attributes: true,
            ..Default::default()
        };
        let api = TagsApi::builtin(config).unwrap();
        let doc = AuthoringDoc {
            tags: vec![TagOccurrence::new("video").attr("autoplay", "true")],
        };
        assert!(matches!(
            api.open(&doc),
            Err(AnnotagError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn describe_tags_covers_registry() {
        let api = api();
        let names: Vec<_> = api.describe_tags().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["treeselect", "video"]);

        let video = api.describe_tag("Video").unwrap();
        assert!(video.actions.iter().any(|a| a.name == "onHotKey"));
        assert!(api.describe_tag("audio").is_err());
    }
}
