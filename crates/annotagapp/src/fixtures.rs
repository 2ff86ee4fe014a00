//! Ready-made documents and tasks for tests.

use serde_json::{json, Value};

use crate::config::TagsConfig;
use crate::document::{AuthoringDoc, Document, TagOccurrence};
use crate::id::SequentialSource;
use crate::registry::Registry;
use crate::template::TaskData;

/// A video with a classification tree pointed at it.
pub fn video_classification() -> AuthoringDoc {
    AuthoringDoc {
        tags: vec![
            TagOccurrence::new("Video")
                .attr("name", "clip")
                .attr("value", "$video"),
            TagOccurrence::new("TreeSelect")
                .attr("name", "category")
                .attr("toName", "clip"),
        ],
    }
}

pub fn task(value: Value) -> TaskData {
    match value {
        Value::Object(map) => map,
        _ => TaskData::new(),
    }
}

pub fn video_task(url: &str) -> TaskData {
    task(json!({ "video": url }))
}

pub struct DocumentFixture {
    pub registry: Registry,
    pub document: Document,
}

impl DocumentFixture {
    pub fn open(doc: &AuthoringDoc) -> Self {
        let registry = Registry::with_builtin_tags().expect("built-in tags must register");
        let document = Document::from_authoring(
            &registry,
            doc,
            &SequentialSource::new("fx"),
            &TagsConfig::default(),
        )
        .expect("fixture document must open");
        Self { registry, document }
    }

    pub fn video_classification() -> Self {
        Self::open(&video_classification())
    }
}
