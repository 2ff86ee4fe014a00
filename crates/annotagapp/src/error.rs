use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotagError {
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Tag already registered: {0}")]
    DuplicateTag(String),

    #[error("Invalid tag name '{name}': {reason}")]
    InvalidTagName { name: String, reason: String },

    #[error("Composition conflict in '{tag}': {detail}")]
    CompositionConflict { tag: String, detail: String },

    #[error("Unknown action '{action}' on tag '{tag}'")]
    UnknownAction { tag: String, action: String },

    #[error("Invalid arguments for action '{action}': {reason}")]
    InvalidActionArgs { action: String, reason: String },

    #[error("Attribute '{attribute}' is not owned by fragment '{fragment}'")]
    AttributeNotOwned { fragment: String, attribute: String },

    #[error("Attribute '{0}' is read-only")]
    ReadOnlyAttribute(String),

    #[error("Unknown attribute '{attribute}' on tag '{tag}'")]
    UnknownAttribute { tag: String, attribute: String },

    #[error("Missing required attribute '{attribute}' on tag '{tag}'")]
    MissingAttribute { tag: String, attribute: String },

    #[error("Invalid value for attribute '{attribute}': {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    #[error("Tag name '{0}' is used more than once in the document")]
    DuplicateName(String),

    #[error("No tag instance matches '{0}'")]
    UnknownTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnnotagError>;
