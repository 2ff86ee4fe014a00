//! # Built-in Tags
//!
//! Each built-in tag lives in its own module and exposes a `model()` that composes
//! its fragments and a `render` view function. [`register_builtin`] adds all of them
//! to a [`RegistryBuilder`].
//!
//! | Tag | Kind | Fragments |
//! |-----|------|-----------|
//! | [`treeselect`] | control | labeling, geometry, attributes, selection, selected |
//! | [`video`] | object | attributes, templated value, playback |
//!
//! ## Tag Naming Rules
//!
//! See the [`validation`] module. Registration refuses names that fail it.

pub mod treeselect;
pub mod validation;
pub mod video;

pub use validation::{validate_tag_name, TagNameError};

use crate::error::Result;
use crate::registry::RegistryBuilder;

pub fn register_builtin(builder: &mut RegistryBuilder) -> Result<()> {
    builder
        .register(treeselect::model()?, treeselect::render)?
        .register(video::model()?, video::render)?;
    Ok(())
}
