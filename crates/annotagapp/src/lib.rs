//! # Annotag Architecture
//!
//! Annotag models the tags of a data-annotation UI: controls such as a tree
//! classifier and objects such as a video player. Each tag type is a serializable
//! state model composed from reusable fragments, paired with a pure view function.
//! This is a library that happens to have a CLI client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (annotag crate)                                        │
//! │  - Parses arguments, reads files, formats output            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade: open documents, describe tags               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Documents (document.rs) and the Registry (registry.rs)     │
//! │  - Instances of one authoring document, task, change log    │
//! │  - Tag name → composed model + view renderer                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Models (fragments/, compose.rs, instance.rs, snapshot.rs)  │
//! │  - Fragments merged into tag models, atomic instances,      │
//! │    persisted form                                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O in the Core
//!
//! Nothing below the CLI writes to stdout or stderr, exits the process, or assumes a
//! terminal. Diagnostics go through `tracing`; whoever embeds the library decides
//! where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Fragments and models**: unit tests next to the code.
//! 2. **Documents**: integration tests in `tests/`, driving full scenarios through
//!    the built-in tags.
//! 3. **CLI**: end-to-end tests in the `annotag` crate running the binary.

pub mod api;
pub mod attributes;
pub mod compose;
pub mod config;
pub mod document;
pub mod error;
pub mod fragments;
pub mod id;
pub mod init;
pub mod instance;
pub mod registry;
pub mod snapshot;
pub mod tags;
pub mod template;
pub mod views;

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures;

pub use api::TagsApi;
pub use error::{AnnotagError, Result};
