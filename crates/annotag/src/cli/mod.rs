//! # CLI Behavior
//!
//! This is **one possible UI client** for annotag. It reads authoring documents, task
//! data and annotations from files, drives them through the library, and prints the
//! result.
//!
//! ## Commands
//!
//! - `annotag tags [NAME]`: list the registered tags, or describe one.
//! - `annotag render DOC`: the view tree of every tag.
//! - `annotag state DOC`: the attribute state of every tag.
//! - `annotag act DOC --target T --action A`: run one action, print the change and the
//!   resulting annotation (`--save` writes it to a file).
//! - `annotag config`: the effective configuration.
//!
//! `render`, `state` and `act` accept `--task FILE` (task data to resolve templates
//! against) and `--annotation FILE` (results to load first).
//!
//! Documents and task files are YAML when their extension is `.yaml`/`.yml`, JSON
//! otherwise. Annotations are always JSON.
//!
//! ## Output
//!
//! `--output text` (default) prints a styled summary; `json` and `yaml` print the
//! underlying data. Logs go to stderr, filtered by `ANNOTAG_LOG` (`-v` for debug).
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context setup and per-command handlers
//! - `render`: output formatting
//! - `styles`: terminal styles

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
