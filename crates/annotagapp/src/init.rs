//! # Startup
//!
//! Builds everything a process needs before opening documents: the configuration
//! and a [`TagsApi`] holding the built-in tag registry.
//!
//! ## Config Locations
//!
//! [`load_config`] merges `annotag.toml` from two places, later ones winning:
//!
//! 1. The global config directory. `ANNOTAG_CONFIG_DIR` overrides it (mostly for
//!    tests); otherwise the OS-appropriate directory from the `directories` crate.
//! 2. The working directory.
//!
//! Missing or unreadable files fall back to compiled defaults.

use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::api::TagsApi;
use crate::config::TagsConfig;
use crate::error::Result;

pub const CONFIG_FILE: &str = "annotag.toml";

pub struct AnnotagContext {
    pub api: TagsApi,
    pub config: TagsConfig,
}

pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var("ANNOTAG_CONFIG_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            ProjectDirs::from("com", "annotag", "annotag").map(|dirs| dirs.config_dir().to_path_buf())
        })
}

pub fn load_config(cwd: &Path) -> TagsConfig {
    let mut search_paths = Vec::new();
    if let Some(global) = global_config_dir() {
        search_paths.push(SearchPath::Path(global));
    }
    search_paths.push(SearchPath::Path(cwd.to_path_buf()));

    let config: TagsConfig = Clapfig::builder()
        .app_name("annotag")
        .file_name(CONFIG_FILE)
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default();
    tracing::debug!(?config, "loaded configuration");
    config
}

/// Loads the configuration and builds the built-in registry.
///
/// Fails only if a built-in tag does not compose or register, which aborts startup.
pub fn initialize(cwd: &Path) -> Result<AnnotagContext> {
    let config = load_config(cwd);
    let api = TagsApi::builtin(config.clone())?;
    Ok(AnnotagContext { api, config })
}
