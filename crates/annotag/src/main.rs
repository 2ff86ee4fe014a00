//! # Annotag CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/annotagapp/`: the library. Tag models, registry, documents, snapshots.
//! - `crates/annotag/`: this CLI, a client of the library's `TagsApi`.
//!
//! Everything from `TagsApi` inward is UI agnostic. The CLI owns argument parsing,
//! file reading, log setup, output formatting, and exit codes.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
