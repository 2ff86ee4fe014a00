use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "annotag", bin_name = "annotag", version, disable_help_subcommand = true)]
#[command(about = "Inspect, render and script annotation tag documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text, global = true, help_heading = "Options")]
    pub output: OutputFormat,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Inputs shared by every command that opens a document.
#[derive(clap::Args, Debug, Clone)]
pub struct DocArgs {
    /// Authoring document (JSON, or YAML with a .yaml/.yml extension)
    pub doc: PathBuf,

    /// Task data to resolve templates against
    #[arg(long, value_name = "FILE")]
    pub task: Option<PathBuf>,

    /// Annotation to load before running the command
    #[arg(long, value_name = "FILE")]
    pub annotation: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered tags, or describe one
    #[command(display_order = 1)]
    Tags {
        /// Tag name (case-insensitive)
        name: Option<String>,
    },

    /// Render the view of every tag in a document
    #[command(display_order = 2)]
    Render {
        #[command(flatten)]
        doc: DocArgs,
    },

    /// Show the state of every tag in a document
    #[command(display_order = 3)]
    State {
        #[command(flatten)]
        doc: DocArgs,
    },

    /// Run one action on a tag and print the resulting annotation
    #[command(display_order = 4)]
    Act {
        #[command(flatten)]
        doc: DocArgs,

        /// Tag id or name
        #[arg(long, short)]
        target: String,

        /// Action name (e.g. onChange, select, play)
        #[arg(long, short)]
        action: String,

        /// Action arguments as JSON (e.g. '["0-1-0"]')
        #[arg(long, default_value = "null")]
        args: String,

        /// Write the resulting annotation to this file
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },

    /// Show the effective configuration
    #[command(display_order = 5)]
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_act_with_shared_doc_args() {
        let cli = Cli::try_parse_from([
            "annotag", "act", "doc.yaml", "--task", "task.json", "--target", "category",
            "--action", "onChange", "--args", "[\"0-1-0\"]", "-o", "json",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Act {
                doc, target, action, args, save,
            } => {
                assert_eq!(doc.doc, PathBuf::from("doc.yaml"));
                assert_eq!(doc.task, Some(PathBuf::from("task.json")));
                assert!(doc.annotation.is_none());
                assert_eq!(target, "category");
                assert_eq!(action, "onChange");
                assert_eq!(args, "[\"0-1-0\"]");
                assert!(save.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn act_requires_target_and_action() {
        assert!(Cli::try_parse_from(["annotag", "act", "doc.json"]).is_err());
    }

    #[test]
    fn tags_name_is_optional() {
        let cli = Cli::try_parse_from(["annotag", "tags", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Tags { name: None }));
    }
}
