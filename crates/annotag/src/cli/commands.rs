//! # CLI Layer
//!
//! The only place that knows about files, stdout, stderr and log setup.
//!
//! 1. **Argument Parsing**: clap, in `setup.rs`
//! 2. **Context Setup**: logging, configuration and the tag API via `annotagapp::init`
//! 3. **Dispatch**: one handler per command
//! 4. **Output Formatting**: `render.rs`

use super::render::{self, output};
use super::setup::{Cli, Commands, DocArgs, OutputFormat};
use annotagapp::document::{AuthoringDoc, Document};
use annotagapp::init::{initialize, AnnotagContext};
use annotagapp::snapshot::Annotation;
use annotagapp::template::TaskData;
use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = initialize(&cwd).context("failed to set up the tag registry")?;

    let text = match cli.command {
        Commands::Tags { name } => handle_tags(&ctx, name.as_deref(), cli.output)?,
        Commands::Render { doc } => handle_render(&ctx, &doc, cli.output)?,
        Commands::State { doc } => handle_state(&ctx, &doc, cli.output)?,
        Commands::Act {
            doc,
            target,
            action,
            args,
            save,
        } => handle_act(&ctx, &doc, &target, &action, &args, save.as_deref(), cli.output)?,
        Commands::Config => output(cli.output, &ctx.config, render::config_text)?,
    };
    print!("{}", text);
    Ok(())
}

/// Logs go to stderr. `ANNOTAG_LOG` takes `EnvFilter` directives; without it, warnings
/// only, or debug with `-v`.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("ANNOTAG_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_structured<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read {} {}", what, path.display()))?;
    let parsed = if is_yaml(path) {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid {} {}", what, path.display()))?
    } else {
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid {} {}", what, path.display()))?
    };
    Ok(parsed)
}

/// Opens the document, then applies the task and the annotation when given.
fn open_document(ctx: &AnnotagContext, args: &DocArgs) -> Result<Document> {
    let doc: AuthoringDoc = read_structured(&args.doc, "document")?;
    let mut document = ctx.api.open(&doc)?;

    if let Some(path) = &args.task {
        let task: TaskData = read_structured(path, "task")?;
        document.set_task(task)?;
    }
    if let Some(path) = &args.annotation {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read annotation {}", path.display()))?;
        let annotation: Annotation = serde_json::from_str(&raw)
            .with_context(|| format!("invalid annotation {}", path.display()))?;
        let changes = document.load_annotation(&annotation);
        tracing::debug!(loaded = changes.len(), "applied annotation");
    }
    Ok(document)
}

fn handle_tags(ctx: &AnnotagContext, name: Option<&str>, format: OutputFormat) -> Result<String> {
    match name {
        Some(name) => {
            let tag = ctx.api.describe_tag(name)?;
            output(format, &tag, render::tag_detail_text)
        }
        None => {
            let tags = ctx.api.describe_tags();
            output(format, &tags[..], render::tag_list_text)
        }
    }
}

fn handle_render(ctx: &AnnotagContext, args: &DocArgs, format: OutputFormat) -> Result<String> {
    let document = open_document(ctx, args)?;
    let rendered = ctx.api.render(&document)?;
    output(format, &rendered[..], render::rendered_text)
}

fn handle_state(ctx: &AnnotagContext, args: &DocArgs, format: OutputFormat) -> Result<String> {
    let document = open_document(ctx, args)?;
    let states: Vec<Value> = document
        .instances()
        .iter()
        .map(|instance| instance.view().to_json())
        .collect();
    output(format, &states[..], render::states_text)
}

fn handle_act(
    ctx: &AnnotagContext,
    args: &DocArgs,
    target: &str,
    action: &str,
    action_args: &str,
    save: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let action_args: Value =
        serde_json::from_str(action_args).context("--args must be valid JSON")?;
    let mut document = open_document(ctx, args)?;
    let change = document.call(target, action, &action_args)?;
    let annotation = document.to_annotation();

    if let Some(path) = save {
        fs::write(path, serde_json::to_string_pretty(&annotation)?)
            .with_context(|| format!("could not write annotation {}", path.display()))?;
    }

    match format {
        OutputFormat::Text => Ok(render::change_text(&change, save)),
        _ => output(
            format,
            &json!({ "change": change, "annotation": annotation }),
            |_| String::new(),
        ),
    }
}
