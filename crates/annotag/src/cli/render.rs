//! # Rendering Module
//!
//! Turns library results into terminal text. Structured formats (JSON, YAML) print the
//! data as is; text mode prints a styled summary built by the `*_text` functions.

use super::setup::OutputFormat;
use super::styles::styles;
use annotagapp::compose::TagDescription;
use annotagapp::config::TagsConfig;
use annotagapp::document::RenderedTag;
use annotagapp::instance::ChangeEvent;
use annotagapp::views::ViewNode;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;
use std::path::Path;

const INDENT: &str = "  ";

/// Serializes `value` for structured formats, or calls `text` for the text format.
pub fn output<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Text => text(value),
    })
}

pub fn tag_list_text(tags: &[TagDescription]) -> String {
    let s = styles();
    let mut out = String::new();
    for tag in tags {
        let _ = writeln!(
            out,
            "{}  {}",
            s.tag.apply_to(&tag.name),
            s.muted.apply_to(tag.fragments.join(" + "))
        );
    }
    out
}

pub fn tag_detail_text(tag: &TagDescription) -> String {
    let s = styles();
    let mut out = String::new();
    let _ = writeln!(out, "{}", s.tag.apply_to(&tag.name));
    let _ = writeln!(out, "{}fragments: {}", INDENT, tag.fragments.join(", "));

    let _ = writeln!(out, "{}attributes:", INDENT);
    for attr in &tag.attributes {
        let mut flags = vec![attr.origin.clone()];
        if attr.required {
            flags.push("required".to_string());
        }
        if let Some(key) = &attr.persisted_as {
            flags.push(format!("persisted as {}", key));
        }
        let _ = writeln!(
            out,
            "{}{}{}: {} = {} {}",
            INDENT,
            INDENT,
            s.attribute.apply_to(&attr.name),
            attr.kind,
            attr.default,
            s.muted.apply_to(format!("({})", flags.join(", ")))
        );
    }

    let _ = writeln!(out, "{}actions:", INDENT);
    for action in &tag.actions {
        let _ = writeln!(
            out,
            "{}{}{} {}",
            INDENT,
            INDENT,
            s.action.apply_to(&action.name),
            s.muted.apply_to(format!("[{}]", action.fragment))
        );
    }
    out
}

fn prop_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            let joined: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            format!("[{}]", joined.join(", "))
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) => match map.get("action").and_then(Value::as_str) {
            Some(action) if map.len() == 1 => format!("-> {}", action),
            _ => "{...}".to_string(),
        },
        other => other.to_string(),
    }
}

fn node_text(node: &ViewNode, depth: usize, out: &mut String) {
    let s = styles();
    let props: Vec<String> = node
        .props
        .iter()
        .map(|(name, value)| format!("{}={}", name, prop_text(value)))
        .collect();
    let _ = writeln!(
        out,
        "{}{} {}",
        INDENT.repeat(depth),
        s.action.apply_to(&node.kind),
        props.join(" ")
    );
    for child in &node.children {
        node_text(child, depth + 1, out);
    }
}

pub fn rendered_text(tags: &[RenderedTag]) -> String {
    let s = styles();
    let mut out = String::new();
    for tag in tags {
        let _ = writeln!(
            out,
            "{} {}",
            s.tag.apply_to(&tag.tag_type),
            s.id.apply_to(&tag.id)
        );
        match &tag.view {
            Some(node) => node_text(node, 1, &mut out),
            None => {
                let _ = writeln!(out, "{}{}", INDENT, s.muted.apply_to("(nothing to render)"));
            }
        }
    }
    out
}

pub fn states_text(states: &[Value]) -> String {
    let s = styles();
    let mut out = String::new();
    for state in states {
        let _ = writeln!(
            out,
            "{} {} {}",
            s.tag.apply_to(state["type"].as_str().unwrap_or("?")),
            s.id.apply_to(state["id"].as_str().unwrap_or("?")),
            s.muted.apply_to(format!("v{}", state["version"]))
        );
        if let Some(attributes) = state["attributes"].as_object() {
            for (name, value) in attributes {
                let _ = writeln!(
                    out,
                    "{}{} = {}",
                    INDENT,
                    s.attribute.apply_to(name),
                    prop_text(value)
                );
            }
        }
    }
    out
}

pub fn change_text(change: &ChangeEvent, saved: Option<&Path>) -> String {
    let s = styles();
    let mut out = String::new();
    if change.is_empty() {
        let _ = writeln!(out, "{}", s.muted.apply_to("No changes."));
    } else {
        let _ = writeln!(
            out,
            "Updated {} {} {}",
            s.id.apply_to(&change.id),
            change.changed.join(", "),
            s.muted.apply_to(format!("(v{})", change.version))
        );
    }
    if let Some(path) = saved {
        let _ = writeln!(out, "Saved annotation to {}", path.display());
    }
    out
}

pub fn config_text(config: &TagsConfig) -> String {
    let s = styles();
    format!(
        "{} = {}\n{} = {}\n",
        s.attribute.apply_to("template_sigil"),
        config.template_sigil,
        s.attribute.apply_to("strict_attributes"),
        config.strict_attributes
    )
}
