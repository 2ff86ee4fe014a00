//! Templated value: an authored `value` that may reference task data.
//!
//! The authored `value` (e.g. `"$video"`) is kept as written. Whenever the document's
//! task changes, `resolved_value` is recomputed from it; a missing field leaves
//! `resolved_value` empty, which renderers read as "nothing to show yet".

use super::{args, Fragment};
use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};
use crate::error::Result;
use crate::instance::{ActionContext, TaskContext};

fn resolve_into(ctx: &mut ActionContext<'_>, task: Option<&TaskContext>) -> Result<()> {
    let resolved = match (ctx.text("value"), task) {
        (Some(raw), Some(task)) => task.resolve_string(raw),
        _ => None,
    };
    ctx.set("resolved_value", AttrValue::OptText(resolved))
}

pub fn fragment() -> Fragment {
    Fragment::new("templated")
        .attribute(AttributeSpec::authored("value", AttributeKind::OptText))
        .attribute(AttributeSpec::derived("resolved_value", AttributeKind::OptText))
        .on_task(|ctx, task| resolve_into(ctx, Some(task)))
        .action("updateValue", |ctx, args| {
            args::none(ctx.action(), args)?;
            let task = ctx.task().cloned();
            resolve_into(ctx, task.as_ref())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose, Props};
    use crate::id::SequentialSource;
    use crate::instance::TagInstance;
    use crate::template::{Resolver, TaskData};
    use serde_json::json;
    use std::sync::Arc;

    fn media(value: &str) -> TagInstance {
        let mut props = Props::new();
        props.insert("value".into(), value.into());
        Arc::new(compose("media", vec![fragment()]).unwrap())
            .create(&props, &SequentialSource::new("v"), false)
            .unwrap()
    }

    fn task(value: serde_json::Value) -> TaskContext {
        let data: TaskData = serde_json::from_value(value).unwrap();
        TaskContext::new(Resolver::default(), data)
    }

    #[test]
    fn unresolved_before_any_task() {
        let inst = media("$clip");
        assert_eq!(inst.get("resolved_value"), Some(&AttrValue::OptText(None)));
    }

    #[test]
    fn task_change_resolves_reference() {
        let mut inst = media("$clip");
        let event = inst.apply_task(task(json!({"clip": "http://x/v.mp4"}))).unwrap();
        assert_eq!(event.changed, vec!["resolved_value"]);
        assert_eq!(inst.text("resolved_value"), Some("http://x/v.mp4"));
        assert_eq!(inst.text("value"), Some("$clip"));
    }

    #[test]
    fn missing_field_resolves_to_nothing() {
        let mut inst = media("$clip");
        inst.apply_task(task(json!({}))).unwrap();
        assert_eq!(inst.text("resolved_value"), None);
    }

    #[test]
    fn literal_value_passes_through() {
        let mut inst = media("local.mp4");
        inst.apply_task(task(json!({}))).unwrap();
        assert_eq!(inst.text("resolved_value"), Some("local.mp4"));
    }

    #[test]
    fn update_value_uses_last_task() {
        let mut inst = media("$clip");
        inst.call("updateValue", &json!(null)).unwrap();
        assert_eq!(inst.text("resolved_value"), None);

        inst.apply_task(task(json!({"clip": "a.mp4"}))).unwrap();
        let event = inst.call("updateValue", &json!(null)).unwrap();
        assert!(event.is_empty());
        assert_eq!(inst.text("resolved_value"), Some("a.mp4"));
    }
}
