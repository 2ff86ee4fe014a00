//! Labels applied to a labeling target.

use super::{args, Fragment};
use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};

pub fn fragment() -> Fragment {
    Fragment::new("labeling")
        .attribute(AttributeSpec::state("labels", AttributeKind::List).persist_as("labels"))
        .action("addLabel", |ctx, args| {
            let label = args::string(ctx.action(), args)?;
            let mut labels = ctx.list("labels");
            if !labels.contains(&label) {
                labels.push(label);
            }
            ctx.set("labels", AttrValue::List(labels))
        })
        .action("removeLabel", |ctx, args| {
            let label = args::string(ctx.action(), args)?;
            let labels = ctx.list("labels").into_iter().filter(|l| *l != label).collect();
            ctx.set("labels", AttrValue::List(labels))
        })
        .action("toggleLabel", |ctx, args| {
            let label = args::string(ctx.action(), args)?;
            let mut labels = ctx.list("labels");
            match labels.iter().position(|l| *l == label) {
                Some(pos) => {
                    labels.remove(pos);
                }
                None => labels.push(label),
            }
            ctx.set("labels", AttrValue::List(labels))
        })
        .action("clearLabels", |ctx, args| {
            args::none(ctx.action(), args)?;
            ctx.set("labels", AttrValue::List(Vec::new()))
        })
}
