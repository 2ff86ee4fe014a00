//! Highlight state: whether the tag is the currently selected one in the UI.

use super::{args, Fragment};
use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};

pub fn fragment() -> Fragment {
    Fragment::new("selected")
        .attribute(AttributeSpec::state("selected", AttributeKind::Bool))
        .action("setSelected", |ctx, args| {
            let flag = args::boolean(ctx.action(), args)?;
            ctx.set("selected", AttrValue::Bool(flag))
        })
        .action("toggleSelected", |ctx, args| {
            args::none(ctx.action(), args)?;
            let flag = !ctx.flag("selected").unwrap_or(false);
            ctx.set("selected", AttrValue::Bool(flag))
        })
}
