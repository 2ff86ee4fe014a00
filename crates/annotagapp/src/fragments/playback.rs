//! Play/pause state of a media tag, toggled by the tag's hotkey.

use super::{args, Fragment};
use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};

pub fn fragment() -> Fragment {
    Fragment::new("playback")
        .attribute(AttributeSpec::state("playing", AttributeKind::Bool))
        .action("play", |ctx, args| {
            args::none(ctx.action(), args)?;
            ctx.set("playing", AttrValue::Bool(true))
        })
        .action("pause", |ctx, args| {
            args::none(ctx.action(), args)?;
            ctx.set("playing", AttrValue::Bool(false))
        })
        .action("onHotKey", |ctx, _| {
            let playing = ctx.flag("playing").unwrap_or(false);
            ctx.set("playing", AttrValue::Bool(!playing))
        })
}
