//! `video`: an object tag that plays a media file taken from the task.
//!
//! ```text
//! <Video name="clip" value="$video" width="640" hotkey="space"/>
//! ```
//!
//! `value` is a template resolved against the task data; until it resolves the tag
//! renders nothing. Persisted results that target a video carry the choices of a
//! classification control pointed at it, so the video routes them to that control
//! (by `from_name`) instead of loading them itself.

use serde_json::json;

use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};
use crate::compose::{compose, TagModel};
use crate::error::Result;
use crate::fragments::{playback, templated, Fragment};
use crate::instance::StateView;
use crate::snapshot::SnapshotRoute;
use crate::views::ViewNode;

pub const NAME: &str = "video";

fn attrs() -> Fragment {
    Fragment::attrs(
        NAME,
        vec![
            AttributeSpec::authored("name", AttributeKind::OptText),
            AttributeSpec::authored("width", AttributeKind::Text)
                .with_default(AttrValue::Text("320".to_string())),
            AttributeSpec::authored("height", AttributeKind::Text)
                .with_default(AttrValue::Text("240".to_string())),
            AttributeSpec::authored("hotkey", AttributeKind::OptText),
        ],
    )
}

pub fn model() -> Result<TagModel> {
    Ok(compose(NAME, vec![attrs(), templated::fragment(), playback::fragment()])?
        .with_snapshot_route(SnapshotRoute::DelegateChoices))
}

pub fn render(state: &StateView) -> Option<ViewNode> {
    let src = state.text("resolved_value").filter(|src| !src.is_empty())?;
    let mut player = ViewNode::new("video")
        .prop("width", state.text("width").unwrap_or("320"))
        .prop("height", state.text("height").unwrap_or("240"))
        .prop("controls", true)
        .prop("playing", state.flag("playing"))
        .child(
            ViewNode::new("source")
                .prop("src", src)
                .prop("type", "video/mp4"),
        );
    if let Some(hotkey) = state.text("hotkey") {
        player = player
            .prop("hotkey", json!(hotkey))
            .bind("onHotKey", "onHotKey");
    }
    Some(ViewNode::new("div").child(player))
}
