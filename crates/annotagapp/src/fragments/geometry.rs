//! Geometry: position and size of a region.

use super::{args, Fragment};
use crate::attributes::{AttrValue, AttributeKind, AttributeSpec};

pub fn fragment() -> Fragment {
    Fragment::new("geometry")
        .attribute(AttributeSpec::state("x", AttributeKind::Number).persist_as("x"))
        .attribute(AttributeSpec::state("y", AttributeKind::Number).persist_as("y"))
        .attribute(AttributeSpec::state("width", AttributeKind::Number).persist_as("width"))
        .attribute(AttributeSpec::state("height", AttributeKind::Number).persist_as("height"))
        .action("setPosition", |ctx, args| {
            let (x, y) = args::pair(ctx.action(), args, ("x", "y"))?;
            ctx.set("x", AttrValue::Number(x))?;
            ctx.set("y", AttrValue::Number(y))
        })
        .action("setSize", |ctx, args| {
            let (width, height) = args::pair(ctx.action(), args, ("width", "height"))?;
            if width < 0.0 || height < 0.0 {
                return Err(ctx.invalid_args("width and height must not be negative"));
            }
            ctx.set("width", AttrValue::Number(width))?;
            ctx.set("height", AttrValue::Number(height))
        })
        .action("moveBy", |ctx, args| {
            let (dx, dy) = args::pair(ctx.action(), args, ("dx", "dy"))?;
            let x = ctx.number("x").unwrap_or(0.0) + dx;
            let y = ctx.number("y").unwrap_or(0.0) + dy;
            ctx.set("x", AttrValue::Number(x))?;
            ctx.set("y", AttrValue::Number(y))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose, Props};
    use crate::id::SequentialSource;
    use crate::instance::TagInstance;
    use serde_json::json;
    use std::sync::Arc;

    fn region() -> TagInstance {
        Arc::new(compose("region", vec![fragment()]).unwrap())
            .create(&Props::new(), &SequentialSource::new("g"), false)
            .unwrap()
    }

    #[test]
    fn position_and_size_update_together() {
        let mut inst = region();
        let event = inst
            .call("setPosition", &json!({"x": 10, "y": 20}))
            .unwrap();
        assert_eq!(event.changed, vec!["x", "y"]);
        inst.call("setSize", &json!([30, 40])).unwrap();
        assert_eq!(inst.get("width"), Some(&AttrValue::Number(30.0)));
        assert_eq!(inst.get("height"), Some(&AttrValue::Number(40.0)));
    }

    #[test]
    fn move_by_is_relative() {
        let mut inst = region();
        inst.call("setPosition", &json!([5, 5])).unwrap();
        inst.call("moveBy", &json!({"dx": -2, "dy": 3.5})).unwrap();
        assert_eq!(inst.get("x"), Some(&AttrValue::Number(3.0)));
        assert_eq!(inst.get("y"), Some(&AttrValue::Number(8.5)));
    }

    #[test]
    fn negative_size_is_rejected() {
        let mut inst = region();
        assert!(inst.call("setSize", &json!([-1, 4])).is_err());
        assert_eq!(inst.get("height"), Some(&AttrValue::Number(0.0)));
    }
}
