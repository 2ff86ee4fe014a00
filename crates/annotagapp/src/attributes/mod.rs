//! # Attribute System
//!
//! Every piece of tag state is an attribute. Instead of each tag carrying its own
//! struct of fields, the attribute system provides:
//!
//! - **Shapes**: what kinds of values attributes can hold ([`AttributeKind`])
//! - **Specifications**: per-attribute metadata: origin, default, persistence key
//! - **Values**: one runtime representation ([`AttrValue`]) shared by every tag
//!
//! ## Attribute Shapes
//!
//! | Kind | Examples | Description |
//! |------|----------|-------------|
//! | `Bool` | `showinline`, `playing` | Simple true/false |
//! | `Number` | `x`, `width` (geometry) | Floating point |
//! | `Text` | `name` on a control | Always present |
//! | `OptText` | `toname`, `value` | May be absent |
//! | `Enum` | `choice`, `strategy` | Closed set of values |
//! | `List` | `selection`, `labels` | Ordered strings |
//!
//! ## Origins
//!
//! | Origin | Set by | Persisted |
//! |--------|--------|-----------|
//! | `Authored` | authoring document at creation (and `set_attr` if editable) | if `persist_as` |
//! | `State` | the owning fragment's actions only | if `persist_as` |
//! | `Derived` | task-context hooks | never |

mod spec;
mod value;

pub use spec::{AttrOrigin, AttributeKind, AttributeSpec};
pub use value::AttrValue;
