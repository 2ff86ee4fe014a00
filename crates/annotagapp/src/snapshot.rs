//! # Snapshots
//!
//! The persisted form of a tag instance, and the conversion in both directions.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "id": "a1b2c3",
//!   "type": "treeselect",
//!   "from_name": "category",
//!   "to_name": "txt-1",
//!   "value": { "choices": ["0-1-0", "0-1-1"], "labels": [] }
//! }
//! ```
//!
//! Inside `value`, each attribute appears under its persisted key
//! ([`AttributeSpec::persist_as`](crate::attributes::AttributeSpec::persist_as)), which
//! need not match the internal name (`selection` is persisted as `choices`). Derived
//! attributes are never written.
//!
//! ## Loading
//!
//! Loading only touches what it recognizes:
//!
//! - Unknown keys in `value` are ignored.
//! - A recognized key that is absent leaves the attribute as it is.
//! - A recognized key with the wrong shape resets the owning fragment's state to its
//!   defaults. Other fragments still load.
//! - `id` and `type` of the target instance never change.
//!
//! Shape problems are logged, never returned as errors, so one bad result cannot
//! abort loading a whole annotation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::attributes::{AttrOrigin, AttrValue, AttributeKind};
use crate::id::TagId;
use crate::instance::{ActionContext, AttrMap, ChangeCause, ChangeEvent, TagInstance};

/// How a document routes a persisted result that targets an instance of this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotRoute {
    /// Load into the instance itself.
    Own,
    /// Object tags: results carrying `value.choices` belong to the control named by
    /// `from_name`; anything else is a no-op.
    DelegateChoices,
}

/// The `value` object of a persisted result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedValue(Map<String, Value>);

impl PersistedValue {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `choices` list, if present and well-formed.
    pub fn choices(&self) -> Option<Vec<String>> {
        match AttrValue::from_json(&AttributeKind::List, self.get("choices")?)? {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedForm {
    pub id: TagId,
    #[serde(rename = "type")]
    pub tag_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    #[serde(default)]
    pub value: PersistedValue,
}

/// All persisted results of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: TagId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub result: Vec<PersistedForm>,
}

pub fn to_snapshot(instance: &TagInstance) -> PersistedForm {
    let mut value = PersistedValue::default();
    for attr in instance.model().attributes() {
        if let (Some(key), Some(current)) =
            (attr.spec.persisted_key(), instance.get(attr.spec.name))
        {
            value.insert(key, current.to_json());
        }
    }
    PersistedForm {
        id: instance.id().clone(),
        tag_type: instance.tag_type().to_string(),
        from_name: instance.name().map(str::to_string),
        to_name: instance.to_name().map(str::to_string),
        value,
    }
}

/// Loads the recognized parts of `form` into `instance`.
pub fn from_snapshot(instance: &mut TagInstance, form: &PersistedForm) -> ChangeEvent {
    if form.tag_type != instance.tag_type() {
        tracing::debug!(
            id = %instance.id(),
            expected = instance.tag_type(),
            found = %form.tag_type,
            "loading snapshot of a different tag type"
        );
    }

    let model = Arc::clone(instance.model());
    let mut scratch = instance.attributes().clone();
    let mut broken: BTreeSet<&'static str> = BTreeSet::new();

    for attr in model.attributes() {
        let Some(key) = attr.spec.persisted_key() else {
            continue;
        };
        let Some(raw) = form.value.get(key) else {
            continue;
        };
        match AttrValue::from_json(&attr.spec.kind, raw) {
            Some(value) => {
                scratch.insert(attr.spec.name, value);
            }
            None => {
                tracing::warn!(
                    id = %instance.id(),
                    key,
                    "malformed snapshot field, resetting {}",
                    attr.owners.join(", ")
                );
                broken.extend(attr.owners.iter().copied());
            }
        }
    }

    for (fragment, hook) in model.restore_hooks() {
        if broken.contains(fragment) {
            continue;
        }
        let mut ctx = ActionContext::new(&model, fragment, "onRestore", &mut scratch, instance.task());
        if let Err(err) = hook(&mut ctx) {
            tracing::warn!(id = %instance.id(), fragment, %err, "snapshot rejected by fragment, resetting");
            broken.insert(*fragment);
        }
    }

    for fragment in &broken {
        reset_fragment(instance, &mut scratch, fragment);
    }

    instance.commit(scratch, ChangeCause::Snapshot)
}

/// Puts a fragment's state back to its defaults, then re-runs its creation hook.
fn reset_fragment(instance: &TagInstance, scratch: &mut AttrMap, fragment: &str) {
    let model = instance.model();
    for attr in model.attributes() {
        if attr.owned_by(fragment) && attr.spec.origin != AttrOrigin::Authored {
            scratch.insert(attr.spec.name, attr.spec.default.clone());
        }
    }
    for (owner, hook) in model.create_hooks() {
        if *owner != fragment {
            continue;
        }
        let mut ctx = ActionContext::new(model, owner, "afterCreate", scratch, instance.task());
        if let Err(err) = hook(&mut ctx) {
            tracing::warn!(id = %instance.id(), fragment, %err, "could not rebuild fragment defaults");
        }
    }
}
