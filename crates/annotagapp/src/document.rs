//! # Documents
//!
//! A [`Document`] owns every tag instance created from one authoring document, the
//! task data they resolve templates against, and the change log.
//!
//! ## Authoring Format
//!
//! ```yaml
//! tags:
//!   - tag: Video
//!     attrs: { name: clip, value: $video }
//!   - tag: TreeSelect
//!     attrs: { name: category, toName: clip, strategy: show-parent }
//! ```
//!
//! Tag names are resolved case-insensitively against the registry. Attribute values
//! may be written as strings, numbers, or booleans; they are parsed by the attribute's
//! declared shape.
//!
//! ## Addressing
//!
//! Operations take a target that is either an instance id or the instance's `name`
//! attribute. Ids are tried first.
//!
//! ## Change Delivery
//!
//! Every committed change is appended to [`Document::events`] and sent to each
//! [`Subscription`]. Delivery happens synchronously inside the call that made the
//! change; subscribers whose receiver was dropped are forgotten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::attributes::AttrValue;
use crate::compose::Props;
use crate::config::TagsConfig;
use crate::error::{AnnotagError, Result};
use crate::id::{IdSource, TagId};
use crate::instance::{ChangeCause, ChangeEvent, TagInstance, TaskContext};
use crate::registry::Registry;
use crate::snapshot::{self, Annotation, PersistedForm, SnapshotRoute};
use crate::template::{Resolver, TaskData};
use crate::views::ViewNode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoringDoc {
    #[serde(default)]
    pub tags: Vec<TagOccurrence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagOccurrence {
    pub tag: String,
    #[serde(default, deserialize_with = "scalar_props")]
    pub attrs: Props,
}

impl TagOccurrence {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Props::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }
}

impl AuthoringDoc {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

fn scalar_props<'de, D>(deserializer: D) -> std::result::Result<Props, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: std::collections::BTreeMap<String, Value> = Deserialize::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "attribute '{}' must be a string, number, or boolean, found {}",
                        name, other
                    )))
                }
            };
            Ok((name, text))
        })
        .collect()
}

/// One tag's render output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTag {
    pub id: TagId,
    #[serde(rename = "type")]
    pub tag_type: String,
    pub view: Option<ViewNode>,
}

/// Receives every change committed after [`Document::subscribe`] was called.
pub struct Subscription {
    receiver: Receiver<ChangeEvent>,
}

impl Subscription {
    /// Changes delivered so far and not yet taken.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.receiver.try_iter().collect()
    }
}

pub struct Document {
    id: TagId,
    instances: Vec<TagInstance>,
    resolver: Resolver,
    task: Option<Arc<TaskData>>,
    created_at: DateTime<Utc>,
    events: Vec<ChangeEvent>,
    subscribers: Vec<Sender<ChangeEvent>>,
}

impl Document {
    /// Creates one instance per tag occurrence, in document order.
    pub fn from_authoring(
        registry: &Registry,
        doc: &AuthoringDoc,
        ids: &dyn IdSource,
        config: &TagsConfig,
    ) -> Result<Self> {
        let mut document = Self {
            id: ids.next_id(),
            instances: Vec::with_capacity(doc.tags.len()),
            resolver: config.resolver(),
            task: None,
            created_at: Utc::now(),
            events: Vec::new(),
            subscribers: Vec::new(),
        };
        for occurrence in &doc.tags {
            let entry = registry.resolve(&occurrence.tag)?;
            let instance = entry
                .model
                .create(&occurrence.attrs, ids, config.strict_attributes)?;
            if let Some(name) = instance.name() {
                if document.position(name).is_some() {
                    return Err(AnnotagError::DuplicateName(name.to_string()));
                }
            }
            document.events.push(ChangeEvent {
                id: instance.id().clone(),
                version: instance.version(),
                cause: ChangeCause::Created,
                changed: instance
                    .attributes()
                    .keys()
                    .map(|name| name.to_string())
                    .collect(),
            });
            document.instances.push(instance);
        }
        tracing::debug!(id = %document.id, tags = document.instances.len(), "opened document");
        Ok(document)
    }

    pub fn id(&self) -> &TagId {
        &self.id
    }

    pub fn instances(&self) -> &[TagInstance] {
        &self.instances
    }

    pub fn task(&self) -> Option<&TaskData> {
        self.task.as_deref()
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        Subscription { receiver }
    }

    fn position(&self, target: &str) -> Option<usize> {
        self.instances
            .iter()
            .position(|inst| inst.id().as_str() == target)
            .or_else(|| {
                self.instances
                    .iter()
                    .position(|inst| inst.name() == Some(target))
            })
    }

    /// Finds an instance by id, then by `name`.
    pub fn find(&self, target: &str) -> Option<&TagInstance> {
        self.position(target).map(|slot| &self.instances[slot])
    }

    fn slot(&self, target: &str) -> Result<usize> {
        self.position(target)
            .ok_or_else(|| AnnotagError::UnknownTarget(target.to_string()))
    }

    fn publish(&mut self, event: ChangeEvent) {
        if event.is_empty() {
            return;
        }
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
        self.events.push(event);
    }

    /// Supplies new task data. Templates are resolved once per actual change;
    /// passing data equal to the current task does nothing.
    pub fn set_task(&mut self, data: TaskData) -> Result<Vec<ChangeEvent>> {
        if self.task.as_deref() == Some(&data) {
            tracing::debug!(id = %self.id, "task unchanged, skipping resolution");
            return Ok(Vec::new());
        }
        let context = TaskContext::new(self.resolver.clone(), data);

        let mut changes = Vec::new();
        for slot in 0..self.instances.len() {
            let event = self.instances[slot].apply_task(context.clone())?;
            if !event.is_empty() {
                changes.push(event.clone());
            }
            self.publish(event);
        }
        self.task = Some(context.data);
        Ok(changes)
    }

    pub fn call(&mut self, target: &str, action: &str, args: &Value) -> Result<ChangeEvent> {
        let slot = self.slot(target)?;
        let event = self.instances[slot].call(action, args)?;
        self.publish(event.clone());
        Ok(event)
    }

    pub fn set_attr(&mut self, target: &str, name: &str, value: AttrValue) -> Result<ChangeEvent> {
        let slot = self.slot(target)?;
        let event = self.instances[slot].set_attr(name, value)?;
        self.publish(event.clone());
        Ok(event)
    }

    pub fn render(&self, registry: &Registry) -> Result<Vec<RenderedTag>> {
        self.instances
            .iter()
            .map(|inst| {
                let entry = registry.resolve(inst.tag_type())?;
                Ok(RenderedTag {
                    id: inst.id().clone(),
                    tag_type: inst.tag_type().to_string(),
                    view: (entry.view)(&inst.view()),
                })
            })
            .collect()
    }

    /// Object tags with nothing of their own to persist contribute no result.
    pub fn to_annotation(&self) -> Annotation {
        Annotation {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
            result: self
                .instances
                .iter()
                .filter_map(|inst| {
                    let form = snapshot::to_snapshot(inst);
                    let object = inst.model().snapshot_route() == SnapshotRoute::DelegateChoices;
                    (!object || !form.value.is_empty()).then_some(form)
                })
                .collect(),
        }
    }

    /// Loads persisted results into the matching instances.
    ///
    /// A result is matched by id first and by `from_name` second. Results aimed at an
    /// object tag that delegates choices are forwarded to the control named by
    /// `from_name`. Results that match nothing are skipped with a warning.
    pub fn load_annotation(&mut self, annotation: &Annotation) -> Vec<ChangeEvent> {
        let mut changes = Vec::new();
        for form in &annotation.result {
            let Some(slot) = self.route(form) else {
                continue;
            };
            let event = snapshot::from_snapshot(&mut self.instances[slot], form);
            if !event.is_empty() {
                changes.push(event.clone());
            }
            self.publish(event);
        }
        changes
    }

    fn route(&self, form: &PersistedForm) -> Option<usize> {
        let by_name = || {
            form.from_name
                .as_deref()
                .and_then(|name| self.position(name))
        };
        let slot = self
            .instances
            .iter()
            .position(|inst| inst.id() == &form.id)
            .or_else(by_name);
        let Some(slot) = slot else {
            tracing::warn!(id = %form.id, from_name = ?form.from_name, "no tag matches result, skipping");
            return None;
        };

        match self.instances[slot].model().snapshot_route() {
            SnapshotRoute::Own => Some(slot),
            SnapshotRoute::DelegateChoices => {
                if form.value.choices().is_none() {
                    tracing::debug!(id = %form.id, "object result without choices, nothing to load");
                    return None;
                }
                let delegate = by_name().filter(|target| *target != slot);
                if delegate.is_none() {
                    tracing::warn!(
                        id = %form.id,
                        from_name = ?form.from_name,
                        "choices aimed at an object tag have no control to go to, skipping"
                    );
                }
                delegate
            }
        }
    }
}
