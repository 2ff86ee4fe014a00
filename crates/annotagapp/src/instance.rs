//! # Tag Instances
//!
//! A [`TagInstance`] is the state of one tag occurrence in a document: an immutable
//! id and type plus the attribute values of its composed [`TagModel`].
//!
//! ## Atomic Changes
//!
//! Every change (an action, an attribute edit, a task change, a snapshot load) runs
//! against a scratch copy of the attributes. The copy replaces the live attributes
//! only once the whole change succeeded, and the version counter moves once per
//! committed change. A renderer reading the instance therefore sees either none or
//! all of an action's effects, and a failing action leaves no trace.
//!
//! Each commit produces a [`ChangeEvent`] naming the attributes that changed; the
//! owning [`Document`](crate::document::Document) forwards those to subscribers.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::attributes::{AttrOrigin, AttrValue};
use crate::compose::TagModel;
use crate::error::{AnnotagError, Result};
use crate::id::TagId;
use crate::template::{Resolver, TaskData};

pub type AttrMap = BTreeMap<&'static str, AttrValue>;

/// The task context templates resolve against: the data plus the resolver settings.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub resolver: Resolver,
    pub data: Arc<TaskData>,
}

impl TaskContext {
    pub fn new(resolver: Resolver, data: TaskData) -> Self {
        Self {
            resolver,
            data: Arc::new(data),
        }
    }

    pub fn resolve_string(&self, raw: &str) -> Option<String> {
        self.resolver.resolve_string(raw, &self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ChangeCause {
    Created,
    Action(String),
    Edit(String),
    Task,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub id: TagId,
    pub version: u64,
    pub cause: ChangeCause,
    pub changed: Vec<String>,
}

impl ChangeEvent {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TagInstance {
    id: TagId,
    model: Arc<TagModel>,
    attrs: AttrMap,
    version: u64,
    task: Option<TaskContext>,
}

impl TagInstance {
    pub(crate) fn new(id: TagId, model: Arc<TagModel>, attrs: AttrMap) -> Result<Self> {
        let mut instance = Self {
            id,
            model,
            attrs,
            version: 0,
            task: None,
        };
        let mut scratch = instance.attrs.clone();
        let model = Arc::clone(&instance.model);
        for (fragment, hook) in model.create_hooks() {
            let mut ctx = ActionContext::new(&model, fragment, "afterCreate", &mut scratch, None);
            hook(&mut ctx)?;
        }
        instance.attrs = scratch;
        Ok(instance)
    }

    pub fn id(&self) -> &TagId {
        &self.id
    }

    pub fn tag_type(&self) -> &str {
        self.model.name()
    }

    pub fn model(&self) -> &Arc<TagModel> {
        &self.model
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn attributes(&self) -> &AttrMap {
        &self.attrs
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_text)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(AttrValue::as_list)
    }

    /// The `name` attribute, which documents and snapshots use to address controls.
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn to_name(&self) -> Option<&str> {
        self.text("toname")
    }

    pub fn task(&self) -> Option<&TaskContext> {
        self.task.as_ref()
    }

    /// Invokes a declared action.
    pub fn call(&mut self, action: &str, args: &Value) -> Result<ChangeEvent> {
        let composed = self
            .model
            .action(action)
            .ok_or_else(|| AnnotagError::UnknownAction {
                tag: self.model.name().to_string(),
                action: action.to_string(),
            })?
            .clone();

        let mut scratch = self.attrs.clone();
        {
            let mut ctx = ActionContext::new(
                &self.model,
                composed.owner,
                action,
                &mut scratch,
                self.task.as_ref(),
            );
            (composed.handler)(&mut ctx, args)?;
        }
        Ok(self.commit(scratch, ChangeCause::Action(action.to_string())))
    }

    /// Edits an authored attribute that was declared editable.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) -> Result<ChangeEvent> {
        let attr = self
            .model
            .attribute(name)
            .ok_or_else(|| AnnotagError::UnknownAttribute {
                tag: self.model.name().to_string(),
                attribute: name.to_string(),
            })?;
        if !(attr.spec.is_authored() && attr.spec.editable) {
            return Err(AnnotagError::ReadOnlyAttribute(name.to_string()));
        }
        if !value.fits(&attr.spec.kind) {
            return Err(AnnotagError::InvalidAttribute {
                attribute: name.to_string(),
                reason: format!("expected {}", attr.spec.kind.label()),
            });
        }
        let key = attr.spec.name;
        let mut scratch = self.attrs.clone();
        scratch.insert(key, value);
        Ok(self.commit(scratch, ChangeCause::Edit(name.to_string())))
    }

    /// Runs the task hooks against a new task context.
    pub fn apply_task(&mut self, task: TaskContext) -> Result<ChangeEvent> {
        let model = Arc::clone(&self.model);
        let mut scratch = self.attrs.clone();
        for (fragment, hook) in model.task_hooks() {
            let mut ctx = ActionContext::new(&model, fragment, "onTask", &mut scratch, Some(&task));
            hook(&mut ctx, &task)?;
        }
        self.task = Some(task);
        Ok(self.commit(scratch, ChangeCause::Task))
    }

    /// Replaces the attributes with `scratch` and bumps the version if anything changed.
    pub(crate) fn commit(&mut self, scratch: AttrMap, cause: ChangeCause) -> ChangeEvent {
        let changed: Vec<String> = scratch
            .iter()
            .filter(|(name, value)| self.attrs.get(*name) != Some(*value))
            .map(|(name, _)| name.to_string())
            .collect();
        if !changed.is_empty() {
            self.attrs = scratch;
            self.version += 1;
            tracing::debug!(id = %self.id, version = self.version, ?cause, ?changed, "committed change");
        }
        ChangeEvent {
            id: self.id.clone(),
            version: self.version,
            cause,
            changed,
        }
    }

    /// A read-only copy of the current state, for renderers.
    pub fn view(&self) -> StateView {
        StateView {
            id: self.id.clone(),
            tag_type: self.model.name().to_string(),
            version: self.version,
            attributes: self.attrs.clone(),
            actions: self.model.action_names(),
        }
    }
}

/// What an action or hook can see and do while it runs.
pub struct ActionContext<'a> {
    model: &'a TagModel,
    fragment: &'a str,
    action: &'a str,
    attrs: &'a mut AttrMap,
    task: Option<&'a TaskContext>,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        model: &'a TagModel,
        fragment: &'a str,
        action: &'a str,
        attrs: &'a mut AttrMap,
        task: Option<&'a TaskContext>,
    ) -> Self {
        Self {
            model,
            fragment,
            action,
            attrs,
            task,
        }
    }

    pub fn action(&self) -> &str {
        self.action
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_text)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttrValue::as_number)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(AttrValue::as_bool)
    }

    pub fn list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(AttrValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// The task context the document last supplied, if any.
    pub fn task(&self) -> Option<&TaskContext> {
        self.task
    }

    /// Writes an attribute owned by the running fragment.
    pub fn set(&mut self, name: &str, value: AttrValue) -> Result<()> {
        let attr = self
            .model
            .attribute(name)
            .ok_or_else(|| AnnotagError::UnknownAttribute {
                tag: self.model.name().to_string(),
                attribute: name.to_string(),
            })?;
        if !attr.owned_by(self.fragment) {
            return Err(AnnotagError::AttributeNotOwned {
                fragment: self.fragment.to_string(),
                attribute: name.to_string(),
            });
        }
        if attr.spec.origin == AttrOrigin::Authored {
            return Err(AnnotagError::ReadOnlyAttribute(name.to_string()));
        }
        if !value.fits(&attr.spec.kind) {
            return Err(AnnotagError::InvalidAttribute {
                attribute: name.to_string(),
                reason: format!("expected {}", attr.spec.kind.label()),
            });
        }
        self.attrs.insert(attr.spec.name, value);
        Ok(())
    }

    pub fn invalid_args(&self, reason: impl Into<String>) -> AnnotagError {
        AnnotagError::InvalidActionArgs {
            action: self.action.to_string(),
            reason: reason.into(),
        }
    }
}

/// Read-only state handed to view renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct StateView {
    pub id: TagId,
    pub tag_type: String,
    pub version: u64,
    pub attributes: AttrMap,
    pub actions: Vec<&'static str>,
}

impl StateView {
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_text)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(AttrValue::as_bool).unwrap_or(false)
    }

    pub fn list(&self, name: &str) -> &[String] {
        self.get(name).and_then(AttrValue::as_list).unwrap_or(&[])
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.iter().any(|action| *action == name)
    }

    pub fn to_json(&self) -> Value {
        let attributes: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        serde_json::json!({
            "id": self.id,
            "type": self.tag_type,
            "version": self.version,
            "attributes": attributes,
            "actions": self.actions,
        })
    }
}
