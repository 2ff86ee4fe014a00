//! Identifiers for tag instances.
//!
//! Every [`TagInstance`](crate::instance::TagInstance) receives its id exactly once,
//! when the owning document creates it. Ids are opaque strings on the wire so that
//! snapshots produced by other tools (which may use short random ids) load unchanged.
//!
//! Two sources are provided:
//!
//! - [`UuidSource`]: the default; random v4 UUIDs in their compact form.
//! - [`SequentialSource`]: `prefix-1`, `prefix-2`, ... Deterministic, handy in tests
//!   and when a caller wants stable ids across runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Produces globally unique identifiers for new instances.
pub trait IdSource {
    fn next_id(&self) -> TagId;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> TagId {
        TagId(Uuid::new_v4().simple().to_string())
    }
}

#[derive(Debug)]
pub struct SequentialSource {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdSource for SequentialSource {
    fn next_id(&self) -> TagId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        TagId(format!("{}-{}", self.prefix, n))
    }
}
