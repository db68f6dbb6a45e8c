//! Lifetime and group options shared by every unit of work

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How long a unit of work stays signed on a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lifetime {
    /// Removed from the context as soon as it is triggered
    #[default]
    Single,
    /// Stays signed across any number of triggers
    Durable,
}

/// Opaque token marking a set of mutually exclusive units of work.
///
/// Two groups are equal when their labels are equal. Use [`Group::anonymous`]
/// for a token that can never collide with another group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(String);

impl Group {
    pub fn new(label: impl AsRef<str>) -> Self {
        Group(label.as_ref().to_string())
    }

    /// A group token that is unique to this call
    pub fn anonymous() -> Self {
        Group::new(format!("group-{}", Uuid::new_v4()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Group {
    fn from(label: &str) -> Self {
        Group::new(label)
    }
}

/// Options record accepted by every procedure and pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BirbOptions {
    /// Retention policy once triggered
    #[serde(default)]
    pub lifetime: Lifetime,

    /// Optional mutual-exclusion group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
}

impl BirbOptions {
    pub fn single() -> Self {
        Self {
            lifetime: Lifetime::Single,
            group: None,
        }
    }

    pub fn durable() -> Self {
        Self {
            lifetime: Lifetime::Durable,
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<Group>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn belongs_to_group(&self) -> bool {
        self.group.is_some()
    }
}
