//! Query filters over log records.
//!
//! Every field is optional and all set fields must match (AND semantics).
//! An all-`None` filter matches every record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    action::{ActionType, Disposition},
    record::LogRecord,
};

/// Conjunctive filter applied by `query` and `export`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Case-insensitive substring of the fingerprint, the action type name,
    /// or the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_search: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,

    /// Case-sensitive substring of the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,

    /// Inclusive lower bound on `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

impl LogFilter {
    /// A filter that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_search = Some(text.into());
        self
    }

    pub fn with_action(mut self, action_type: ActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = Some(disposition);
        self
    }

    pub fn created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    pub fn created_before(mut self, at: DateTime<Utc>) -> Self {
        self.created_before = Some(at);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Return true if `record` satisfies every set field.
    ///
    /// An empty `text_search` or `actor` string matches everything, the same
    /// way an empty search box does.
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(text) = self.text_search.as_deref().filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            let hit = record.fingerprint.to_lowercase().contains(&needle)
                || record.action_type.as_str().to_lowercase().contains(&needle)
                || record.actor.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(action_type) = self.action_type {
            if record.action_type != action_type {
                return false;
            }
        }

        if let Some(actor) = self.actor.as_deref() {
            if !record.actor.contains(actor) {
                return false;
            }
        }

        if let Some(disposition) = self.disposition {
            if record.disposition != disposition {
                return false;
            }
        }

        if let Some(after) = self.created_after {
            if record.created_at < after {
                return false;
            }
        }

        if let Some(before) = self.created_before {
            if record.created_at > before {
                return false;
            }
        }

        true
    }
}
