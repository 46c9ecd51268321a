//! The export document handed to the host for download.
//!
//! A `ChainExport` is a self-contained JSON snapshot: the records (newest
//! first), the filter that selected them, and the anchor needed to audit the
//! oldest record offline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{DefiverseError, DefiverseResult},
    filter::LogFilter,
    record::{ChainAnchor, LogRecord},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainExport {
    /// Wall-clock time (UTC) the snapshot was taken.
    pub exported_at: DateTime<Utc>,

    /// The filter applied, or `None` for a full export.
    pub filter: Option<LogFilter>,

    /// What the oldest retained record links to.
    pub anchor: ChainAnchor,

    /// Fingerprint of the newest record in the log. Empty when the log is empty.
    pub head_fingerprint: String,

    pub record_count: usize,

    /// Records in most-recent-first order.
    pub records: Vec<LogRecord>,
}

impl ChainExport {
    /// Render as indented JSON.
    pub fn to_json_pretty(&self) -> DefiverseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DefiverseError::ExportFailed {
            reason: format!("failed to serialize export document: {}", e),
        })
    }

    /// Parse a document previously produced by `to_json_pretty`.
    pub fn from_json(s: &str) -> DefiverseResult<Self> {
        serde_json::from_str(s).map_err(|e| DefiverseError::ExportFailed {
            reason: format!("failed to parse export document: {}", e),
        })
    }
}
