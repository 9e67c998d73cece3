//! Persisted session snapshot schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Trip;

/// Search form parameters, passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchParams(pub serde_json::Map<String, serde_json::Value>);

impl SearchParams {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for SearchParams {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// Everything needed to rebuild the results page after a reload.
///
/// Filter state is deliberately absent: filters reset on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub search_params: SearchParams,
    pub trips: Vec<Trip>,
    pub request_id: String,
    #[serde(default)]
    pub tbd_games: Vec<serde_json::Value>,
    pub revealed_count: usize,
    pub scroll_position: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub page_key: String,
}

impl SessionSnapshot {
    /// Age of the snapshot at `now`. Clock skew into the future counts as zero.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.timestamp).max(chrono::Duration::zero())
    }
}

/// Field names rewritten by partial updates.
pub(crate) const REVEALED_COUNT_FIELD: &str = "revealedCount";
pub(crate) const SCROLL_POSITION_FIELD: &str = "scrollPosition";

/// Name of the schema tag field.
pub(crate) const SCHEMA_FIELD: &str = "schema";

/// Current schema tag value.
pub(crate) const CURRENT_SCHEMA: &str = "trip-session/1";

/// Versioned on-disk form of a snapshot.
///
/// An entry with an unknown schema tag fails to parse and is treated as
/// corrupt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema")]
pub(crate) enum StoredSnapshot {
    #[serde(rename = "trip-session/1")]
    V1(SessionSnapshot),
}

impl StoredSnapshot {
    pub(crate) fn into_current(self) -> SessionSnapshot {
        match self {
            StoredSnapshot::V1(snapshot) => snapshot,
        }
    }
}
