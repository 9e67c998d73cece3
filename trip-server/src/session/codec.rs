//! Snapshot save, load and partial update.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::navigation::{LoadClass, LoadKind, classify_load, take_marker};
use super::snapshot::{
    CURRENT_SCHEMA, REVEALED_COUNT_FIELD, SCHEMA_FIELD, SCROLL_POSITION_FIELD, SessionSnapshot,
    StoredSnapshot,
};
use super::storage::{SnapshotStorage, StorageError};

/// Storage key of the session snapshot.
pub const SNAPSHOT_KEY: &str = "tripResults.snapshot";

/// Default lifetime of a snapshot.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::minutes(30);

/// Errors from writing session state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Persistence backend failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Snapshot could not be encoded
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why no snapshot was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Absence {
    Missing,
    Corrupt,
    PageMismatch,
    Expired,
    Navigation,
}

/// Outcome of a load attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLoad {
    Restored(SessionSnapshot),
    Absent(Absence),
}

impl SnapshotLoad {
    pub fn into_snapshot(self) -> Option<SessionSnapshot> {
        match self {
            SnapshotLoad::Restored(snapshot) => Some(snapshot),
            SnapshotLoad::Absent(_) => None,
        }
    }
}

/// Reads and writes session snapshots through a storage backend.
#[derive(Debug, Clone)]
pub struct SessionCodec<S> {
    storage: S,
    ttl: Duration,
}

impl<S: SnapshotStorage> SessionCodec<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ttl: DEFAULT_SNAPSHOT_TTL,
        }
    }

    /// Use a custom snapshot lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Write a full snapshot, replacing any previous one.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let json = serde_json::to_string(&StoredSnapshot::V1(snapshot.clone()))?;
        self.storage.write(SNAPSHOT_KEY, &json)?;
        debug!(
            trips = snapshot.trips.len(),
            revealed = snapshot.revealed_count,
            page = %snapshot.page_key,
            "session snapshot saved"
        );
        Ok(())
    }

    /// Delete the snapshot.
    pub fn discard(&self) -> Result<(), SessionError> {
        self.storage.remove(SNAPSHOT_KEY)?;
        Ok(())
    }

    /// Return the snapshot if it applies to this page load.
    pub fn load_if_applicable(
        &self,
        page_key: &str,
        load_kind: LoadKind,
        now: DateTime<Utc>,
    ) -> Option<SessionSnapshot> {
        self.load(page_key, load_kind, now).into_snapshot()
    }

    /// Evaluate the applicability rules in order: the snapshot exists and
    /// parses, belongs to this page, is not expired, and this load is a
    /// refresh. Every rejected snapshot except a missing one is deleted.
    ///
    /// The navigation marker is always consumed, so it cannot leak into a
    /// later load.
    pub fn load(&self, page_key: &str, load_kind: LoadKind, now: DateTime<Utc>) -> SnapshotLoad {
        let marker = take_marker(&self.storage).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read navigation marker");
            false
        });
        let class = classify_load(marker, load_kind);

        let raw = match self.storage.read(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SnapshotLoad::Absent(Absence::Missing),
            Err(e) => {
                warn!(error = %e, "failed to read session snapshot");
                return self.reject(Absence::Corrupt);
            }
        };

        let snapshot = match serde_json::from_str::<StoredSnapshot>(&raw) {
            Ok(stored) => stored.into_current(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session snapshot");
                return self.reject(Absence::Corrupt);
            }
        };

        if snapshot.page_key != page_key {
            debug!(stored = %snapshot.page_key, current = %page_key, "snapshot is for another page");
            return self.reject(Absence::PageMismatch);
        }

        if snapshot.age(now) > self.ttl {
            info!(age_secs = snapshot.age(now).num_seconds(), "session snapshot expired");
            return self.reject(Absence::Expired);
        }

        if class == LoadClass::Navigation {
            info!(?load_kind, marker, "navigation detected, dropping session snapshot");
            return self.reject(Absence::Navigation);
        }

        SnapshotLoad::Restored(snapshot)
    }

    fn reject(&self, absence: Absence) -> SnapshotLoad {
        if let Err(e) = self.storage.remove(SNAPSHOT_KEY) {
            warn!(error = %e, "failed to delete session snapshot");
        }
        SnapshotLoad::Absent(absence)
    }

    /// Rewrite only the revealed count of the stored snapshot.
    ///
    /// Returns `false` when there is no usable snapshot to update.
    pub fn update_revealed_count(&self, revealed: usize) -> Result<bool, SessionError> {
        self.update_field(REVEALED_COUNT_FIELD, serde_json::Value::from(revealed))
    }

    /// Rewrite only the scroll position of the stored snapshot.
    pub fn update_scroll_position(&self, position: u32) -> Result<bool, SessionError> {
        self.update_field(SCROLL_POSITION_FIELD, serde_json::Value::from(position))
    }

    /// Patch one top-level field of the stored document in place.
    ///
    /// The rest of the document is written back exactly as read, so a
    /// concurrent full save of other fields is never rolled back.
    fn update_field(&self, field: &str, value: serde_json::Value) -> Result<bool, SessionError> {
        let Some(raw) = self.storage.read(SNAPSHOT_KEY)? else {
            return Ok(false);
        };

        let mut document = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(map))
                if map.get(SCHEMA_FIELD).and_then(|v| v.as_str()) == Some(CURRENT_SCHEMA) =>
            {
                map
            }
            _ => {
                warn!(field, "discarding unreadable session snapshot during update");
                self.storage.remove(SNAPSHOT_KEY)?;
                return Ok(false);
            }
        };

        document.insert(field.to_string(), value);
        let json = serde_json::to_string(&document)?;
        self.storage.write(SNAPSHOT_KEY, &json)?;
        Ok(true)
    }
}
