//! Remembered search-form defaults.
//!
//! Lives in its own entry, separate from the session snapshot, with its own
//! expiry. Team and league selections are never remembered.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::codec::{SessionCodec, SessionError};
use super::snapshot::SearchParams;
use super::storage::SnapshotStorage;

/// Storage key of the form defaults entry.
pub const FORM_DEFAULTS_KEY: &str = "tripSearch.formDefaults";

/// Default lifetime of remembered form values.
pub const DEFAULT_FORM_TTL: Duration = Duration::minutes(30);

/// Form fields that are stripped before saving.
pub const EXCLUDED_FORM_FIELDS: &[&str] = &["team", "teams", "league", "leagues"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormDefaults {
    values: SearchParams,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    saved_at: DateTime<Utc>,
}

impl<S: SnapshotStorage> SessionCodec<S> {
    /// Remember the search form, minus team and league selections.
    pub fn save_form_defaults(
        &self,
        params: &SearchParams,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let mut values = params.clone();
        values
            .0
            .retain(|key, _| !EXCLUDED_FORM_FIELDS.contains(&key.as_str()));

        let entry = FormDefaults {
            values,
            saved_at: now,
        };
        self.storage()
            .write(FORM_DEFAULTS_KEY, &serde_json::to_string(&entry)?)?;
        Ok(())
    }

    /// Remembered form values, if present and younger than `ttl`.
    ///
    /// Expired or unreadable entries are deleted.
    pub fn load_form_defaults(&self, now: DateTime<Utc>, ttl: Duration) -> Option<SearchParams> {
        let raw = match self.storage().read(FORM_DEFAULTS_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read form defaults");
                return None;
            }
        };

        let entry = match serde_json::from_str::<FormDefaults>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "discarding unreadable form defaults");
                self.discard_form_defaults();
                return None;
            }
        };

        if now - entry.saved_at > ttl {
            debug!("form defaults expired");
            self.discard_form_defaults();
            return None;
        }

        Some(entry.values)
    }

    fn discard_form_defaults(&self) {
        if let Err(e) = self.storage().remove(FORM_DEFAULTS_KEY) {
            warn!(error = %e, "failed to delete form defaults");
        }
    }
}
