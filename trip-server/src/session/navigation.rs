//! Refresh versus navigate-away detection.
//!
//! A reload should restore the results page; leaving it and coming back
//! should not. The tracker watches outbound navigation triggers and writes a
//! marker into storage the moment one fires, so the marker is in place even
//! if the page is torn down right after. On the next load the marker is
//! consumed and combined with the browser's own load-type signal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::storage::{SnapshotStorage, StorageError};

/// Storage key of the navigation marker.
pub const NAVIGATION_MARKER_KEY: &str = "tripResults.navigatingAway";

/// Events that drive the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageEvent {
    /// A same-origin link was activated.
    SameOriginLinkActivated,
    /// History back or forward was triggered.
    HistoryTraversed,
    /// A pending navigation was cancelled and the page stays.
    NavigationAborted,
    /// The page is being unloaded.
    Unload,
}

/// How the previous page instance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnloadKind {
    Navigation,
    Refresh,
}

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPhase {
    #[default]
    Idle,
    NavigationPending,
    Unloaded(UnloadKind),
}

/// The browser's own report of how the current page was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadKind {
    Reload,
    Navigate,
    BackForward,
    #[default]
    Unknown,
}

/// Classification of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadClass {
    Refresh,
    Navigation,
}

/// State machine `Idle -> NavigationPending -> Unloaded(..)`.
#[derive(Debug, Clone, Default)]
pub struct NavigationTracker {
    phase: NavigationPhase,
}

impl NavigationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    /// Advance the state machine, writing or clearing the marker as needed.
    ///
    /// Events after `Unload` are ignored.
    pub fn handle<S: SnapshotStorage>(
        &mut self,
        event: PageEvent,
        storage: &S,
    ) -> Result<NavigationPhase, StorageError> {
        let next = match (self.phase, event) {
            (NavigationPhase::Unloaded(_), _) => return Ok(self.phase),
            (_, PageEvent::SameOriginLinkActivated | PageEvent::HistoryTraversed) => {
                storage.write(NAVIGATION_MARKER_KEY, "1")?;
                NavigationPhase::NavigationPending
            }
            (NavigationPhase::NavigationPending, PageEvent::NavigationAborted) => {
                storage.remove(NAVIGATION_MARKER_KEY)?;
                NavigationPhase::Idle
            }
            (NavigationPhase::Idle, PageEvent::NavigationAborted) => NavigationPhase::Idle,
            (NavigationPhase::NavigationPending, PageEvent::Unload) => {
                NavigationPhase::Unloaded(UnloadKind::Navigation)
            }
            (NavigationPhase::Idle, PageEvent::Unload) => {
                NavigationPhase::Unloaded(UnloadKind::Refresh)
            }
        };

        debug!(?event, from = ?self.phase, to = ?next, "navigation tracker");
        self.phase = next;
        Ok(next)
    }
}

/// Read and delete the marker left by the previous page instance.
pub fn take_marker<S: SnapshotStorage>(storage: &S) -> Result<bool, StorageError> {
    let present = storage.read(NAVIGATION_MARKER_KEY)?.is_some();
    if present {
        storage.remove(NAVIGATION_MARKER_KEY)?;
    }
    Ok(present)
}

/// Classify a load from the marker and the browser's load-type signal.
///
/// The marker wins. Without it, an explicit navigate or back/forward signal
/// means navigation; a reload or no signal at all means refresh.
pub fn classify_load(marker_present: bool, kind: LoadKind) -> LoadClass {
    if marker_present {
        return LoadClass::Navigation;
    }
    match kind {
        LoadKind::Navigate | LoadKind::BackForward => LoadClass::Navigation,
        LoadKind::Reload | LoadKind::Unknown => LoadClass::Refresh,
    }
}
