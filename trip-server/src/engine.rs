//! The top-level results session.
//!
//! A [`TripSession`] owns the filter engine and the result store for one
//! results page, persists enough of them to survive a reload, and tells a
//! [`PresentationAdapter`] what to draw. Every operation runs to completion
//! before the next one starts; the only suspension points are inside
//! [`TripSession::restore`], while waiting for the adapter.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::Trip;
use crate::filter::{FilterChrome, FilterEdit, FilterEngine};
use crate::presenter::{PresentationAdapter, ReadySignal, Readiness};
use crate::results::{DisplayTrip, Phase, ResultSetStore, display_batch};
use crate::session::{
    Absence, LoadKind, NavigationPhase, NavigationTracker, PageEvent, SearchParams,
    SessionCodec, SessionError, SessionSnapshot, SnapshotLoad, SnapshotStorage,
};

/// A finished search, as delivered by the search layer.
#[derive(Debug, Clone, Default)]
pub struct SearchCompleted {
    pub search_params: SearchParams,
    pub request_id: String,
    pub trips: Vec<Trip>,

    /// Games without a fixed date, shown when no trips exist.
    pub tbd_games: Vec<serde_json::Value>,
}

/// Search metadata kept alongside the result set.
#[derive(Debug, Clone, Default)]
struct SearchMeta {
    search_params: SearchParams,
    request_id: String,
    tbd_games: Vec<serde_json::Value>,
}

/// Pagination cursor as shown to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub revealed: usize,
    pub total: usize,
    pub batch_size: usize,
    pub has_more: bool,
}

/// Snapshot of everything currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationModel {
    pub trips: Vec<DisplayTrip>,
    pub cursor: Cursor,
    pub filters: FilterChrome,
    pub phase: Phase,
    pub tbd_games: Vec<serde_json::Value>,
}

/// Result of a restore attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// State was rehydrated. `presented` is false when the adapter never
    /// became ready and nothing was drawn.
    Restored {
        revealed: usize,
        scroll_position: u32,
        presented: bool,
        scroll_applied: bool,
    },
    Absent(Absence),
}

/// One results page: filters, result set, persistence and presentation.
pub struct TripSession<S, P> {
    config: EngineConfig,
    filters: FilterEngine,
    results: ResultSetStore,
    codec: SessionCodec<S>,
    presenter: P,
    tracker: NavigationTracker,
    page_key: String,
    meta: SearchMeta,
    scroll_position: u32,
}

impl<S: SnapshotStorage, P: PresentationAdapter> TripSession<S, P> {
    pub fn new(
        config: EngineConfig,
        storage: S,
        presenter: P,
        page_key: impl Into<String>,
    ) -> Self {
        let codec = SessionCodec::new(storage).with_ttl(config.snapshot_ttl());
        Self {
            filters: FilterEngine::new(config.default_filters()),
            results: ResultSetStore::new(config.batch_size),
            codec,
            presenter,
            tracker: NavigationTracker::new(),
            page_key: page_key.into(),
            meta: SearchMeta::default(),
            scroll_position: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn results(&self) -> &ResultSetStore {
        &self.results
    }

    pub fn codec(&self) -> &SessionCodec<S> {
        &self.codec
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    /// Move the session to another page. The current result set is kept
    /// until the next search or restore.
    pub fn set_page_key(&mut self, page_key: impl Into<String>) {
        self.page_key = page_key.into();
    }

    pub fn scroll_position(&self) -> u32 {
        self.scroll_position
    }

    /// Seed a new search, reset filters, show the first batch and persist.
    ///
    /// Supersedes all filter and reveal state of the previous search.
    pub fn on_search_completed(&mut self, search: SearchCompleted) {
        info!(
            request_id = %search.request_id,
            trips = search.trips.len(),
            tbd_games = search.tbd_games.len(),
            "search completed"
        );

        self.meta = SearchMeta {
            search_params: search.search_params,
            request_id: search.request_id,
            tbd_games: search.tbd_games,
        };
        self.scroll_position = 0;
        self.results.seed(search.trips);
        self.filters.reset();
        self.filters.reapply(&mut self.results);

        self.present_filters();
        self.present_first_batch();

        let snapshot = self.snapshot();
        absorb(self.codec.save(&snapshot), "save session snapshot");
        absorb(
            self.codec
                .save_form_defaults(&self.meta.search_params, snapshot.timestamp),
            "save form defaults",
        );
    }

    /// Edit the draft filter. Displayed results do not change.
    pub fn set_draft(&mut self, edit: FilterEdit) {
        self.filters.set_draft(edit);
        self.present_filters();
    }

    /// Throw away uncommitted draft edits.
    pub fn rollback_draft(&mut self) {
        self.filters.rollback_draft();
        self.present_filters();
    }

    /// Apply the draft filter and show the first batch of the new view.
    pub fn commit_filters(&mut self) {
        self.filters.commit_draft(&mut self.results);
        self.after_refilter();
    }

    /// Reset filters to defaults and show the first batch.
    pub fn clear_filters(&mut self) {
        self.filters.clear(&mut self.results);
        self.after_refilter();
    }

    fn after_refilter(&mut self) {
        self.present_filters();
        self.present_first_batch();
        self.persist_revealed_count();
    }

    /// Reveal the next batch, hand it to the adapter and return it.
    pub fn reveal_next(&mut self) -> Vec<DisplayTrip> {
        let ceiling = self.filters.committed().max_hotel_changes;
        let batch = display_batch(self.results.reveal_next(), ceiling);
        if batch.is_empty() {
            return batch;
        }

        self.presenter.on_batch_revealed(&batch);
        self.persist_revealed_count();
        batch
    }

    pub fn has_more(&self) -> bool {
        self.results.has_more()
    }

    /// Record the renderer's scroll position.
    pub fn update_scroll(&mut self, position: u32) {
        self.scroll_position = position;
        absorb(
            self.codec.update_scroll_position(position),
            "update scroll position",
        );
    }

    /// Feed a navigation trigger to the refresh/navigation tracker.
    pub fn handle_page_event(&mut self, event: PageEvent) -> NavigationPhase {
        match self.tracker.handle(event, self.codec.storage()) {
            Ok(phase) => phase,
            Err(e) => {
                warn!(error = %e, ?event, "failed to record navigation marker");
                self.tracker.phase()
            }
        }
    }

    pub fn navigation_phase(&self) -> NavigationPhase {
        self.tracker.phase()
    }

    /// Restore a previous session on page load.
    ///
    /// Applies the snapshot rules, then seeds the result store from the
    /// snapshot, resets filters to defaults and replays reveals up to the
    /// saved cursor. Drawing waits for `ready`; if the adapter never becomes
    /// ready the state is still restored but nothing is drawn. The scroll
    /// position is applied last, retried on the configured schedule.
    pub async fn restore(&mut self, load_kind: LoadKind, ready: ReadySignal) -> RestoreOutcome {
        self.tracker = NavigationTracker::new();

        let snapshot = match self.codec.load(&self.page_key, load_kind, Utc::now()) {
            SnapshotLoad::Restored(snapshot) => snapshot,
            SnapshotLoad::Absent(absence) => {
                debug!(?absence, page = %self.page_key, "no session to restore");
                return RestoreOutcome::Absent(absence);
            }
        };

        let saved_cursor = snapshot.revealed_count;
        self.meta = SearchMeta {
            search_params: snapshot.search_params,
            request_id: snapshot.request_id,
            tbd_games: snapshot.tbd_games,
        };
        self.scroll_position = snapshot.scroll_position;
        self.results.seed(snapshot.trips);
        self.filters.reset();
        self.filters.reapply(&mut self.results);
        let revealed = self.results.reveal_up_to(saved_cursor).len();

        info!(
            request_id = %self.meta.request_id,
            revealed,
            scroll = self.scroll_position,
            "session restored"
        );

        let readiness = ready.wait(self.config.ready_timeout()).await;
        if readiness != Readiness::Ready {
            warn!(?readiness, "renderer not ready, skipping restored view");
            return RestoreOutcome::Restored {
                revealed,
                scroll_position: self.scroll_position,
                presented: false,
                scroll_applied: false,
            };
        }

        self.present_filters();
        self.present_revealed();
        let scroll_applied = self.apply_scroll_with_retries(self.scroll_position).await;

        RestoreOutcome::Restored {
            revealed,
            scroll_position: self.scroll_position,
            presented: true,
            scroll_applied,
        }
    }

    /// Ask the adapter to scroll, waiting longer before each retry.
    async fn apply_scroll_with_retries(&mut self, position: u32) -> bool {
        let delays: Vec<_> = self.config.scroll_retry_delays().collect();
        for (attempt, delay) in delays.into_iter().enumerate() {
            tokio::time::sleep(delay).await;
            if self.presenter.apply_scroll(position) {
                debug!(position, attempt, "scroll position applied");
                return true;
            }
        }
        warn!(position, "gave up restoring scroll position");
        false
    }

    /// Everything currently revealed, with the cursor and filter chrome.
    pub fn model(&self) -> PresentationModel {
        let ceiling = self.filters.committed().max_hotel_changes;
        PresentationModel {
            trips: display_batch(self.results.revealed(), ceiling),
            cursor: self.cursor(),
            filters: FilterChrome::build(&self.filters, &self.results),
            phase: self.results.phase(),
            tbd_games: self.meta.tbd_games.clone(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        Cursor {
            revealed: self.results.revealed_count(),
            total: self.results.filtered().len(),
            batch_size: self.results.batch_size(),
            has_more: self.results.has_more(),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            search_params: self.meta.search_params.clone(),
            trips: self
                .results
                .original()
                .iter()
                .map(|trip| Trip::clone(trip))
                .collect(),
            request_id: self.meta.request_id.clone(),
            tbd_games: self.meta.tbd_games.clone(),
            revealed_count: self.results.revealed_count(),
            scroll_position: self.scroll_position,
            timestamp: Utc::now(),
            page_key: self.page_key.clone(),
        }
    }

    fn persist_revealed_count(&mut self) {
        absorb(
            self.codec
                .update_revealed_count(self.results.revealed_count()),
            "update revealed count",
        );
    }

    fn present_filters(&mut self) {
        let chrome = FilterChrome::build(&self.filters, &self.results);
        self.presenter.on_filter_state_changed(&chrome);
    }

    /// Reveal and draw the first batch, or report that nothing matches.
    fn present_first_batch(&mut self) {
        if self.results.filtered().is_empty() {
            self.present_no_matches();
            return;
        }
        let ceiling = self.filters.committed().max_hotel_changes;
        let batch = display_batch(self.results.reveal_next(), ceiling);
        self.presenter.on_batch_revealed(&batch);
    }

    /// Draw the already revealed prefix in batch-sized pieces.
    fn present_revealed(&mut self) {
        if self.results.filtered().is_empty() {
            self.present_no_matches();
            return;
        }
        let ceiling = self.filters.committed().max_hotel_changes;
        let batch_size = self.results.batch_size();
        for chunk in self.results.revealed().chunks(batch_size) {
            self.presenter
                .on_batch_revealed(&display_batch(chunk, ceiling));
        }
    }

    /// No trips at all may still leave unscheduled games to show; an empty
    /// filtered view does not.
    fn present_no_matches(&mut self) {
        let has_alternate_content =
            self.results.original().is_empty() && !self.meta.tbd_games.is_empty();
        self.presenter.on_no_matches(has_alternate_content);
    }
}

/// Log and drop a persistence failure. Session state stays usable.
fn absorb<T>(result: Result<T, SessionError>, action: &str) {
    if let Err(e) = result {
        warn!(error = %e, action, "persistence failed");
    }
}
