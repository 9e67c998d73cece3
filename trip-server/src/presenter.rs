//! Contract between the engine and whatever draws the results.
//!
//! The engine never touches a rendering surface. It hands plain data to a
//! [`PresentationAdapter`] and, before replaying a restored session, waits for
//! the adapter's environment to signal readiness once.

use std::time::Duration;

use tokio::sync::watch;

use crate::filter::FilterChrome;
use crate::results::DisplayTrip;

/// Receives the engine's output.
pub trait PresentationAdapter {
    /// A batch of trips was revealed and should be appended.
    fn on_batch_revealed(&mut self, trips: &[DisplayTrip]);

    /// Filter controls need redrawing.
    fn on_filter_state_changed(&mut self, chrome: &FilterChrome);

    /// Nothing to show. `has_alternate_content` is set when the search itself
    /// returned no trips but other content (such as unscheduled games) exists.
    fn on_no_matches(&mut self, has_alternate_content: bool);

    /// Try to scroll to `position`. Returns `true` once the layout honoured it.
    fn apply_scroll(&mut self, position: u32) -> bool {
        let _ = position;
        true
    }
}

/// Everything an adapter has been told, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    BatchRevealed(Vec<DisplayTrip>),
    FilterStateChanged(FilterChrome),
    NoMatches { has_alternate_content: bool },
    ScrollApplied(u32),
}

/// Adapter that records events for a caller to forward elsewhere.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Vec<PresentationEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PresentationAdapter for RecordingPresenter {
    fn on_batch_revealed(&mut self, trips: &[DisplayTrip]) {
        self.events
            .push(PresentationEvent::BatchRevealed(trips.to_vec()));
    }

    fn on_filter_state_changed(&mut self, chrome: &FilterChrome) {
        self.events
            .push(PresentationEvent::FilterStateChanged(chrome.clone()));
    }

    fn on_no_matches(&mut self, has_alternate_content: bool) {
        self.events.push(PresentationEvent::NoMatches {
            has_alternate_content,
        });
    }

    fn apply_scroll(&mut self, position: u32) -> bool {
        self.events.push(PresentationEvent::ScrollApplied(position));
        true
    }
}

/// Outcome of waiting for the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// The adapter did not become ready in time.
    TimedOut,
    /// The adapter went away without becoming ready.
    TornDown,
}

/// Adapter side of the readiness signal. Resolve it once when ready.
#[derive(Debug)]
pub struct ReadyHandle {
    tx: watch::Sender<bool>,
}

impl ReadyHandle {
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }
}

/// Engine side of the readiness signal.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: watch::Receiver<bool>,
}

impl ReadySignal {
    /// A signal that is already resolved.
    pub fn ready() -> Self {
        let (tx, rx) = watch::channel(true);
        drop(tx);
        Self { rx }
    }

    /// Wait until ready, the handle is dropped, or `timeout` elapses.
    pub async fn wait(mut self, timeout: Duration) -> Readiness {
        match tokio::time::timeout(timeout, self.rx.wait_for(|ready| *ready)).await {
            Ok(Ok(_)) => Readiness::Ready,
            Ok(Err(_)) => Readiness::TornDown,
            Err(_) => Readiness::TimedOut,
        }
    }
}

/// Create a connected readiness handle and signal.
pub fn ready_signal() -> (ReadyHandle, ReadySignal) {
    let (tx, rx) = watch::channel(false);
    (ReadyHandle { tx }, ReadySignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn resolves_when_marked() {
        let (handle, signal) = ready_signal();

        let waiter = tokio::spawn(signal.wait(Duration::from_secs(5)));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.mark_ready();

        assert_eq!(waiter.await.unwrap(), Readiness::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn marked_before_wait() {
        let (handle, signal) = ready_signal();
        handle.mark_ready();
        drop(handle);

        assert_eq!(signal.wait(Duration::from_secs(1)).await, Readiness::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out() {
        let (_handle, signal) = ready_signal();
        assert_eq!(
            signal.wait(Duration::from_millis(100)).await,
            Readiness::TimedOut
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_is_torn_down() {
        let (handle, signal) = ready_signal();
        drop(handle);
        assert_eq!(signal.wait(Duration::from_secs(1)).await, Readiness::TornDown);
    }

    #[tokio::test]
    async fn already_ready() {
        assert_eq!(
            ReadySignal::ready().wait(Duration::from_millis(1)).await,
            Readiness::Ready
        );
    }

    #[test]
    fn recorder_drains() {
        let mut presenter = RecordingPresenter::new();
        presenter.on_no_matches(true);
        assert!(presenter.apply_scroll(40));

        let events = presenter.drain();
        assert_eq!(
            events,
            vec![
                PresentationEvent::NoMatches {
                    has_alternate_content: true
                },
                PresentationEvent::ScrollApplied(40),
            ]
        );
        assert!(presenter.events().is_empty());
    }
}
