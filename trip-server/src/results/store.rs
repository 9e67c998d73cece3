//! The authoritative trip collection and its paginated, filtered view.

use std::sync::Arc;

use crate::domain::Trip;

/// Number of trips revealed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Lifecycle of a single search's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No search has been seeded.
    Empty,
    /// Trips are seeded but no filter pass has run.
    Seeded,
    /// Filter pass done, nothing revealed yet.
    Filtered,
    /// Some, but not all, filtered trips are revealed.
    Revealing,
    /// Every filtered trip is revealed.
    Exhausted,
}

/// Holds the seeded trips, the filtered view and the reveal cursor.
///
/// `original` is never mutated after seeding; only a new `seed` replaces it.
/// `filtered` holds the same `Arc`s as `original`, in original order.
#[derive(Debug, Clone)]
pub struct ResultSetStore {
    original: Arc<[Arc<Trip>]>,
    filtered: Vec<Arc<Trip>>,
    revealed: usize,
    batch_size: usize,
    seeded: bool,
    filter_applied: bool,
}

impl Default for ResultSetStore {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl ResultSetStore {
    /// Create an empty store. A batch size of zero is raised to one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            original: Arc::from(Vec::new()),
            filtered: Vec::new(),
            revealed: 0,
            batch_size: batch_size.max(1),
            seeded: false,
            filter_applied: false,
        }
    }

    /// Replace the trip collection, discarding any filtered view and cursor.
    pub fn seed(&mut self, trips: Vec<Trip>) {
        self.original = trips.into_iter().map(Arc::new).collect();
        self.filtered.clear();
        self.revealed = 0;
        self.seeded = true;
        self.filter_applied = false;
    }

    /// Recompute the filtered view from `original` and rewind the cursor.
    pub fn apply_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&Trip) -> bool,
    {
        self.filtered = self
            .original
            .iter()
            .filter(|trip| predicate(trip))
            .cloned()
            .collect();
        self.revealed = 0;
        self.filter_applied = true;
    }

    /// Reveal the next batch and return it.
    ///
    /// Returns an empty slice once everything is revealed.
    pub fn reveal_next(&mut self) -> &[Arc<Trip>] {
        self.reveal_step(self.filtered.len())
    }

    /// Rewind and reveal batch by batch until `n` trips (or all of them) are
    /// revealed. Returns the whole revealed prefix.
    ///
    /// The last step stops at the target, so the cursor lands exactly on
    /// `min(n, filtered.len())`.
    pub fn reveal_up_to(&mut self, n: usize) -> &[Arc<Trip>] {
        let target = n.min(self.filtered.len());
        self.revealed = 0;
        while self.revealed < target {
            self.reveal_step(target);
        }
        self.revealed()
    }

    fn reveal_step(&mut self, limit: usize) -> &[Arc<Trip>] {
        let start = self.revealed;
        let end = (start + self.batch_size).min(limit).max(start);
        self.revealed = end;
        &self.filtered[start..end]
    }

    pub fn has_more(&self) -> bool {
        self.revealed < self.filtered.len()
    }

    pub fn original(&self) -> &[Arc<Trip>] {
        &self.original
    }

    pub fn filtered(&self) -> &[Arc<Trip>] {
        &self.filtered
    }

    /// The trips revealed so far, in filtered order.
    pub fn revealed(&self) -> &[Arc<Trip>] {
        &self.filtered[..self.revealed]
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn phase(&self) -> Phase {
        if !self.seeded {
            Phase::Empty
        } else if !self.filter_applied {
            Phase::Seeded
        } else if self.revealed == self.filtered.len() {
            Phase::Exhausted
        } else if self.revealed == 0 {
            Phase::Filtered
        } else {
            Phase::Revealing
        }
    }
}
