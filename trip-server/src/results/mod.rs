//! Result set ownership and batch reveal.
//!
//! The store owns the seeded trips for one search, the filtered view the
//! committed filter produces, and a cursor recording how many filtered trips
//! have been revealed. Revealed trips are turned into display entries with
//! their variants ordered for the current hotel-change ceiling.

mod display;
mod store;

pub use display::{DisplayTrip, display_batch};
pub use store::{DEFAULT_BATCH_SIZE, Phase, ResultSetStore};
