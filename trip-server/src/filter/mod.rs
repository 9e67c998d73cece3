//! Trip filtering with a draft/commit workflow.
//!
//! Team, city and minimum-games predicates act on a trip's default-variant
//! summary. The hotel-change ceiling acts on variants and hides a trip only
//! when none of its variants complies.

mod chrome;
mod engine;
mod error;
mod state;

pub use chrome::{ActiveFilter, FilterChrome};
pub use engine::FilterEngine;
pub use error::FilterError;
pub use state::{DEFAULT_MIN_GAMES, FilterEdit, FilterField, FilterState, HotelCeiling};
