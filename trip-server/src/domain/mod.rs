//! Domain types for the trip result engine.
//!
//! This module contains the trip and variant model consumed by the filter
//! engine, the variant selector and the result store. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod error;
mod ids;
mod trip;
mod variant;

pub use error::DomainError;
pub use ids::{CityId, InvalidId, TeamId};
pub use trip::{Trip, TripSummary};
pub use variant::Variant;
