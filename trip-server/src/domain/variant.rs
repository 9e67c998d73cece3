//! Trip variants.

use serde::{Deserialize, Serialize};

use super::{CityId, TeamId};

/// One concrete realisation of a trip.
///
/// Variants of the same trip differ in city order, hotel changes and total
/// travel time. The day-by-day schedule is opaque to the engine and is
/// carried through untouched for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Cities in visiting order.
    pub cities: Vec<CityId>,

    /// Teams in game order.
    pub teams: Vec<TeamId>,

    /// Number of games attended.
    pub game_count: u32,

    /// Number of times the traveller checks into a different hotel.
    pub hotel_changes: u32,

    /// Total time spent travelling between games.
    pub travel_minutes: u32,

    /// Day-by-day schedule.
    #[serde(default)]
    pub schedule: serde_json::Value,
}

impl Variant {
    /// Create a variant with an empty schedule.
    pub fn new(
        cities: Vec<CityId>,
        teams: Vec<TeamId>,
        game_count: u32,
        hotel_changes: u32,
        travel_minutes: u32,
    ) -> Self {
        Self {
            cities,
            teams,
            game_count,
            hotel_changes,
            travel_minutes,
            schedule: serde_json::Value::Null,
        }
    }

    /// Attach a schedule.
    pub fn with_schedule(mut self, schedule: serde_json::Value) -> Self {
        self.schedule = schedule;
        self
    }
}
