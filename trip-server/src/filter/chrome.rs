//! Filter chrome descriptors for the renderer.

use std::collections::BTreeSet;

use serde::Serialize;

use super::engine::FilterEngine;
use super::state::{FilterField, FilterState, HotelCeiling};
use crate::domain::{CityId, TeamId};
use crate::results::ResultSetStore;

/// A committed filter that differs from its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub field: FilterField,
    pub label: String,
}

/// Everything the renderer needs to draw the filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChrome {
    pub committed: FilterState,
    pub draft: FilterState,
    pub dirty: bool,
    pub active: Vec<ActiveFilter>,
    pub teams: Vec<TeamId>,
    pub cities: Vec<CityId>,

    /// Largest hotel-change count of any variant in the result set.
    pub max_hotel_changes: u32,
}

impl FilterChrome {
    pub fn build(engine: &FilterEngine, store: &ResultSetStore) -> Self {
        let mut teams = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut max_hotel_changes = 0;

        for trip in store.original() {
            teams.extend(trip.summary().teams.iter().cloned());
            cities.extend(trip.summary().cities.iter().cloned());
            max_hotel_changes = max_hotel_changes.max(trip.max_hotel_changes());
        }

        Self {
            committed: engine.committed().clone(),
            draft: engine.draft().clone(),
            dirty: engine.is_dirty(),
            active: active_filters(engine.committed(), engine.defaults()),
            teams: teams.into_iter().collect(),
            cities: cities.into_iter().collect(),
            max_hotel_changes,
        }
    }
}

fn active_filters(state: &FilterState, defaults: &FilterState) -> Vec<ActiveFilter> {
    let mut active = Vec::new();

    if let Some(team) = &state.team {
        active.push(ActiveFilter {
            field: FilterField::Team,
            label: team.to_string(),
        });
    }

    if let Some(city) = &state.city {
        active.push(ActiveFilter {
            field: FilterField::City,
            label: city.to_string(),
        });
    }

    if state.min_games != defaults.min_games {
        active.push(ActiveFilter {
            field: FilterField::MinGames,
            label: format!("{}+ games", state.min_games),
        });
    }

    if let HotelCeiling::AtMost(max) = state.max_hotel_changes
        && state.max_hotel_changes != defaults.max_hotel_changes
    {
        let label = match max {
            0 => "No hotel changes".to_string(),
            1 => "Up to 1 hotel change".to_string(),
            n => format!("Up to {n} hotel changes"),
        };
        active.push(ActiveFilter {
            field: FilterField::MaxHotelChanges,
            label,
        });
    }

    active
}
