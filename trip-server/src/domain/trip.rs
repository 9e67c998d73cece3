//! Trips and their derived summaries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::{CityId, TeamId, Variant};

/// Summary fields derived from a trip's default variant.
///
/// Filters match against these, never against the variant list directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TripSummary {
    pub teams: BTreeSet<TeamId>,
    pub cities: BTreeSet<CityId>,
    pub game_count: u32,
}

impl TripSummary {
    fn from_variant(variant: &Variant) -> Self {
        Self {
            teams: variant.teams.iter().cloned().collect(),
            cities: variant.cities.iter().cloned().collect(),
            game_count: variant.game_count,
        }
    }
}

/// Wire form of a trip, validated into [`Trip`] on deserialization.
#[derive(Debug, Deserialize)]
struct TripRecord {
    id: String,
    variants: Vec<Variant>,
}

/// A candidate multi-city itinerary.
///
/// A trip always has at least one variant. The first variant is the default
/// one; its summary is recomputed whenever the variant list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TripRecord")]
pub struct Trip {
    id: String,
    variants: Vec<Variant>,
    #[serde(skip)]
    summary: TripSummary,
}

impl Trip {
    /// Create a trip, rejecting an empty variant list.
    pub fn new(id: impl Into<String>, variants: Vec<Variant>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::MissingTripId);
        }

        let summary = match variants.first() {
            Some(default) => TripSummary::from_variant(default),
            None => return Err(DomainError::EmptyTrip(id)),
        };

        Ok(Self {
            id,
            variants,
            summary,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// The variant shown when no hotel-change constraint applies.
    pub fn default_variant(&self) -> &Variant {
        // Non-empty by construction
        &self.variants[0]
    }

    pub fn summary(&self) -> &TripSummary {
        &self.summary
    }

    /// Replace the variant list and recompute the summary.
    ///
    /// Leaves the trip untouched if `variants` is empty.
    pub fn replace_variants(&mut self, variants: Vec<Variant>) -> Result<(), DomainError> {
        let Some(default) = variants.first() else {
            return Err(DomainError::EmptyTrip(self.id.clone()));
        };
        self.summary = TripSummary::from_variant(default);
        self.variants = variants;
        Ok(())
    }

    /// Largest hotel-change count across all variants.
    pub fn max_hotel_changes(&self) -> u32 {
        self.variants
            .iter()
            .map(|v| v.hotel_changes)
            .max()
            .unwrap_or(0)
    }

    /// Smallest hotel-change count across all variants.
    pub fn min_hotel_changes(&self) -> u32 {
        self.variants
            .iter()
            .map(|v| v.hotel_changes)
            .min()
            .unwrap_or(0)
    }
}

impl TryFrom<TripRecord> for Trip {
    type Error = DomainError;

    fn try_from(record: TripRecord) -> Result<Self, Self::Error> {
        Trip::new(record.id, record.variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team(s: &str) -> TeamId {
        TeamId::parse(s).unwrap()
    }

    fn city(s: &str) -> CityId {
        CityId::parse(s).unwrap()
    }

    fn variant(teams: &[&str], cities: &[&str], games: u32, hotels: u32) -> Variant {
        Variant::new(
            cities.iter().map(|c| city(c)).collect(),
            teams.iter().map(|t| team(t)).collect(),
            games,
            hotels,
            60,
        )
    }

    #[test]
    fn summary_comes_from_first_variant() {
        let trip = Trip::new(
            "t1",
            vec![
                variant(&["BOS", "NYY"], &["Boston", "New York"], 2, 1),
                variant(&["BOS", "NYY", "PHI"], &["Boston", "New York", "Philadelphia"], 3, 2),
            ],
        )
        .unwrap();

        assert_eq!(trip.summary().game_count, 2);
        assert!(trip.summary().teams.contains(&team("NYY")));
        assert!(!trip.summary().teams.contains(&team("PHI")));
        assert!(!trip.summary().cities.contains(&city("Philadelphia")));
    }

    #[test]
    fn summary_deduplicates_repeat_visits() {
        let trip = Trip::new(
            "t1",
            vec![variant(&["CHC", "CWS", "CHC"], &["Chicago", "Chicago"], 3, 0)],
        )
        .unwrap();

        assert_eq!(trip.summary().teams.len(), 2);
        assert_eq!(trip.summary().cities.len(), 1);
    }

    #[test]
    fn empty_variants_rejected() {
        let err = Trip::new("t1", vec![]).unwrap_err();
        assert_eq!(err, DomainError::EmptyTrip("t1".into()));
    }

    #[test]
    fn blank_id_rejected() {
        let err = Trip::new(" ", vec![variant(&["BOS"], &["Boston"], 1, 0)]).unwrap_err();
        assert_eq!(err, DomainError::MissingTripId);
    }

    #[test]
    fn replace_variants_recomputes_summary() {
        let mut trip = Trip::new("t1", vec![variant(&["BOS"], &["Boston"], 1, 0)]).unwrap();

        trip.replace_variants(vec![variant(&["SEA", "SF"], &["Seattle", "San Francisco"], 4, 2)])
            .unwrap();

        assert_eq!(trip.summary().game_count, 4);
        assert!(trip.summary().cities.contains(&city("Seattle")));
        assert!(!trip.summary().teams.contains(&team("BOS")));
    }

    #[test]
    fn replace_with_empty_keeps_old_variants() {
        let mut trip = Trip::new("t1", vec![variant(&["BOS"], &["Boston"], 1, 0)]).unwrap();

        assert!(trip.replace_variants(vec![]).is_err());
        assert_eq!(trip.variants().len(), 1);
        assert_eq!(trip.summary().game_count, 1);
    }

    #[test]
    fn hotel_change_bounds() {
        let trip = Trip::new(
            "t1",
            vec![
                variant(&["A"], &["X"], 3, 2),
                variant(&["A"], &["X"], 3, 0),
                variant(&["A"], &["X"], 3, 5),
            ],
        )
        .unwrap();

        assert_eq!(trip.max_hotel_changes(), 5);
        assert_eq!(trip.min_hotel_changes(), 0);
    }

    #[test]
    fn deserialize_recomputes_summary() {
        let trip: Trip = serde_json::from_value(json!({
            "id": "abc",
            "variants": [{
                "cities": ["Denver"],
                "teams": ["COL"],
                "gameCount": 1,
                "hotelChanges": 0,
                "travelMinutes": 0
            }]
        }))
        .unwrap();

        assert_eq!(trip.id(), "abc");
        assert_eq!(trip.summary().game_count, 1);
        assert!(trip.summary().teams.contains(&team("COL")));
    }

    #[test]
    fn deserialize_rejects_empty_variants() {
        let result = serde_json::from_value::<Trip>(json!({"id": "abc", "variants": []}));
        assert!(result.is_err());
    }

    #[test]
    fn serialize_omits_summary() {
        let trip = Trip::new("t1", vec![variant(&["BOS"], &["Boston"], 1, 0)]).unwrap();
        let value = serde_json::to_value(&trip).unwrap();

        assert_eq!(value["id"], "t1");
        assert!(value.get("summary").is_none());
        assert_eq!(value["variants"].as_array().unwrap().len(), 1);
    }
}
