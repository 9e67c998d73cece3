//! Filter state and the edits that change it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;
use crate::domain::{CityId, TeamId, Trip};

/// Minimum game count applied when no filter has been chosen.
pub const DEFAULT_MIN_GAMES: u32 = 2;

/// Upper bound on hotel changes.
///
/// `Unbounded` is the "no ceiling" sentinel and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum HotelCeiling {
    #[default]
    Unbounded,
    AtMost(u32),
}

impl HotelCeiling {
    /// Whether a variant with `hotel_changes` satisfies the ceiling.
    pub fn admits(self, hotel_changes: u32) -> bool {
        match self {
            HotelCeiling::Unbounded => true,
            HotelCeiling::AtMost(max) => hotel_changes <= max,
        }
    }

    /// Whether the ceiling is non-binding for a trip whose worst variant has
    /// `max_possible` hotel changes.
    pub fn covers(self, max_possible: u32) -> bool {
        self.admits(max_possible)
    }
}

impl From<Option<u32>> for HotelCeiling {
    fn from(value: Option<u32>) -> Self {
        value.map_or(HotelCeiling::Unbounded, HotelCeiling::AtMost)
    }
}

impl From<HotelCeiling> for Option<u32> {
    fn from(ceiling: HotelCeiling) -> Self {
        match ceiling {
            HotelCeiling::Unbounded => None,
            HotelCeiling::AtMost(max) => Some(max),
        }
    }
}

/// Names of the filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Team,
    City,
    MinGames,
    MaxHotelChanges,
}

impl FilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Team => "team",
            FilterField::City => "city",
            FilterField::MinGames => "minGames",
            FilterField::MaxHotelChanges => "maxHotelChanges",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "team" => Ok(FilterField::Team),
            "city" => Ok(FilterField::City),
            "minGames" => Ok(FilterField::MinGames),
            "maxHotelChanges" => Ok(FilterField::MaxHotelChanges),
            other => Err(FilterError::UnknownField(other.to_string())),
        }
    }
}

/// A single well-typed change to the draft filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Team(Option<TeamId>),
    City(Option<CityId>),
    MinGames(u32),
    MaxHotelChanges(HotelCeiling),
}

impl FilterEdit {
    /// Build an edit from a field name and a JSON value.
    ///
    /// `null` (or an empty string for team and city) clears the field.
    pub fn parse(field: &str, value: &serde_json::Value) -> Result<Self, FilterError> {
        let field: FilterField = field.parse()?;
        let invalid = |reason: &str| FilterError::InvalidValue {
            field: field.as_str(),
            reason: reason.to_string(),
        };

        match field {
            FilterField::Team => match optional_str(value).map_err(|r| invalid(r))? {
                None => Ok(FilterEdit::Team(None)),
                Some(s) => TeamId::parse(s)
                    .map(|t| FilterEdit::Team(Some(t)))
                    .map_err(|e| invalid(&e.to_string())),
            },
            FilterField::City => match optional_str(value).map_err(|r| invalid(r))? {
                None => Ok(FilterEdit::City(None)),
                Some(s) => CityId::parse(s)
                    .map(|c| FilterEdit::City(Some(c)))
                    .map_err(|e| invalid(&e.to_string())),
            },
            FilterField::MinGames => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(FilterEdit::MinGames)
                .ok_or_else(|| invalid("expected a non-negative integer")),
            FilterField::MaxHotelChanges => {
                if value.is_null() {
                    return Ok(FilterEdit::MaxHotelChanges(HotelCeiling::Unbounded));
                }
                value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .map(|n| FilterEdit::MaxHotelChanges(HotelCeiling::AtMost(n)))
                    .ok_or_else(|| invalid("expected null or a non-negative integer"))
            }
        }
    }

    pub fn field(&self) -> FilterField {
        match self {
            FilterEdit::Team(_) => FilterField::Team,
            FilterEdit::City(_) => FilterField::City,
            FilterEdit::MinGames(_) => FilterField::MinGames,
            FilterEdit::MaxHotelChanges(_) => FilterField::MaxHotelChanges,
        }
    }
}

fn optional_str(value: &serde_json::Value) -> Result<Option<&str>, &'static str> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Err("expected a string or null"),
    }
}

/// The four filter fields.
///
/// Both the committed and the draft filter are instances of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub team: Option<TeamId>,
    pub city: Option<CityId>,
    pub min_games: u32,
    pub max_hotel_changes: HotelCeiling,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            team: None,
            city: None,
            min_games: DEFAULT_MIN_GAMES,
            max_hotel_changes: HotelCeiling::Unbounded,
        }
    }
}

impl FilterState {
    /// Defaults with a custom minimum game count.
    pub fn with_min_games(min_games: u32) -> Self {
        Self {
            min_games: min_games.max(1),
            ..Self::default()
        }
    }

    /// Apply one edit. A minimum game count of zero is raised to one.
    pub fn apply(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::Team(team) => self.team = team,
            FilterEdit::City(city) => self.city = city,
            FilterEdit::MinGames(n) => self.min_games = n.max(1),
            FilterEdit::MaxHotelChanges(ceiling) => self.max_hotel_changes = ceiling,
        }
    }

    /// Trip-level predicates over the default variant's summary.
    pub fn matches_summary(&self, trip: &Trip) -> bool {
        let summary = trip.summary();

        if let Some(team) = &self.team
            && !summary.teams.contains(team)
        {
            return false;
        }

        if let Some(city) = &self.city
            && !summary.cities.contains(city)
        {
            return false;
        }

        summary.game_count >= self.min_games
    }

    /// Whether at least one variant satisfies the hotel-change ceiling.
    pub fn admits_any_variant(&self, trip: &Trip) -> bool {
        trip.variants()
            .iter()
            .any(|v| self.max_hotel_changes.admits(v.hotel_changes))
    }

    /// Whether the trip stays in the filtered view.
    pub fn matches(&self, trip: &Trip) -> bool {
        self.matches_summary(trip) && self.admits_any_variant(trip)
    }
}
