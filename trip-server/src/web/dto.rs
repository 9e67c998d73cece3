//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{CityId, TeamId, Trip, Variant};
use crate::engine::{Cursor, PresentationModel, RestoreOutcome};
use crate::filter::FilterChrome;
use crate::presenter::PresentationEvent;
use crate::results::{DisplayTrip, Phase};
use crate::session::{Absence, LoadKind, NavigationPhase, PageEvent, SearchParams, UnloadKind};

/// Request to seed a session with a finished search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Identity of the results page (URL path and query)
    pub page_key: String,

    #[serde(default)]
    pub search_params: SearchParams,

    #[serde(default)]
    pub request_id: String,

    pub trips: Vec<Trip>,

    #[serde(default)]
    pub tbd_games: Vec<serde_json::Value>,
}

/// Request to restore a session on page load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub page_key: String,

    /// How the browser reports this load
    #[serde(default)]
    pub load_kind: LoadKind,
}

/// A single draft filter edit.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub field: String,

    /// `null` clears the field
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ScrollRequest {
    pub position: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageEventRequest {
    pub event: PageEvent,
}

/// Summary fields of a trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub teams: Vec<TeamId>,
    pub cities: Vec<CityId>,
    pub game_count: u32,
}

/// A revealed trip with its variants in display order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub id: String,
    pub summary: SummaryView,
    pub variants: Vec<Variant>,

    /// Index into `variants` of the variant shown by default
    pub chosen: Option<usize>,
}

impl TripView {
    pub fn from_display(display: &DisplayTrip) -> Self {
        let summary = display.trip.summary();
        let chosen = display
            .chosen
            .and_then(|c| display.order.iter().position(|&i| i == c));

        Self {
            id: display.trip.id().to_string(),
            summary: SummaryView {
                teams: summary.teams.iter().cloned().collect(),
                cities: summary.cities.iter().cloned().collect(),
                game_count: summary.game_count,
            },
            variants: display.ordered_variants().cloned().collect(),
            chosen,
        }
    }
}

fn trip_views(trips: &[DisplayTrip]) -> Vec<TripView> {
    trips.iter().map(TripView::from_display).collect()
}

/// What the renderer was told, in order.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventView {
    BatchRevealed {
        trips: Vec<TripView>,
    },
    FilterStateChanged {
        filters: FilterChrome,
    },
    NoMatches {
        #[serde(rename = "hasAlternateContent")]
        has_alternate_content: bool,
    },
    ScrollApplied {
        position: u32,
    },
}

impl EventView {
    pub fn from_event(event: &PresentationEvent) -> Self {
        match event {
            PresentationEvent::BatchRevealed(trips) => EventView::BatchRevealed {
                trips: trip_views(trips),
            },
            PresentationEvent::FilterStateChanged(chrome) => EventView::FilterStateChanged {
                filters: chrome.clone(),
            },
            PresentationEvent::NoMatches {
                has_alternate_content,
            } => EventView::NoMatches {
                has_alternate_content: *has_alternate_content,
            },
            PresentationEvent::ScrollApplied(position) => EventView::ScrollApplied {
                position: *position,
            },
        }
    }
}

pub fn event_views(events: &[PresentationEvent]) -> Vec<EventView> {
    events.iter().map(EventView::from_event).collect()
}

/// Everything currently on screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelView {
    pub trips: Vec<TripView>,
    pub cursor: Cursor,
    pub filters: FilterChrome,
    pub phase: &'static str,
    pub tbd_games: Vec<serde_json::Value>,
}

impl ModelView {
    pub fn from_model(model: &PresentationModel) -> Self {
        Self {
            trips: trip_views(&model.trips),
            cursor: model.cursor,
            filters: model.filters.clone(),
            phase: phase_name(model.phase),
            tbd_games: model.tbd_games.clone(),
        }
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Empty => "empty",
        Phase::Seeded => "seeded",
        Phase::Filtered => "filtered",
        Phase::Revealing => "revealing",
        Phase::Exhausted => "exhausted",
    }
}

/// Response to any operation on a live session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub events: Vec<EventView>,
    pub model: ModelView,
}

/// Response to a page load.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    pub restored: bool,

    /// Why nothing was restored
    pub absence: Option<Absence>,

    pub revealed: usize,
    pub scroll_position: u32,
    pub events: Vec<EventView>,
    pub model: ModelView,
}

impl LoadResponse {
    pub fn new(outcome: RestoreOutcome, events: Vec<EventView>, model: ModelView) -> Self {
        match outcome {
            RestoreOutcome::Restored {
                revealed,
                scroll_position,
                ..
            } => Self {
                restored: true,
                absence: None,
                revealed,
                scroll_position,
                events,
                model,
            },
            RestoreOutcome::Absent(absence) => Self {
                restored: false,
                absence: Some(absence),
                revealed: 0,
                scroll_position: 0,
                events,
                model,
            },
        }
    }
}

/// Navigation tracker state after a page event.
#[derive(Debug, Serialize)]
pub struct NavigationView {
    pub phase: &'static str,
    pub unload: Option<UnloadKind>,
}

impl From<NavigationPhase> for NavigationView {
    fn from(phase: NavigationPhase) -> Self {
        match phase {
            NavigationPhase::Idle => Self {
                phase: "idle",
                unload: None,
            },
            NavigationPhase::NavigationPending => Self {
                phase: "navigationPending",
                unload: None,
            },
            NavigationPhase::Unloaded(kind) => Self {
                phase: "unloaded",
                unload: Some(kind),
            },
        }
    }
}

/// Remembered search-form values.
#[derive(Debug, Serialize)]
pub struct FormDefaultsResponse {
    pub values: Option<SearchParams>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
