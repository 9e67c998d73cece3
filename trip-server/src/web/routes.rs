//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::engine::SearchCompleted;
use crate::filter::{FilterEdit, FilterError};
use crate::presenter::ReadySignal;
use crate::session::StorageError;

use super::dto::*;
use super::state::{AppState, ClientSession, SharedSession};

/// Longest accepted client id.
const MAX_CLIENT_ID_LEN: usize = 64;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions/:client/search", post(search))
        .route("/sessions/:client/load", post(load))
        .route("/sessions/:client/reveal", post(reveal))
        .route("/sessions/:client/filters/draft", put(set_draft))
        .route("/sessions/:client/filters/rollback", post(rollback_draft))
        .route("/sessions/:client/filters/commit", post(commit_filters))
        .route("/sessions/:client/filters/clear", post(clear_filters))
        .route("/sessions/:client/scroll", post(scroll))
        .route("/sessions/:client/page-events", post(page_event))
        .route("/sessions/:client/model", get(model))
        .route("/sessions/:client/form-defaults", get(form_defaults))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Client ids become storage scopes, so only a conservative set is allowed.
fn client_id(raw: &str) -> Result<&str, AppError> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_CLIENT_ID_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));

    if valid {
        Ok(raw)
    } else {
        Err(AppError::BadRequest {
            message: format!("Invalid client id: {raw}"),
        })
    }
}

async fn live_session(state: &AppState, client: &str) -> Result<SharedSession, AppError> {
    let client = client_id(client)?;
    state.session(client).await.ok_or_else(|| AppError::NotFound {
        message: format!("No session for client {client}"),
    })
}

/// Drain the recorded events and pair them with the current model.
fn respond(session: &mut ClientSession) -> Json<SessionResponse> {
    let events = event_views(&session.presenter_mut().drain());
    let model = ModelView::from_model(&session.model());
    Json(SessionResponse { events, model })
}

/// Seed a fresh session with a finished search.
async fn search(
    State(state): State<AppState>,
    Path(client): Path<String>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let client = client_id(&client)?;
    let shared = state.open_session(client, &req.page_key).await?;
    let mut session = shared.lock().await;

    session.on_search_completed(SearchCompleted {
        search_params: req.search_params,
        request_id: req.request_id,
        trips: req.trips,
        tbd_games: req.tbd_games,
    });

    Ok(respond(&mut session))
}

/// Start a session on page load, restoring the previous one if it applies.
async fn load(
    State(state): State<AppState>,
    Path(client): Path<String>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, AppError> {
    let client = client_id(&client)?;
    let shared = state.open_session(client, &req.page_key).await?;
    let mut session = shared.lock().await;

    // The response body is the renderer here, so it is ready immediately
    let outcome = session.restore(req.load_kind, ReadySignal::ready()).await;
    info!(client, ?outcome, "page load");

    let events = event_views(&session.presenter_mut().drain());
    let model = ModelView::from_model(&session.model());
    Ok(Json(LoadResponse::new(outcome, events, model)))
}

async fn reveal(
    State(state): State<AppState>,
    Path(client): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = live_session(&state, &client).await?;
    let mut session = shared.lock().await;
    session.reveal_next();
    Ok(respond(&mut session))
}

/// Edit the draft filter. Unknown fields and malformed values are rejected.
async fn set_draft(
    State(state): State<AppState>,
    Path(client): Path<String>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let edit = FilterEdit::parse(&req.field, &req.value)?;
    let shared = live_session(&state, &client).await?;
    let mut session = shared.lock().await;
    session.set_draft(edit);
    Ok(respond(&mut session))
}

async fn rollback_draft(
    State(state): State<AppState>,
    Path(client): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = live_session(&state, &client).await?;
    let mut session = shared.lock().await;
    session.rollback_draft();
    Ok(respond(&mut session))
}

async fn commit_filters(
    State(state): State<AppState>,
    Path(client): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = live_session(&state, &client).await?;
    let mut session = shared.lock().await;
    session.commit_filters();
    Ok(respond(&mut session))
}

async fn clear_filters(
    State(state): State<AppState>,
    Path(client): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = live_session(&state, &client).await?;
    let mut session = shared.lock().await;
    session.clear_filters();
    Ok(respond(&mut session))
}

async fn scroll(
    State(state): State<AppState>,
    Path(client): Path<String>,
    Json(req): Json<ScrollRequest>,
) -> Result<StatusCode, AppError> {
    let shared = live_session(&state, &client).await?;
    shared.lock().await.update_scroll(req.position);
    Ok(StatusCode::NO_CONTENT)
}

async fn page_event(
    State(state): State<AppState>,
    Path(client): Path<String>,
    Json(req): Json<PageEventRequest>,
) -> Result<Json<NavigationView>, AppError> {
    let shared = live_session(&state, &client).await?;
    let phase = shared.lock().await.handle_page_event(req.event);
    debug!(client, event = ?req.event, ?phase, "page event");
    Ok(Json(phase.into()))
}

async fn model(
    State(state): State<AppState>,
    Path(client): Path<String>,
) -> Result<Json<ModelView>, AppError> {
    let shared = live_session(&state, &client).await?;
    let session = shared.lock().await;
    Ok(Json(ModelView::from_model(&session.model())))
}

/// Remembered search-form values. Available without a live session.
async fn form_defaults(
    State(state): State<AppState>,
    Path(client): Path<String>,
) -> Result<Json<FormDefaultsResponse>, AppError> {
    let client = client_id(&client)?;
    let codec = state.codec(client)?;
    let values = codec.load_form_defaults(Utc::now(), state.config.form_defaults_ttl());
    Ok(Json(FormDefaultsResponse { values }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<FilterError> for AppError {
    fn from(e: FilterError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidKey(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Io { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
