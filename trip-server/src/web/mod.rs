//! HTTP host for trip result sessions.
//!
//! Each client gets one live [`TripSession`](crate::engine::TripSession) at a
//! time. Responses carry the presentation events the operation produced
//! together with the resulting model.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ClientSession, SessionStorage, SharedSession};
