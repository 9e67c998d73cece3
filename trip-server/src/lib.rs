//! Trip results session engine.
//!
//! Takes the trips returned by a search, filters and paginates them, picks
//! which variant of each trip to show, and keeps enough state to bring the
//! page back exactly as it was after a refresh.

pub mod config;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod presenter;
pub mod results;
pub mod session;
pub mod variants;
pub mod web;
