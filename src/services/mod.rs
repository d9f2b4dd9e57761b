//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod auth;
pub mod comment;
pub mod dashboard;
pub mod dynamic_table;
pub mod event;
pub mod file;
pub mod organization_unit;
pub mod province;
pub mod region;
pub mod school;
pub mod task;
pub mod task_reply;
pub mod user;

use crate::AppState;
use crate::core::AppError;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Events management server is running!")
}

/// Search endpoints refuse an empty `term`
pub(crate) fn require_term(term: &str) -> Result<&str, AppError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(AppError::bad_request("Search term is required"));
    }
    Ok(term)
}
