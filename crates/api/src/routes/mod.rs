pub mod exam;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /exams/questions   poll-or-start question generation (POST)
/// /exams/verdict     poll-or-start verdict generation (POST)
/// /exams/source      fetch student code from GitHub (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(exam::router())
}
