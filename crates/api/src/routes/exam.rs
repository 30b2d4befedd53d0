use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount exam routes under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/exams/questions", post(handlers::exam::poll_questions))
        .route("/exams/verdict", post(handlers::exam::poll_verdict))
        .route("/exams/source", post(handlers::exam::fetch_source))
}
