use std::sync::Arc;

use chatexam_ai::github::GithubFetcher;
use chatexam_jobs::orchestrator::Orchestrator;
use chatexam_jobs::store::JobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory job store (read directly by the health endpoint).
    pub store: Arc<JobStore>,
    /// Generation-job orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// GitHub source fetcher for student submissions.
    pub fetcher: Arc<GithubFetcher>,
}
