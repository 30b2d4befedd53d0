//! Shared helpers for API integration tests.
//!
//! [`build_test_app`] constructs the production router via
//! [`build_app_router`], so tests exercise the same middleware stack
//! (CORS, request ID, timeout, tracing, panic recovery) as `main.rs`,
//! with a scripted generator standing in for the Gemini-backed examiner.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use chatexam_ai::github::GithubFetcher;
use chatexam_core::job::{Generate, GenerationError, GenerationOutput, GenerationRequest};
use chatexam_jobs::orchestrator::Orchestrator;
use chatexam_jobs::store::JobStore;
use http_body_util::BodyExt;
use indexmap::IndexMap;
use tower::ServiceExt;

use chatexam_api::config::ServerConfig;
use chatexam_api::router::build_app_router;
use chatexam_api::state::AppState;

// ---------------------------------------------------------------------------
// Scripted generators
// ---------------------------------------------------------------------------

/// A generator that always returns the same outcome, without any I/O.
pub struct ScriptedGenerator {
    outcome: Result<GenerationOutput, GenerationError>,
}

impl ScriptedGenerator {
    /// Succeed with a fixed question map.
    pub fn questions(pairs: &[(&str, &str)]) -> Self {
        let map: IndexMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            outcome: Ok(GenerationOutput::Questions(map)),
        }
    }

    /// Succeed with a fixed verdict.
    pub fn verdict(text: &str, rating: i32) -> Self {
        Self {
            outcome: Ok(GenerationOutput::Verdict {
                verdict: text.to_string(),
                rating,
            }),
        }
    }

    /// Fail with a fixed error message.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(GenerationError(message.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl Generate for ScriptedGenerator {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        job_store_capacity: 100,
        job_ttl_secs: 300,
        generation_concurrency: 30,
        gemini_api_key: String::new(),
        gemini_model: "gemini-2.5-flash".to_string(),
        github_max_files: 6,
    }
}

/// Build the full application router around a scripted generator.
pub fn build_test_app(generator: Arc<dyn Generate>) -> Router {
    let config = test_config();
    let store = Arc::new(JobStore::new(
        config.job_store_capacity,
        Duration::from_secs(config.job_ttl_secs),
    ));
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&store),
        generator,
        config.generation_concurrency,
    ));
    let fetcher = Arc::new(GithubFetcher::new(config.github_max_files));

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        orchestrator,
        fetcher,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and return the raw response.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body must be valid JSON")
}
