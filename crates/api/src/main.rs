use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatexam_ai::client::GeminiClient;
use chatexam_ai::examiner::Examiner;
use chatexam_ai::github::GithubFetcher;
use chatexam_api::config::ServerConfig;
use chatexam_api::router::build_app_router;
use chatexam_api::state::AppState;
use chatexam_core::job::Generate;
use chatexam_jobs::orchestrator::Orchestrator;
use chatexam_jobs::store::JobStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatexam_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generation jobs will fail");
    }

    // --- Job store ---
    let store = Arc::new(JobStore::new(
        config.job_store_capacity,
        Duration::from_secs(config.job_ttl_secs),
    ));

    // --- Examiner + orchestrator ---
    let client = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let generator: Arc<dyn Generate> = Arc::new(Examiner::new(client));
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&store),
        generator,
        config.generation_concurrency,
    ));
    tracing::info!(
        model = %config.gemini_model,
        concurrency = config.generation_concurrency,
        "Orchestrator started"
    );

    // --- GitHub fetcher ---
    let fetcher = Arc::new(GithubFetcher::new(config.github_max_files));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        orchestrator,
        fetcher,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight generation workers are dropped with the runtime; jobs are
    // in-memory only, so there is nothing to drain.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
