use chatexam_ai::client::DEFAULT_MODEL;
use chatexam_ai::github::DEFAULT_MAX_FILES;
use chatexam_jobs::orchestrator::DEFAULT_GENERATION_CONCURRENCY;
use chatexam_jobs::store::{DEFAULT_CAPACITY, DEFAULT_TTL};

/// Server configuration loaded from environment variables.
///
/// All fields except the API key have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum jobs held in the in-memory store (default: `100`).
    pub job_store_capacity: usize,
    /// Seconds a job record stays readable after insertion (default: `300`).
    pub job_ttl_secs: u64,
    /// Maximum concurrently running generation calls (default: `30`).
    pub generation_concurrency: usize,
    /// Gemini API key. Empty when unset; generation jobs then fail with an
    /// upstream error instead of the server refusing to start.
    pub gemini_api_key: String,
    /// Gemini model name (default: `gemini-2.5-flash`).
    pub gemini_model: String,
    /// Maximum files pulled from one GitHub repository (default: `6`).
    pub github_max_files: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `JOB_STORE_CAPACITY`     | `100`                      |
    /// | `JOB_TTL_SECS`           | `300`                      |
    /// | `GENERATION_CONCURRENCY` | `30`                       |
    /// | `GEMINI_API_KEY`         | (empty)                    |
    /// | `GEMINI_MODEL`           | `gemini-2.5-flash`         |
    /// | `GITHUB_MAX_FILES`       | `6`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let job_store_capacity: usize = std::env::var("JOB_STORE_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_CAPACITY.to_string())
            .parse()
            .expect("JOB_STORE_CAPACITY must be a valid usize");

        let job_ttl_secs: u64 = std::env::var("JOB_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL.as_secs().to_string())
            .parse()
            .expect("JOB_TTL_SECS must be a valid u64");

        let generation_concurrency: usize = std::env::var("GENERATION_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_GENERATION_CONCURRENCY.to_string())
            .parse()
            .expect("GENERATION_CONCURRENCY must be a valid usize");

        let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let github_max_files: usize = std::env::var("GITHUB_MAX_FILES")
            .unwrap_or_else(|_| DEFAULT_MAX_FILES.to_string())
            .parse()
            .expect("GITHUB_MAX_FILES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            job_store_capacity,
            job_ttl_secs,
            generation_concurrency,
            gemini_api_key,
            gemini_model,
            github_max_files,
        }
    }
}
