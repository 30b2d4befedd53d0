//! GitHub content fetching for student submissions.
//!
//! Students hand in a public GitHub link. A blob URL is rewritten to its
//! raw equivalent and fetched directly; a repository URL is listed through
//! the contents API and the allowed source files are fetched, capped at a
//! configurable count.

use std::time::Duration;

use chatexam_core::sourcecode::strip_comments;
use indexmap::IndexMap;
use serde::Deserialize;

/// Default cap on files pulled from one repository.
pub const DEFAULT_MAX_FILES: usize = 6;

/// File extensions eligible for an exam (everything the comment stripper
/// understands).
const ALLOWED_EXTENSIONS: &[&str] = &["py", "js", "css", "html", "java", "c", "cpp"];

/// Upper bound on a single GitHub request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors fetching student code from GitHub.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GitHub returned a non-2xx status code.
    #[error("GitHub returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The submitted URL is not a usable GitHub link.
    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),
}

// ---------------------------------------------------------------------------
// URL rewriting (pure)
// ---------------------------------------------------------------------------

/// Rewrite a `github.com/.../blob/...` URL to its `raw.githubusercontent.com`
/// equivalent. Any other URL passes through unchanged.
pub fn blob_to_raw_url(url: &str) -> String {
    if url.contains("github.com") && url.contains("/blob/") {
        url.replace("github.com", "raw.githubusercontent.com")
            .replace("/blob/", "/")
    } else {
        url.to_string()
    }
}

/// Build the contents-API URL for a repository URL like
/// `https://github.com/user/repo`.
pub fn repo_contents_url(repo_url: &str) -> Result<String, FetchError> {
    let trimmed = repo_url.trim_end_matches('/');
    let mut parts = trimmed.rsplit('/');
    let repo = parts.next().filter(|s| !s.is_empty());
    let user = parts.next().filter(|s| !s.is_empty());
    match (user, repo) {
        (Some(user), Some(repo)) if trimmed.contains("github.com") => Ok(format!(
            "https://api.github.com/repos/{user}/{repo}/contents/"
        )),
        _ => Err(FetchError::InvalidUrl(repo_url.to_string())),
    }
}

fn is_allowed(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// One entry in a contents-API listing.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    download_url: Option<String>,
}

/// HTTP client for pulling student code off GitHub.
pub struct GithubFetcher {
    client: reqwest::Client,
    max_files: usize,
}

impl GithubFetcher {
    /// Create a fetcher capping repository fetches at `max_files` files.
    pub fn new(max_files: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent("chatexam")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, max_files }
    }

    /// Fetch a single file's raw text, rewriting blob URLs as needed.
    pub async fn fetch_file(&self, url: &str) -> Result<String, FetchError> {
        let raw_url = blob_to_raw_url(url);
        let response = self.client.get(&raw_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: raw_url,
            });
        }
        Ok(response.text().await?)
    }

    /// Fetch the allowed source files of a public repository.
    ///
    /// Lists the repository root through the contents API, keeps files with
    /// an allowed extension (up to the configured cap), and downloads each.
    /// With `strip`, comments are removed per file extension so answers
    /// cannot be read off the student's own comments.
    pub async fn fetch_repo(
        &self,
        repo_url: &str,
        strip: bool,
    ) -> Result<IndexMap<String, String>, FetchError> {
        let api_url = repo_contents_url(repo_url)?;
        let response = self.client.get(&api_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: api_url,
            });
        }
        let entries: Vec<ContentEntry> = response.json().await?;

        let mut files = IndexMap::new();
        for entry in entries {
            if files.len() >= self.max_files {
                break;
            }
            if !is_allowed(&entry.name) {
                continue;
            }
            let Some(download_url) = entry.download_url else {
                continue;
            };
            let text = self.fetch_file(&download_url).await?;
            let text = if strip {
                strip_comments(&text, &entry.name)
            } else {
                text
            };
            files.insert(entry.name, text);
        }

        tracing::debug!(
            repo_url,
            file_count = files.len(),
            "Fetched repository contents",
        );
        Ok(files)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
