//! REST client for the Gemini `generateContent` endpoint.
//!
//! One prompt in, one completion text out. The only timeout anywhere in
//! the generation path is this client's request timeout -- the orchestrator
//! deliberately enforces no deadline of its own.

use std::time::Duration;

use serde::Deserialize;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Production API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on a single completion request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for one configured Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed as JSON but carried no candidate text.
    #[error("Malformed Gemini response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

impl GeminiClient {
    /// Create a client for the production endpoint.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), api_key, model)
    }

    /// Create a client against a custom base URL (used by tests pointing
    /// at a local stub server).
    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url,
            model,
            api_key,
        }
    }

    /// Configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the first candidate's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, GeminiClientError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateContentResponse = Self::parse_response(response).await?;

        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_token_count,
                response_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini token usage",
            );
        }

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text)
            })
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                GeminiClientError::MalformedResponse("no candidate text in response".to_string())
            })
    }

    // ---- private helpers ----

    /// Parse a successful JSON response body, or capture the status and
    /// body of a failed one.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeminiClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiClientError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
