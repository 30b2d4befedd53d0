//! Cleanup and parsing of the examiner model's JSON output.
//!
//! The prompts demand bare JSON, but models habitually wrap their answer
//! in Markdown code fences. The fences are stripped first, then the body
//! is parsed strictly: a question map must be a non-empty string-to-string
//! object, a verdict must carry both the text and a rating on the 1-5
//! scale.

use std::sync::OnceLock;

use chatexam_core::job::validate_rating;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

/// Errors turning model output into structured results.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The cleaned text is not valid JSON.
    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON parsed but does not have the demanded shape.
    #[error("Unexpected model output: {0}")]
    UnexpectedShape(String),
}

/// Strip leading/trailing Markdown code fences (```` ``` ```` or
/// ```` ```json ````) and surrounding whitespace.
pub fn clean_model_output(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"(?m)^```(?:json)?|```$").expect("valid regex"));
    fence.replace_all(text, "").trim().to_string()
}

/// Parse question-generation output: a non-empty object of question-id ->
/// question text, in model order.
pub fn parse_questions(text: &str) -> Result<IndexMap<String, String>, ParseError> {
    let cleaned = clean_model_output(text);
    let questions: IndexMap<String, String> = serde_json::from_str(&cleaned)?;
    if questions.is_empty() {
        return Err(ParseError::UnexpectedShape(
            "question object is empty".to_string(),
        ));
    }
    Ok(questions)
}

#[derive(Debug, Deserialize)]
struct VerdictPayload {
    verdict: String,
    rating: i32,
}

/// Parse verdict output: `{"verdict": text, "rating": 1..=5}`.
pub fn parse_verdict(text: &str) -> Result<(String, i32), ParseError> {
    let cleaned = clean_model_output(text);
    let payload: VerdictPayload = serde_json::from_str(&cleaned)?;
    if payload.verdict.is_empty() {
        return Err(ParseError::UnexpectedShape(
            "verdict text is empty".to_string(),
        ));
    }
    validate_rating(payload.rating)
        .map_err(|e| ParseError::UnexpectedShape(e.to_string()))?;
    Ok((payload.verdict, payload.rating))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
