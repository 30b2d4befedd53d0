//! Job records, kinds, statuses, and the generation dependency seam.
//!
//! A *job* is one asynchronous unit of generation work (exam questions or a
//! grading verdict) tied to a student and a kind. Each kind is a closed
//! enum variant with exactly one payload type, so dispatch is exhaustively
//! checked at compile time.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Opaque unique job token. Minted by the orchestrator (UUID v4 string);
/// consumers must not parse it.
pub type JobId = String;

// ---------------------------------------------------------------------------
// Kind and status
// ---------------------------------------------------------------------------

/// Which generation operation a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Generate exam questions about submitted source code.
    Questions,
    /// Grade a student's written answers against their code.
    Verdict,
}

impl JobKind {
    /// Stable string form used in logs and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Questions => "questions",
            JobKind::Verdict => "verdict",
        }
    }
}

/// Poll-friendly status of a job record.
///
/// `Pending` is the only non-terminal status. An evicted or expired record
/// is also reported as `Pending` to the poller (restart semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Lifecycle state of a job record, carrying the kind-specific result when
/// terminal.
///
/// The only legal transitions are `Pending -> Done` and `Pending -> Error`;
/// both are terminal. The job store enforces this on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// A worker has been spawned; no result yet.
    Pending,
    /// Generation succeeded.
    Done(GenerationOutput),
    /// Generation failed; carries a human-readable message.
    Error(String),
}

impl JobState {
    /// Collapse the state into its poll-friendly status.
    pub fn status(&self) -> JobStatus {
        match self {
            JobState::Pending => JobStatus::Pending,
            JobState::Done(_) => JobStatus::Done,
            JobState::Error(_) => JobStatus::Error,
        }
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

/// One asynchronous unit of generation work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: JobId,
    pub kind: JobKind,
    /// The student on whose behalf the job runs.
    pub student_id: DbId,
    pub state: JobState,
}

// ---------------------------------------------------------------------------
// Generation request / output
// ---------------------------------------------------------------------------

/// Kind-specific input for a generation job. One variant per [`JobKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// Generate up to `question_count` short exam questions about `files`.
    Questions {
        /// File name -> source text, in display order.
        files: IndexMap<String, String>,
        question_count: u32,
    },
    /// Grade `answers` to `questions` against the submitted `code`.
    Verdict {
        code: String,
        questions: IndexMap<String, String>,
        answers: IndexMap<String, String>,
    },
}

impl GenerationRequest {
    /// The job kind this request produces.
    pub fn kind(&self) -> JobKind {
        match self {
            GenerationRequest::Questions { .. } => JobKind::Questions,
            GenerationRequest::Verdict { .. } => JobKind::Verdict,
        }
    }

    /// Caller-side precondition check. The orchestrator itself assumes a
    /// valid request; the HTTP layer calls this before enqueueing.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            GenerationRequest::Questions {
                files,
                question_count,
            } => {
                if files.is_empty() {
                    return Err(CoreError::Validation(
                        "Question generation requires at least one source file".to_string(),
                    ));
                }
                if *question_count == 0 {
                    return Err(CoreError::Validation(
                        "question_count must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
            GenerationRequest::Verdict {
                code,
                questions,
                answers,
            } => {
                if code.is_empty() {
                    return Err(CoreError::Validation(
                        "Verdict generation requires the submitted code".to_string(),
                    ));
                }
                if questions.is_empty() || answers.is_empty() {
                    return Err(CoreError::Validation(
                        "Verdict generation requires questions and answers".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Kind-specific result of a completed generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationOutput {
    /// Question id -> question text, in model order.
    Questions(IndexMap<String, String>),
    /// Grading verdict with a rating in [`MIN_RATING`]..=[`MAX_RATING`].
    Verdict { verdict: String, rating: i32 },
}

/// Lowest legal verdict rating (poor understanding).
pub const MIN_RATING: i32 = 1;
/// Highest legal verdict rating (excellent understanding).
pub const MAX_RATING: i32 = 5;

/// Validate that a verdict rating is within the 1..=5 grading scale.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Generation dependency seam
// ---------------------------------------------------------------------------

/// Failure of the external generation dependency: transport errors,
/// upstream non-2xx responses, or unparseable model output. Captured by
/// workers into an `Error` record; never surfaced to pollers as a failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct GenerationError(pub String);

/// The slow, fallible external generation call.
///
/// Implemented by the AI examiner; the orchestrator only ever sees this
/// trait, so tests substitute a scripted fake.
#[async_trait::async_trait]
pub trait Generate: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
