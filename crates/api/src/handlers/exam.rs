//! Handlers for the `/exams` resource.
//!
//! The question and verdict endpoints follow the same poll-or-start cycle:
//! every POST is idempotent, adopts the live job for its `(student, kind)`
//! key if one exists, and reports its current status. Clients repeat the
//! identical request until the status leaves `pending`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chatexam_ai::github::FetchError;
use chatexam_core::job::{
    GenerationOutput, GenerationRequest, JobId, JobState, JobStatus,
};
use chatexam_core::prompt::DEFAULT_QUESTION_COUNT;
use chatexam_core::types::DbId;
use chatexam_jobs::orchestrator::JobSnapshot;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Request body for POST /exams/questions.
#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    /// Student the exam belongs to.
    pub student_id: DbId,
    /// File-name -> source-text mapping the questions are generated from.
    pub files: IndexMap<String, String>,
    /// Questions to generate; defaults to [`DEFAULT_QUESTION_COUNT`].
    pub question_count: Option<u32>,
}

/// Request body for POST /exams/verdict.
#[derive(Debug, Deserialize)]
pub struct VerdictRequest {
    /// Student the exam belongs to.
    pub student_id: DbId,
    /// The submitted source code under evaluation.
    pub code: String,
    /// Question-id -> question text, as generated earlier.
    pub questions: IndexMap<String, String>,
    /// Question-id -> the student's written answer.
    pub answers: IndexMap<String, String>,
}

/// Request body for POST /exams/source.
#[derive(Debug, Deserialize)]
pub struct SourceRequest {
    /// Public GitHub repository URL.
    pub repo_url: String,
    /// Remove comments from the fetched files.
    #[serde(default)]
    pub strip_comments: bool,
}

/// Response body for the poll-or-start endpoints.
///
/// Exactly one of the payload fields is populated once the status is
/// terminal: `questions` for done question jobs, `verdict` plus `rating`
/// for done verdict jobs, `error` for failed jobs.
#[derive(Debug, Serialize)]
pub struct JobPollResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<JobSnapshot> for JobPollResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        let mut out = Self {
            job_id: snapshot.job_id,
            status: snapshot.status,
            questions: None,
            verdict: None,
            rating: None,
            error: None,
        };
        if let Some(record) = snapshot.record {
            match record.state {
                JobState::Pending => {}
                JobState::Done(GenerationOutput::Questions(questions)) => {
                    out.questions = Some(questions);
                }
                JobState::Done(GenerationOutput::Verdict { verdict, rating }) => {
                    out.verdict = Some(verdict);
                    out.rating = Some(rating);
                }
                JobState::Error(message) => out.error = Some(message),
            }
        }
        out
    }
}

/// Response body for POST /exams/source.
#[derive(Debug, Serialize)]
pub struct SourceResponse {
    /// File-name -> source-text mapping, in repository listing order.
    pub files: IndexMap<String, String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/exams/questions
///
/// Poll-or-start question generation for a student's submitted files.
pub async fn poll_questions(
    State(state): State<AppState>,
    Json(input): Json<QuestionsRequest>,
) -> AppResult<impl IntoResponse> {
    let request = GenerationRequest::Questions {
        files: input.files,
        question_count: input.question_count.unwrap_or(DEFAULT_QUESTION_COUNT),
    };
    request.validate().map_err(AppError::Core)?;

    let snapshot = state.orchestrator.ensure_ready(input.student_id, request).await;
    Ok(Json(DataResponse {
        data: JobPollResponse::from(snapshot),
    }))
}

/// POST /api/v1/exams/verdict
///
/// Poll-or-start verdict generation for a student's written answers.
pub async fn poll_verdict(
    State(state): State<AppState>,
    Json(input): Json<VerdictRequest>,
) -> AppResult<impl IntoResponse> {
    let request = GenerationRequest::Verdict {
        code: input.code,
        questions: input.questions,
        answers: input.answers,
    };
    request.validate().map_err(AppError::Core)?;

    let snapshot = state.orchestrator.ensure_ready(input.student_id, request).await;
    Ok(Json(DataResponse {
        data: JobPollResponse::from(snapshot),
    }))
}

/// POST /api/v1/exams/source
///
/// Fetch a student's source files from a public GitHub repository. This is
/// a synchronous fetch, not a job; the caller supplies the result to
/// `/exams/questions` afterwards.
pub async fn fetch_source(
    State(state): State<AppState>,
    Json(input): Json<SourceRequest>,
) -> AppResult<impl IntoResponse> {
    let files = state
        .fetcher
        .fetch_repo(&input.repo_url, input.strip_comments)
        .await
        .map_err(|e| match e {
            FetchError::InvalidUrl(_) => AppError::BadRequest(e.to_string()),
            other => AppError::Upstream(other.to_string()),
        })?;

    Ok(Json(DataResponse {
        data: SourceResponse { files },
    }))
}
