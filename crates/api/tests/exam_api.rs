//! HTTP-level integration tests for the exam poll-or-start endpoints.
//!
//! A scripted generator stands in for the Gemini-backed examiner, so the
//! full request path (routing, validation, orchestrator, job store) runs
//! without network access.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, post_json, ScriptedGenerator};
use tokio::time::{sleep, Instant};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn questions_body(student_id: i64) -> serde_json::Value {
    serde_json::json!({
        "student_id": student_id,
        "files": { "main.py": "print(1)" },
    })
}

fn verdict_body(student_id: i64) -> serde_json::Value {
    serde_json::json!({
        "student_id": student_id,
        "code": "print(1)",
        "questions": { "q1": "What does print do?" },
        "answers": { "q1": "Writes to stdout" },
    })
}

/// Repeat the identical POST until the reported status leaves `pending`,
/// mirroring how a client drives the poll cycle. Panics after 2 seconds.
async fn poll_until_terminal(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let response = post_json(app.clone(), uri, body.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["data"]["status"] != "pending" {
            return json;
        }
        assert!(Instant::now() < deadline, "job never left pending");
        sleep(Duration::from_millis(5)).await;
    }
}

// ---------------------------------------------------------------------------
// Question generation
// ---------------------------------------------------------------------------

/// The poll cycle starts a job, keeps its id stable across polls, and
/// eventually reports the generated questions.
#[tokio::test]
async fn questions_poll_cycle_reaches_done() {
    let generator = Arc::new(ScriptedGenerator::questions(&[
        ("q1", "What does print do?"),
        ("q2", "Why no loop?"),
    ]));
    let app = common::build_test_app(generator);

    let response = post_json(app.clone(), "/api/v1/exams/questions", questions_body(1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;

    let job_id = first["data"]["job_id"]
        .as_str()
        .expect("response must carry a job_id")
        .to_string();
    // The worker races the read-back, so the first poll may already be done.
    let status = first["data"]["status"].as_str().unwrap();
    assert!(status == "pending" || status == "done", "got {status}");

    let json = poll_until_terminal(&app, "/api/v1/exams/questions", questions_body(1)).await;
    assert_eq!(json["data"]["status"], "done");
    assert_eq!(json["data"]["job_id"], job_id.as_str());
    assert_eq!(json["data"]["questions"]["q1"], "What does print do?");
    assert_eq!(json["data"]["questions"]["q2"], "Why no loop?");
    assert!(json["data"].get("error").is_none());
}

/// Submitting no files is rejected before any job is created.
#[tokio::test]
async fn empty_files_return_validation_error() {
    let app = common::build_test_app(Arc::new(ScriptedGenerator::questions(&[("q1", "Why?")])));

    let body = serde_json::json!({ "student_id": 1, "files": {} });
    let response = post_json(app.clone(), "/api/v1/exams/questions", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // No job was started for the student.
    let health = common::get(app, "/health").await;
    assert_eq!(body_json(health).await["jobs_cached"], 0);
}

/// Two students polling concurrently get distinct jobs.
#[tokio::test]
async fn students_get_distinct_jobs() {
    let generator = Arc::new(ScriptedGenerator::questions(&[("q1", "Why?")]));
    let app = common::build_test_app(generator);

    let first = poll_until_terminal(&app, "/api/v1/exams/questions", questions_body(1)).await;
    let second = poll_until_terminal(&app, "/api/v1/exams/questions", questions_body(2)).await;

    assert_ne!(first["data"]["job_id"], second["data"]["job_id"]);
}

// ---------------------------------------------------------------------------
// Verdict generation
// ---------------------------------------------------------------------------

/// A done verdict job reports the verdict text and the rating.
#[tokio::test]
async fn verdict_poll_cycle_reaches_done() {
    let generator = Arc::new(ScriptedGenerator::verdict("Good grasp of the code", 4));
    let app = common::build_test_app(generator);

    let json = poll_until_terminal(&app, "/api/v1/exams/verdict", verdict_body(7)).await;

    assert_eq!(json["data"]["status"], "done");
    assert_eq!(json["data"]["verdict"], "Good grasp of the code");
    assert_eq!(json["data"]["rating"], 4);
    assert!(json["data"].get("questions").is_none());
}

/// Question and verdict jobs for the same student are tracked separately.
#[tokio::test]
async fn question_and_verdict_jobs_are_separate() {
    let generator = Arc::new(ScriptedGenerator::questions(&[("q1", "Why?")]));
    let app = common::build_test_app(generator);

    let questions =
        poll_until_terminal(&app, "/api/v1/exams/questions", questions_body(1)).await;
    let verdict = poll_until_terminal(&app, "/api/v1/exams/verdict", verdict_body(1)).await;

    assert_ne!(questions["data"]["job_id"], verdict["data"]["job_id"]);
}

// ---------------------------------------------------------------------------
// Failure reporting
// ---------------------------------------------------------------------------

/// A generation failure surfaces as a terminal error record, not as an
/// HTTP error; the poll response stays 200.
#[tokio::test]
async fn generation_failure_is_reported_in_the_job() {
    let generator = Arc::new(ScriptedGenerator::failing(
        "upstream model returned invalid JSON",
    ));
    let app = common::build_test_app(generator);

    let json = poll_until_terminal(&app, "/api/v1/exams/questions", questions_body(1)).await;

    assert_eq!(json["data"]["status"], "error");
    assert_eq!(json["data"]["error"], "upstream model returned invalid JSON");
    assert!(json["data"].get("questions").is_none());
}

// ---------------------------------------------------------------------------
// Source fetching
// ---------------------------------------------------------------------------

/// A non-GitHub URL is rejected up front, before any network request.
#[tokio::test]
async fn non_github_source_url_returns_400() {
    let app = common::build_test_app(Arc::new(ScriptedGenerator::questions(&[("q1", "Why?")])));

    let body = serde_json::json!({ "repo_url": "https://example.com/user/repo" });
    let response = post_json(app, "/api/v1/exams/source", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Malformed payloads
// ---------------------------------------------------------------------------

/// A body missing required fields is rejected by extraction.
#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = common::build_test_app(Arc::new(ScriptedGenerator::questions(&[("q1", "Why?")])));

    let body = serde_json::json!({ "student_id": 1 });
    let response = post_json(app, "/api/v1/exams/questions", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
