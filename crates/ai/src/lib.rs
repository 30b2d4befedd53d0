//! External collaborators for exam generation.
//!
//! - [`client::GeminiClient`] -- REST client for the Gemini
//!   `generateContent` endpoint.
//! - [`parse`] -- cleanup and JSON parsing of model output.
//! - [`github::GithubFetcher`] -- fetches a student's submitted source
//!   files from GitHub.
//! - [`examiner::Examiner`] -- composes the above into the `Generate`
//!   implementation the job orchestrator calls.

pub mod client;
pub mod examiner;
pub mod github;
pub mod parse;
