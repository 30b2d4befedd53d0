//! Request handlers for the exam API.
//!
//! Handlers delegate to the orchestrator (generation jobs) or the GitHub
//! fetcher (source retrieval) and map errors via [`crate::error::AppError`].

pub mod exam;
