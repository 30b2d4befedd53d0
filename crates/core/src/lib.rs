//! ChatExam domain core.
//!
//! Pure types and functions shared by the job orchestrator, the AI
//! collaborators, and the API server. Nothing in this crate performs I/O;
//! everything is testable with plain unit tests.

pub mod error;
pub mod job;
pub mod prompt;
pub mod sourcecode;
pub mod types;
