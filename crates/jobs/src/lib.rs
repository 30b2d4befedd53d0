//! Asynchronous generation job orchestration.
//!
//! This crate turns the slow, fallible AI generation call into a
//! fire-and-forget background job with poll-for-result semantics:
//!
//! - [`store::JobStore`] -- the capacity- and time-bounded in-memory map
//!   that is the single source of truth for job status.
//! - [`orchestrator::Orchestrator`] -- the sole entry point for the HTTP
//!   layer; single-flight lookup, worker spawning, poll-friendly results.
//! - `worker` -- the spawned task that runs one generation call and writes
//!   exactly one terminal update back into the store.

pub mod orchestrator;
pub mod store;

mod worker;
