//! Single-flight job orchestration.
//!
//! [`Orchestrator::ensure_ready`] is the sole entry point consumed by the
//! HTTP layer, called once per poll. It never blocks on generation: it
//! either adopts a live job for the `(student, kind)` key or creates a
//! Pending record and spawns a worker, then immediately reports the
//! current state back to the poller.

use std::sync::Arc;

use chatexam_core::job::{
    Generate, GenerationRequest, JobId, JobKind, JobRecord, JobState, JobStatus,
};
use chatexam_core::types::DbId;
use tokio::sync::{Mutex, Semaphore};

use crate::store::JobStore;
use crate::worker;

/// Default cap on concurrently running generation calls.
pub const DEFAULT_GENERATION_CONCURRENCY: usize = 30;

/// One mutex per job kind.
///
/// All store writes for a given kind are serialized by that kind's lock, so
/// two workers of the same kind never interleave a read-modify-write; kinds
/// never contend with each other. The orchestrator additionally holds the
/// lock across its lookup-and-create step, which closes the scan/insert
/// race and makes single-flight unconditional per kind.
pub(crate) struct KindLocks {
    questions: Mutex<()>,
    verdict: Mutex<()>,
}

impl KindLocks {
    fn new() -> Self {
        Self {
            questions: Mutex::new(()),
            verdict: Mutex::new(()),
        }
    }

    pub(crate) fn for_kind(&self, kind: JobKind) -> &Mutex<()> {
        match kind {
            JobKind::Questions => &self.questions,
            JobKind::Verdict => &self.verdict,
        }
    }
}

/// Poll-friendly result of [`Orchestrator::ensure_ready`].
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    /// The job serving this `(student, kind)` key.
    pub job_id: JobId,
    /// Current status. A record evicted between create and read-back is
    /// reported as `Pending` -- the next poll restarts generation.
    pub status: JobStatus,
    /// The record itself, if still present in the store.
    pub record: Option<JobRecord>,
}

/// Owns the job store and the generation dependency; spawns workers.
///
/// One instance per application, shared by reference into every request
/// handler. Generation failures never surface here -- workers capture them
/// into Error records, so `ensure_ready` is infallible.
pub struct Orchestrator {
    store: Arc<JobStore>,
    generator: Arc<dyn Generate>,
    locks: Arc<KindLocks>,
    /// Bounds concurrently running generation calls. Workers above the
    /// limit stay queued on the semaphore, not on the request path.
    limiter: Arc<Semaphore>,
}

impl Orchestrator {
    /// Create an orchestrator with an explicit generation concurrency cap.
    pub fn new(store: Arc<JobStore>, generator: Arc<dyn Generate>, concurrency: usize) -> Self {
        Self {
            store,
            generator,
            locks: Arc::new(KindLocks::new()),
            limiter: Arc::new(Semaphore::new(concurrency)),
        }
    }

    /// Create an orchestrator with the default concurrency cap.
    pub fn with_defaults(store: Arc<JobStore>, generator: Arc<dyn Generate>) -> Self {
        Self::new(store, generator, DEFAULT_GENERATION_CONCURRENCY)
    }

    /// Ensure a job exists for `(student_id, request.kind())` and report
    /// its current state.
    ///
    /// Lookup: a Pending or Done record for the key is adopted as-is; an
    /// Error record is never reused, so the next call after a failure
    /// starts a fresh attempt. On a miss, a Pending record is inserted and
    /// a worker is spawned -- the caller does not wait for it.
    ///
    /// The read-back happens after the create step, so the returned status
    /// may already be `Done` if the worker finished first.
    pub async fn ensure_ready(&self, student_id: DbId, request: GenerationRequest) -> JobSnapshot {
        let kind = request.kind();

        let job_id = {
            let _guard = self.locks.for_kind(kind).lock().await;

            match self.find_live(student_id, kind).await {
                Some(job_id) => job_id,
                None => self.create_job(student_id, kind, request).await,
            }
        };

        match self.store.get(&job_id).await {
            Some(record) => JobSnapshot {
                job_id,
                status: record.state.status(),
                record: Some(record),
            },
            // Evicted between create and read-back: report pending; the
            // next poll will start over.
            None => JobSnapshot {
                job_id,
                status: JobStatus::Pending,
                record: None,
            },
        }
    }

    /// Scan the store for a live (Pending or Done) record matching the key.
    async fn find_live(&self, student_id: DbId, kind: JobKind) -> Option<JobId> {
        self.store
            .snapshot()
            .await
            .into_iter()
            .find(|record| {
                record.student_id == student_id
                    && record.kind == kind
                    && record.state.status() != JobStatus::Error
            })
            .map(|record| record.id)
    }

    /// Insert a fresh Pending record and spawn its worker.
    ///
    /// Called with the kind lock held.
    async fn create_job(&self, student_id: DbId, kind: JobKind, request: GenerationRequest) -> JobId {
        let job_id: JobId = uuid::Uuid::new_v4().to_string();

        self.store
            .put(JobRecord {
                id: job_id.clone(),
                kind,
                student_id,
                state: JobState::Pending,
            })
            .await;

        tracing::info!(
            job_id = %job_id,
            student_id,
            kind = kind.as_str(),
            "Created generation job",
        );

        worker::spawn(worker::WorkerContext {
            job_id: job_id.clone(),
            kind,
            student_id,
            request,
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            locks: Arc::clone(&self.locks),
            limiter: Arc::clone(&self.limiter),
        });

        job_id
    }
}
