//! Background generation worker.
//!
//! One spawned task per created job. The worker runs the external
//! generation call off the request path and writes exactly one terminal
//! update back into the store, under the lock scoped to its kind. It never
//! propagates an error -- nothing awaits it -- and never retries.
//!
//! There is no cancellation: once spawned, a worker runs to completion
//! even if every poller has given up. Its semaphore permit is held for the
//! full duration of the generation call.

use std::sync::Arc;

use chatexam_core::job::{Generate, GenerationRequest, JobId, JobKind, JobState};
use chatexam_core::types::DbId;
use tokio::sync::Semaphore;

use crate::orchestrator::KindLocks;
use crate::store::JobStore;

/// Everything a worker needs, captured at spawn time.
pub(crate) struct WorkerContext {
    pub job_id: JobId,
    pub kind: JobKind,
    pub student_id: DbId,
    pub request: GenerationRequest,
    pub store: Arc<JobStore>,
    pub generator: Arc<dyn Generate>,
    pub locks: Arc<KindLocks>,
    pub limiter: Arc<Semaphore>,
}

/// Spawn the worker task. The handle is not retained; nothing ever
/// awaits or aborts a worker.
pub(crate) fn spawn(ctx: WorkerContext) {
    tokio::spawn(run(ctx));
}

/// Execute one generation call and record its outcome.
async fn run(ctx: WorkerContext) {
    // Wait for a generation slot. The semaphore is never closed while the
    // orchestrator is alive, but a worker can outlive a test harness that
    // drops it; bail out quietly in that case.
    let _permit = match ctx.limiter.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            tracing::warn!(job_id = %ctx.job_id, "Generation limiter closed, abandoning job");
            return;
        }
    };

    tracing::debug!(
        job_id = %ctx.job_id,
        student_id = ctx.student_id,
        kind = ctx.kind.as_str(),
        "Generation started",
    );

    // The slow external call runs unlocked; the kind lock protects only
    // the store mutation below.
    let state = match ctx.generator.generate(&ctx.request).await {
        Ok(output) => {
            tracing::info!(job_id = %ctx.job_id, kind = ctx.kind.as_str(), "Generation succeeded");
            JobState::Done(output)
        }
        Err(error) => {
            tracing::warn!(
                job_id = %ctx.job_id,
                kind = ctx.kind.as_str(),
                error = %error,
                "Generation failed",
            );
            JobState::Error(error.to_string())
        }
    };

    let _guard = ctx.locks.for_kind(ctx.kind).lock().await;
    ctx.store.complete(&ctx.job_id, state).await;
}
