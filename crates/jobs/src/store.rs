//! Capacity- and time-bounded in-memory job store.
//!
//! The store is the single source of truth for job status. It holds at most
//! `capacity` entries; once full, the least-recently-inserted entries are
//! evicted first. Every entry also carries a TTL measured from insertion:
//! an entry older than the TTL is treated as absent on read even if it has
//! not been physically removed yet.
//!
//! Expiry is checked lazily at access time; physical removal of expired
//! entries happens on the next `put`. There is no background sweep task:
//! correctness never depends on timely removal, only memory reclamation
//! does, and the capacity bound caps worst-case memory regardless.
//!
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared between request handlers and spawned workers.

use std::time::{Duration, Instant};

use chatexam_core::job::{JobRecord, JobState};
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Default maximum number of entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default entry time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A stored record plus its insertion time.
///
/// Age is measured from insertion; the worker's terminal update mutates the
/// record in place and does not refresh the clock.
struct StoredJob {
    record: JobRecord,
    inserted_at: Instant,
}

impl StoredJob {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Bounded, TTL'd mapping from job id to job record.
pub struct JobStore {
    /// Insertion-ordered map: the front entry is always the oldest insert,
    /// which gives the approximate-LRU eviction order for free.
    entries: RwLock<IndexMap<String, StoredJob>>,
    capacity: usize,
    ttl: Duration,
}

impl JobStore {
    /// Create a store with explicit bounds.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            capacity,
            ttl,
        }
    }

    /// Create a store with the default bounds (100 entries, 300 s TTL).
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Insert or overwrite a record.
    ///
    /// An overwrite re-inserts at the back of the eviction order with a
    /// fresh TTL. Expired entries are physically dropped here, then the
    /// oldest inserts are evicted until the store fits its capacity.
    pub async fn put(&self, record: JobRecord) {
        let mut entries = self.entries.write().await;

        let ttl = self.ttl;
        entries.retain(|_, stored| !stored.is_expired(ttl));

        // shift_remove keeps the map's order compact so a re-insert lands
        // at the back rather than keeping the old slot's age.
        entries.shift_remove(&record.id);
        entries.insert(
            record.id.clone(),
            StoredJob {
                record,
                inserted_at: Instant::now(),
            },
        );

        while entries.len() > self.capacity {
            if let Some((evicted_id, _)) = entries.shift_remove_index(0) {
                tracing::debug!(job_id = %evicted_id, "Evicted job record (capacity)");
            }
        }
    }

    /// Return the record for `id`, or `None` if unknown or expired.
    pub async fn get(&self, id: &str) -> Option<JobRecord> {
        let entries = self.entries.read().await;
        let stored = entries.get(id)?;
        if stored.is_expired(self.ttl) {
            return None;
        }
        Some(stored.record.clone())
    }

    /// Point-in-time copy of all live (non-expired) records, in insertion
    /// order. Used by the orchestrator's lookup scan.
    pub async fn snapshot(&self) -> Vec<JobRecord> {
        let entries = self.entries.read().await;
        entries
            .values()
            .filter(|stored| !stored.is_expired(self.ttl))
            .map(|stored| stored.record.clone())
            .collect()
    }

    /// Apply the one legal `Pending -> Done` / `Pending -> Error`
    /// transition in place.
    ///
    /// Returns `true` if the transition was applied. A terminal write
    /// against a missing (evicted) or already-terminal record is dropped
    /// with a warning -- job state never moves twice.
    pub async fn complete(&self, id: &str, state: JobState) -> bool {
        debug_assert!(state.is_terminal(), "complete() requires a terminal state");

        let mut entries = self.entries.write().await;
        let Some(stored) = entries.get_mut(id) else {
            tracing::warn!(job_id = %id, "Dropping result for evicted job");
            return false;
        };
        if stored.record.state.is_terminal() {
            tracing::warn!(job_id = %id, "Ignoring second terminal write for job");
            return false;
        }
        stored.record.state = state;
        true
    }

    /// Number of physically stored entries, including expired ones that
    /// have not been reclaimed yet.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
