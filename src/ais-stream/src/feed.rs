use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use seawatch_core::{
    Bounds, CommitOutcome, NormalizeError, Snapshot, VesselRecord, VesselStore, normalize,
};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Consumes raw payloads received on a stream, in arrival order.
pub trait MessageSink: Send + 'static {
    fn handle(&mut self, payload: &str);
}

/// Client side restriction of which vessels a stream keeps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VesselFilter {
    pub bounds: Option<Bounds>,
    /// Case insensitive substring of the reported destination.
    pub destination: Option<String>,
}

/// Normalizes payloads, applies the stream filter and commits the result to the stream's
/// own vessel store.
pub struct VesselFeed {
    stream: String,
    store: VesselStore,
    filter: Option<VesselFilter>,
    stats: Arc<FeedCounters>,
}

#[derive(Debug, Default)]
struct FeedCounters {
    received: AtomicU64,
    malformed: AtomicU64,
    rejected: AtomicU64,
    filtered: AtomicU64,
    changed: AtomicU64,
    unchanged: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub received: u64,
    pub malformed: u64,
    pub rejected: u64,
    pub filtered: u64,
    pub changed: u64,
    pub unchanged: u64,
}

/// Read side of a [VesselFeed]'s counters, usable after the feed moved into a driver task.
#[derive(Debug, Clone)]
pub struct FeedStatsHandle(Arc<FeedCounters>);

impl VesselFilter {
    pub fn matches(&self, vessel: &VesselRecord) -> bool {
        self.bounds.is_none_or(|b| b.contains(vessel.position()))
            && self.destination.as_deref().is_none_or(|wanted| {
                vessel
                    .destination
                    .as_deref()
                    .is_some_and(|d| d.to_uppercase().contains(&wanted.to_uppercase()))
            })
    }
}

impl VesselFeed {
    pub fn new(stream: impl Into<String>, filter: Option<VesselFilter>) -> Self {
        Self {
            stream: stream.into(),
            store: VesselStore::new(),
            filter,
            stats: Arc::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.store.snapshot()
    }

    pub fn stats(&self) -> FeedStatsHandle {
        FeedStatsHandle(self.stats.clone())
    }
}

impl MessageSink for VesselFeed {
    fn handle(&mut self, payload: &str) {
        let stats = &self.stats;
        stats.received.fetch_add(1, Ordering::Relaxed);

        let record = match normalize(payload) {
            Ok(record) => record,
            Err(e @ (NormalizeError::MalformedJson { .. } | NormalizeError::NotAnObject { .. })) => {
                stats.malformed.fetch_add(1, Ordering::Relaxed);
                warn!(stream = %self.stream, "dropping malformed payload: {e}");
                return;
            }
            Err(e) => {
                stats.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(stream = %self.stream, "rejected vessel record: {e}");
                return;
            }
        };

        if let Some(filter) = &self.filter {
            if !filter.matches(&record) {
                stats.filtered.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }

        match self.store.commit(record) {
            CommitOutcome::Inserted | CommitOutcome::Updated => {
                stats.changed.fetch_add(1, Ordering::Relaxed)
            }
            CommitOutcome::Unchanged => stats.unchanged.fetch_add(1, Ordering::Relaxed),
        };
    }
}

impl FeedStatsHandle {
    pub fn get(&self) -> FeedStats {
        let c = &self.0;
        FeedStats {
            received: c.received.load(Ordering::Relaxed),
            malformed: c.malformed.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
            filtered: c.filtered.load(Ordering::Relaxed),
            changed: c.changed.load(Ordering::Relaxed),
            unchanged: c.unchanged.load(Ordering::Relaxed),
        }
    }
}
