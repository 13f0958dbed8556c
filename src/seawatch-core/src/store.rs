use std::sync::Arc;

use im::OrdMap;
use tokio::sync::watch;
use tracing::trace;

use crate::{Mmsi, VesselRecord};

/// An immutable view of every tracked vessel. Cloning is cheap and shares storage with the
/// store it came from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    version: u64,
    vessels: OrdMap<Mmsi, Arc<VesselRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Inserted,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub inserted: u32,
    pub updated: u32,
    pub unchanged: u32,
}

/// Keyed vessel collection that only publishes a new [Snapshot] when a commit changes the
/// position, speed or navigational status of a vessel, or adds a new one.
#[derive(Debug)]
pub struct VesselStore {
    current: Snapshot,
    publisher: watch::Sender<Snapshot>,
}

impl Snapshot {
    /// Monotonically increasing, bumped once per published change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    pub fn get(&self, mmsi: &Mmsi) -> Option<&Arc<VesselRecord>> {
        self.vessels.get(mmsi)
    }

    pub fn vessels(&self) -> impl Iterator<Item = &Arc<VesselRecord>> {
        self.vessels.values()
    }

    /// Vessels whose name or MMSI contains `query`, ignoring case. A blank query matches
    /// nothing.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Arc<VesselRecord>> {
        let query = query.trim().to_lowercase();
        self.vessels.values().filter(move |v| {
            !query.is_empty()
                && (v.display_name().to_lowercase().contains(&query)
                    || v.mmsi.to_string().contains(&query))
        })
    }

    /// Returns true if both snapshots are backed by the very same collection.
    pub fn shares_storage_with(&self, other: &Snapshot) -> bool {
        self.version == other.version && self.vessels.ptr_eq(&other.vessels)
    }
}

impl CommitOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, CommitOutcome::Unchanged)
    }
}

impl CommitSummary {
    pub fn changed(&self) -> bool {
        self.inserted + self.updated > 0
    }

    fn add(&mut self, outcome: CommitOutcome) {
        match outcome {
            CommitOutcome::Inserted => self.inserted += 1,
            CommitOutcome::Updated => self.updated += 1,
            CommitOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

impl Default for VesselStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VesselStore {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(Snapshot::default());
        Self {
            current: Snapshot::default(),
            publisher,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    pub fn commit(&mut self, record: VesselRecord) -> CommitOutcome {
        let mut vessels = self.current.vessels.clone();
        let outcome = stage(&mut vessels, record);
        if outcome.is_change() {
            self.publish(vessels);
        }
        outcome
    }

    /// Commits a batch of records, publishing at most one new snapshot for the whole batch.
    pub fn commit_all(&mut self, records: impl IntoIterator<Item = VesselRecord>) -> CommitSummary {
        let mut vessels = self.current.vessels.clone();
        let mut summary = CommitSummary::default();
        for record in records {
            summary.add(stage(&mut vessels, record));
        }
        if summary.changed() {
            self.publish(vessels);
        }
        summary
    }

    fn publish(&mut self, vessels: OrdMap<Mmsi, Arc<VesselRecord>>) {
        self.current = Snapshot {
            version: self.current.version + 1,
            vessels,
        };
        trace!(
            version = self.current.version,
            vessels = self.current.len(),
            "published vessel snapshot"
        );
        self.publisher.send_replace(self.current.clone());
    }
}

fn stage(vessels: &mut OrdMap<Mmsi, Arc<VesselRecord>>, record: VesselRecord) -> CommitOutcome {
    let outcome = match vessels.get(&record.mmsi) {
        None => CommitOutcome::Inserted,
        Some(existing) if existing.has_same_tracked_state(&record) => {
            return CommitOutcome::Unchanged;
        }
        Some(_) => CommitOutcome::Updated,
    };
    vessels.insert(record.mmsi, Arc::new(record));
    outcome
}
