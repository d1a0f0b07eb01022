use crate::{Signature, Transformer};

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// A cached transformer and its usage metadata.
#[derive(Debug)]
pub(super) struct Entry {
    pub(super) transformer: Transformer,
    inserted_at: Instant,
    /// Nanoseconds after `inserted_at`
    last_access: AtomicU64,
    hits: AtomicU64,
}

/// A point-in-time view of one cache entry.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    pub signature: Signature,

    /// When the transformer was compiled and stored
    pub inserted_at: Instant,

    /// The most recent read of the entry
    pub last_access: Instant,

    /// Reads served from the entry, not counting the one that compiled it
    pub hits: u64,
}

impl Entry {
    pub(super) fn new(transformer: Transformer) -> Self {
        Self {
            transformer,
            inserted_at: Instant::now(),
            last_access: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    pub(super) fn touch(&self, hit: bool) {
        let nanos = u64::try_from(self.inserted_at.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.last_access.fetch_max(nanos, Ordering::Relaxed);

        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn info(&self) -> EntryInfo {
        EntryInfo {
            signature: self.transformer.signature().clone(),
            inserted_at: self.inserted_at,
            last_access: self.inserted_at
                + Duration::from_nanos(self.last_access.load(Ordering::Relaxed)),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }
}
