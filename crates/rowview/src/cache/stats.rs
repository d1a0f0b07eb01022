use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Counters shared between the cache and its eviction listener.
#[derive(Debug, Default)]
pub(super) struct Counters {
    pub(super) hits: AtomicU64,
    pub(super) misses: AtomicU64,
    pub(super) compilations: AtomicU64,
    pub(super) failures: AtomicU64,
    pub(super) evictions: AtomicU64,
}

impl Counters {
    pub(super) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Cache statistics, as returned by
/// [`TransformerCache::stats`](crate::TransformerCache::stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Transformers currently stored
    pub entries: u64,

    /// Successful lookups answered from a stored or in-flight compilation
    pub hits: u64,

    /// Lookups that ran the compiler, whether or not it succeeded
    pub misses: u64,

    /// Successful compilations
    pub compilations: u64,

    /// Failed compilations
    pub failures: u64,

    /// Entries dropped for size or expiry; explicit invalidation is not counted
    pub evictions: u64,
}

impl CacheStats {
    pub(super) fn load(entries: u64, counters: &Counters) -> Self {
        Self {
            entries,
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            compilations: counters.compilations.load(Ordering::Relaxed),
            failures: counters.failures.load(Ordering::Relaxed),
            evictions: counters.evictions.load(Ordering::Relaxed),
        }
    }

    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Share of lookups that did not compile, between 0 and 1.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries={} hits={} misses={} compilations={} failures={} evictions={} hit_rate={:.1}%",
            self.entries,
            self.hits,
            self.misses,
            self.compilations,
            self.failures,
            self.evictions,
            self.hit_rate() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_without_lookups() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn display() {
        let stats = CacheStats {
            entries: 2,
            hits: 3,
            misses: 1,
            compilations: 1,
            failures: 0,
            evictions: 0,
        };

        assert_eq!(
            stats.to_string(),
            "entries=2 hits=3 misses=1 compilations=1 failures=0 evictions=0 hit_rate=75.0%"
        );
    }
}
