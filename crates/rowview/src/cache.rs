mod config;
pub use config::CacheConfig;

mod entry;
pub use entry::EntryInfo;
use entry::Entry;

mod stats;
pub use stats::CacheStats;
use stats::Counters;

use crate::{Compile, Compiler, Descriptor, Error, Result, Signature, Transformer};

use moka::{notification::RemovalCause, sync::Cache};
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, trace, warn};

/// Compiled transformers, keyed by view signature.
///
/// A signature is compiled at most once while its entry is cached. When
/// several threads ask for the same uncached signature, one of them runs
/// the compiler and the others block until it finishes, then share its
/// result. Lookups for other signatures are not held up.
///
/// Failed compilations are handed to every waiting caller but never stored;
/// the next lookup compiles again.
///
/// Transformers returned by the cache remain usable after their entry is
/// evicted, invalidated or the cache is closed.
pub struct TransformerCache<C = Compiler> {
    compiler: C,
    entries: Cache<Signature, Arc<Entry>>,
    counters: Arc<Counters>,
    name: Option<String>,
}

/// Configures and builds a [`TransformerCache`].
#[derive(Debug)]
pub struct CacheBuilder<C = Compiler> {
    compiler: C,
    name: Option<String>,
    max_capacity: u64,
    time_to_live: Option<Duration>,
    time_to_idle: Option<Duration>,
}

impl TransformerCache<Compiler> {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CacheBuilder<Compiler> {
        CacheBuilder::from(&CacheConfig::default())
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        CacheBuilder::from(config).build()
    }
}

impl Default for TransformerCache<Compiler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compile> TransformerCache<C> {
    /// Returns the transformer for `descriptor`, compiling it on first use.
    pub fn get_or_compile(&self, descriptor: &Descriptor) -> Result<Transformer> {
        let signature = descriptor.signature();
        let mut compiled = false;

        let result = self.entries.try_get_with(signature.clone(), || {
            compiled = true;
            self.compile(descriptor)
        });

        if compiled {
            Counters::incr(&self.counters.misses);
        }

        let entry = result.map_err(|e| (*e).clone())?;

        if entry.transformer.signature() != signature {
            return Err(Error::cache_state(format!(
                "entry for {signature:?} holds a transformer for {:?}",
                entry.transformer.signature()
            )));
        }

        if !compiled {
            Counters::incr(&self.counters.hits);
            trace!(view = signature.view(), %signature, "transformer cache hit");
        }

        entry.touch(!compiled);
        Ok(entry.transformer.clone())
    }

    fn compile(&self, descriptor: &Descriptor) -> Result<Arc<Entry>> {
        let signature = descriptor.signature();

        let result = self.compiler.compile(descriptor).and_then(|transformer| {
            if transformer.signature() == signature {
                Ok(transformer)
            } else {
                Err(Error::cache_state(format!(
                    "compiler returned a transformer for {:?} when asked for {signature:?}",
                    transformer.signature()
                )))
            }
        });

        match result {
            Ok(transformer) => {
                Counters::incr(&self.counters.compilations);
                debug!(cache = self.name(), view = signature.view(), %signature, "cached transformer");
                Ok(Arc::new(Entry::new(transformer)))
            }
            Err(e) => {
                Counters::incr(&self.counters.failures);
                warn!(cache = self.name(), view = signature.view(), %signature, error = %e, "view failed to compile");
                Err(e)
            }
        }
    }
}

impl<C> TransformerCache<C> {
    /// Returns the cached transformer for `signature` without compiling.
    pub fn get(&self, signature: &Signature) -> Option<Transformer> {
        let entry = self.entries.get(signature)?;
        entry.touch(true);
        Some(entry.transformer.clone())
    }

    /// Returns `true` if a transformer for `signature` is cached.
    pub fn contains(&self, signature: &Signature) -> bool {
        self.entries.contains_key(signature)
    }

    /// Returns a snapshot of the entry for `signature`.
    ///
    /// Counts as an access for the eviction policy, but not as a hit.
    pub fn entry(&self, signature: &Signature) -> Option<EntryInfo> {
        self.entries.get(signature).map(|entry| entry.info())
    }

    /// Drops the transformer for `signature`, if cached.
    ///
    /// A compilation already in flight for `signature` is not cancelled: it
    /// completes, is returned to its callers and is stored in the cache, so
    /// the next lookup is a hit on that transformer.
    pub fn invalidate(&self, signature: &Signature) {
        debug!(cache = self.name(), %signature, "invalidating transformer");
        self.entries.invalidate(signature);
    }

    /// Drops every cached transformer.
    ///
    /// As with [`invalidate`](Self::invalidate), compilations in flight
    /// complete and their transformers are stored.
    pub fn invalidate_all(&self) {
        debug!(cache = self.name(), "invalidating all transformers");
        self.entries.invalidate_all();
    }

    /// Number of cached transformers.
    ///
    /// The count trails recent writes until pending maintenance has run;
    /// [`stats`](Self::stats) runs it first.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks();
        CacheStats::load(self.entries.entry_count(), &self.counters)
    }

    /// Releases every cached transformer.
    ///
    /// Intended for host shutdown. The cache stays usable and compiles again
    /// on the next lookup.
    pub fn close(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
        debug!(cache = self.name(), stats = %self.stats(), "transformer cache closed");
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<C> fmt::Debug for TransformerCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerCache")
            .field("name", &self.name)
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

impl<C> CacheBuilder<C> {
    /// Uses `compiler` instead of the default [`Compiler`].
    pub fn compiler<D: Compile>(self, compiler: D) -> CacheBuilder<D> {
        CacheBuilder {
            compiler,
            name: self.name,
            max_capacity: self.max_capacity,
            time_to_live: self.time_to_live,
            time_to_idle: self.time_to_idle,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn time_to_live(mut self, duration: Duration) -> Self {
        self.time_to_live = Some(duration);
        self
    }

    pub fn time_to_idle(mut self, duration: Duration) -> Self {
        self.time_to_idle = Some(duration);
        self
    }

    pub fn build(self) -> TransformerCache<C>
    where
        C: Compile,
    {
        let counters = Arc::new(Counters::default());
        let listener = counters.clone();

        let mut entries = Cache::<Signature, Arc<Entry>>::builder()
            .max_capacity(self.max_capacity)
            .eviction_listener(move |signature: Arc<Signature>, _, cause: RemovalCause| {
                if cause.was_evicted() {
                    Counters::incr(&listener.evictions);
                    debug!(%signature, ?cause, "evicted transformer");
                }
            });

        if let Some(name) = &self.name {
            entries = entries.name(name);
        }

        if let Some(duration) = self.time_to_live {
            entries = entries.time_to_live(duration);
        }

        if let Some(duration) = self.time_to_idle {
            entries = entries.time_to_idle(duration);
        }

        TransformerCache {
            compiler: self.compiler,
            entries: entries.build(),
            counters,
            name: self.name,
        }
    }
}

impl From<&CacheConfig> for CacheBuilder<Compiler> {
    fn from(config: &CacheConfig) -> Self {
        CacheBuilder {
            compiler: Compiler::new(),
            name: config.name.clone(),
            max_capacity: config.max_capacity,
            time_to_live: config.time_to_live(),
            time_to_idle: config.time_to_idle(),
        }
    }
}
