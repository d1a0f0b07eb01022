use crate::{
    engine, CacheConfig, CacheStats, Compile, Compiler, Descriptor, ErrorPolicy, Mapped,
    MappedStream, Result, Row, RowSource, Transformer, TransformerCache,
};

use std::sync::Arc;
use tokio_stream::Stream;

/// Compiles views on demand and maps rows through them.
///
/// `Views` pairs a [`TransformerCache`] with the [`ErrorPolicy`] used for
/// every query. Clones share the cache, so one instance can be handed to
/// each request handler of a host.
///
/// ```
/// use rowview::{data::Type, row, Binding, Conversion, Descriptor, Model, Views};
///
/// let user = Descriptor::builder("User")
///     .column("name", Type::String)
///     .column("age", Type::String)
///     .model(
///         Model::new("User")
///             .field(Binding::column("fullName", "name", Type::String))
///             .field(Binding::column("age", "age", Type::I64).convert(Conversion::Parse)),
///     )
///     .build();
///
/// let rows = row::from_rows([user.columns().row(vec!["Ann".into(), "30".into()])]);
///
/// let views = Views::new();
/// let users = views.query(&user, rows)?.collect_all()?;
///
/// assert_eq!(users, [rowview::object! { "fullName" => "Ann", "age" => 30_i64 }]);
/// # Ok::<(), rowview::Error>(())
/// ```
#[derive(Debug)]
pub struct Views<C = Compiler> {
    cache: Arc<TransformerCache<C>>,
    policy: ErrorPolicy,
}

impl Views<Compiler> {
    pub fn new() -> Self {
        Self::with_cache(TransformerCache::new())
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_cache(TransformerCache::from_config(config))
    }
}

impl Default for Views<Compiler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compile> Views<C> {
    pub fn with_cache(cache: impl Into<Arc<TransformerCache<C>>>) -> Self {
        Self {
            cache: cache.into(),
            policy: ErrorPolicy::default(),
        }
    }

    /// Sets the error policy for queries started from this handle.
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the compiled transformer for `descriptor`.
    pub fn transformer(&self, descriptor: &Descriptor) -> Result<Transformer> {
        self.cache.get_or_compile(descriptor)
    }

    /// Maps `rows` through the view described by `descriptor`.
    ///
    /// Compilation errors are returned here, before any row is read.
    pub fn query<R: RowSource>(&self, descriptor: &Descriptor, rows: R) -> Result<Mapped<R>> {
        let transformer = self.cache.get_or_compile(descriptor)?;
        Ok(engine::map_with(rows, &transformer, self.policy))
    }

    pub fn query_stream<S>(&self, descriptor: &Descriptor, rows: S) -> Result<MappedStream>
    where
        S: Stream<Item = Result<Row>> + Send + 'static,
    {
        let transformer = self.cache.get_or_compile(descriptor)?;
        Ok(engine::map_stream_with(rows, &transformer, self.policy))
    }

    pub fn invalidate(&self, descriptor: &Descriptor) {
        self.cache.invalidate(descriptor.signature());
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<C> Views<C> {
    pub fn cache(&self) -> &TransformerCache<C> {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Releases every cached transformer. See [`TransformerCache::close`].
    pub fn close(&self) {
        self.cache.close();
    }
}

impl<C> Clone for Views<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            policy: self.policy,
        }
    }
}
