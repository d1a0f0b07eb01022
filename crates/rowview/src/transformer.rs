use crate::{data::Value, Result, Row, Signature};

use std::{fmt, sync::Arc};

pub(crate) type Func = Box<dyn Fn(&Row) -> Result<Value> + Send + Sync>;

/// A compiled view: converts one row into one output value.
///
/// Transformers are immutable and cheap to clone; clones share the compiled
/// code. A transformer stays valid after its cache entry is evicted or
/// invalidated.
#[derive(Clone)]
pub struct Transformer {
    inner: Arc<Inner>,
}

struct Inner {
    signature: Signature,
    func: Func,
}

impl Transformer {
    /// Wraps a row function as the transformer for `signature`.
    ///
    /// This is the building block for custom [`Compile`](crate::Compile)
    /// implementations.
    pub fn from_fn<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(&Row) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(signature, Box::new(func))
    }

    pub(crate) fn new(signature: Signature, func: Func) -> Self {
        Self {
            inner: Arc::new(Inner { signature, func }),
        }
    }

    /// The signature of the view this transformer was compiled from.
    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Name of the output model.
    pub fn view(&self) -> &str {
        self.inner.signature.view()
    }

    /// Maps a single row.
    pub fn apply(&self, row: &Row) -> Result<Value> {
        (self.inner.func)(row)
    }

    /// Returns `true` if both handles share the same compiled code.
    pub fn ptr_eq(&self, other: &Transformer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}
