//! Compiles view descriptors into row transformers and caches them.
//!
//! A [`Descriptor`] states how the columns of a query result map into an
//! output shape. Its [`Signature`] identifies it structurally, and the
//! [`TransformerCache`] compiles each signature at most once into a
//! [`Transformer`]. The [`engine`] then applies a transformer to a row
//! source lazily, one row at a time.
//!
//! [`Views`] ties the pieces together for the common case.

mod cache;
pub use cache::{CacheBuilder, CacheConfig, CacheStats, EntryInfo, TransformerCache};

mod compiler;
pub use compiler::{Compile, Compiler, Function};

pub mod descriptor;
pub use descriptor::{Binding, Conversion, Descriptor, Model};

pub mod engine;
pub use engine::{ErrorPolicy, Mapped, MappedStream};

mod signature;
pub use signature::Signature;

mod transformer;
pub use transformer::Transformer;

mod views;
pub use views::Views;

pub use rowview_core::{bail, data, err, object, row, Columns, Error, Result, Row, RowSource};
