//! Applies transformers to row sources.
//!
//! Mapping is lazy: a row is pulled from the source only when the next
//! output value is requested, and the output preserves source order. Each
//! row is numbered by its 0-based position in the source, and a row that
//! fails to map is reported with that ordinal.
//!
//! What happens after a failing row is set by the [`ErrorPolicy`]. The
//! default aborts: the error is yielded and the sequence ends, so a caller
//! never mistakes a partial result for a complete one. A failure of the
//! row source itself always ends the sequence.

mod mapped;
pub use mapped::Mapped;

mod stream;
pub use stream::MappedStream;

use crate::{err, Error, Result, Row, RowSource, Transformer};

use tokio_stream::Stream;
use tracing::warn;

/// What the engine does when a row fails to map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Yield the error and end the sequence.
    #[default]
    Abort,

    /// Log the failing row, count it and continue with the next row.
    Skip,
}

/// Maps `rows` with `transformer`, aborting at the first failing row.
pub fn map<R: RowSource>(rows: R, transformer: &Transformer) -> Mapped<R> {
    map_with(rows, transformer, ErrorPolicy::default())
}

pub fn map_with<R: RowSource>(rows: R, transformer: &Transformer, policy: ErrorPolicy) -> Mapped<R> {
    Mapped::new(rows, transformer.clone(), policy)
}

/// Maps an asynchronous row stream, aborting at the first failing row.
pub fn map_stream<S>(rows: S, transformer: &Transformer) -> MappedStream
where
    S: Stream<Item = Result<Row>> + Send + 'static,
{
    map_stream_with(rows, transformer, ErrorPolicy::default())
}

pub fn map_stream_with<S>(rows: S, transformer: &Transformer, policy: ErrorPolicy) -> MappedStream
where
    S: Stream<Item = Result<Row>> + Send + 'static,
{
    MappedStream::new(rows, transformer.clone(), policy)
}

/// Attaches the row ordinal and the view to a transformer failure.
fn row_error(cause: Error, ordinal: u64, transformer: &Transformer) -> Error {
    cause
        .context(Error::row_mapping(ordinal))
        .context(view_context(transformer))
}

fn source_error(cause: Error, transformer: &Transformer) -> Error {
    let cause = if cause.is_row_source() {
        cause
    } else {
        Error::row_source(cause)
    };

    cause.context(view_context(transformer))
}

fn view_context(transformer: &Transformer) -> Error {
    err!("view `{}` [{}]", transformer.view(), transformer.signature())
}

fn log_skipped(error: &Error, ordinal: u64, transformer: &Transformer) {
    warn!(
        view = transformer.view(),
        signature = %transformer.signature(),
        ordinal,
        %error,
        "skipping row that failed to map"
    );
}
