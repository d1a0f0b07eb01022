use super::ErrorPolicy;
use crate::{data::Value, Result, Row, Transformer};

use std::{
    fmt,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

type DynStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send + 'static>>;

/// The lazily mapped output of an asynchronous row stream.
///
/// Follows the same ordering, numbering and error policy rules as
/// [`Mapped`](super::Mapped).
pub struct MappedStream {
    stream: DynStream,
    skipped: Arc<AtomicU64>,
}

impl MappedStream {
    pub(super) fn new<S>(rows: S, transformer: Transformer, policy: ErrorPolicy) -> Self
    where
        S: Stream<Item = Result<Row>> + Send + 'static,
    {
        let skipped = Arc::new(AtomicU64::new(0));
        let counter = skipped.clone();

        let stream = async_stream::stream! {
            let mut rows = Box::pin(rows);
            let mut ordinal = 0_u64;

            while let Some(res) = rows.next().await {
                let row = match res {
                    Ok(row) => row,
                    Err(e) => {
                        yield Err(super::source_error(e, &transformer));
                        break;
                    }
                };

                let current = ordinal;
                ordinal += 1;

                match transformer.apply(&row) {
                    Ok(value) => yield Ok(value),
                    Err(e) => {
                        let e = super::row_error(e, current, &transformer);

                        match policy {
                            ErrorPolicy::Abort => {
                                yield Err(e);
                                break;
                            }
                            ErrorPolicy::Skip => {
                                super::log_skipped(&e, current, &transformer);
                                counter.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                }
            }
        };

        Self {
            stream: Box::pin(stream),
            skipped,
        }
    }

    /// Returns the next output value.
    pub async fn next(&mut self) -> Option<Result<Value>> {
        StreamExt::next(self).await
    }

    /// Collects every output value, returning the first error yielded.
    pub async fn collect(mut self) -> Result<Vec<Value>> {
        let mut ret = vec![];

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }

    /// Number of failing rows passed over under [`ErrorPolicy::Skip`].
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

impl Stream for MappedStream {
    type Item = Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for MappedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedStream")
            .field("skipped", &self.skipped())
            .finish_non_exhaustive()
    }
}
