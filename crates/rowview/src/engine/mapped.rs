use super::ErrorPolicy;
use crate::{data::Value, Result, RowSource, Transformer};

use std::{fmt, iter::FusedIterator};

/// The lazily mapped output of a row source.
///
/// Returned by [`map`](super::map) and [`map_with`](super::map_with).
pub struct Mapped<R> {
    rows: R,
    transformer: Transformer,
    policy: ErrorPolicy,

    /// Ordinal of the next row pulled from the source
    ordinal: u64,
    skipped: u64,
    done: bool,
}

impl<R: RowSource> Mapped<R> {
    pub(super) fn new(rows: R, transformer: Transformer, policy: ErrorPolicy) -> Self {
        Self {
            rows,
            transformer,
            policy,
            ordinal: 0,
            skipped: 0,
            done: false,
        }
    }

    /// Replaces the error policy for the rows not yet mapped.
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Number of rows pulled from the source so far.
    pub fn rows_read(&self) -> u64 {
        self.ordinal
    }

    /// Number of failing rows passed over under [`ErrorPolicy::Skip`].
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Collects every output value, returning the first error yielded.
    pub fn collect_all(self) -> Result<Vec<Value>> {
        self.collect()
    }
}

impl<R: RowSource> Iterator for Mapped<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let row = match self.rows.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(super::source_error(e, &self.transformer)));
                }
            };

            let ordinal = self.ordinal;
            self.ordinal += 1;

            match self.transformer.apply(&row) {
                Ok(value) => return Some(Ok(value)),
                Err(e) => {
                    let e = super::row_error(e, ordinal, &self.transformer);

                    match self.policy {
                        ErrorPolicy::Abort => {
                            self.done = true;
                            return Some(Err(e));
                        }
                        ErrorPolicy::Skip => {
                            super::log_skipped(&e, ordinal, &self.transformer);
                            self.skipped += 1;
                        }
                    }
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            // Any row may end or shorten the sequence.
            (0, self.rows.size_hint().1)
        }
    }
}

impl<R: RowSource> FusedIterator for Mapped<R> {}

impl<R> fmt::Debug for Mapped<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapped")
            .field("transformer", &self.transformer)
            .field("policy", &self.policy)
            .field("ordinal", &self.ordinal)
            .field("skipped", &self.skipped)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
