use super::Error;

/// Error reported by a row source, typically I/O against the database.
#[derive(Debug)]
pub(super) struct RowSourceError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for RowSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for RowSourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("row source failed: ")?;
        core::fmt::Display::fmt(&self.inner, f)
    }
}

impl Error {
    /// Creates an error from a row source failure.
    ///
    /// Row sources use this to signal I/O failure, which is always distinct
    /// from end-of-data.
    pub fn row_source(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::RowSource(RowSourceError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, came from a row source.
    pub fn is_row_source(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::RowSource(_)))
    }
}
