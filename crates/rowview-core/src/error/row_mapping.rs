use super::Error;

/// Error when a single row fails to map at apply time.
///
/// The row's ordinal is recorded here; the reason (conversion failure,
/// unexpected null, ...) is the wrapped cause.
#[derive(Debug)]
pub(super) struct RowMappingError {
    ordinal: u64,
}

impl std::error::Error for RowMappingError {}

impl core::fmt::Display for RowMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "row {} could not be mapped", self.ordinal)
    }
}

impl Error {
    /// Creates a row mapping error for the row at `ordinal` (0-based).
    ///
    /// Usually attached to the underlying failure with [`Error::context`].
    pub fn row_mapping(ordinal: u64) -> Error {
        Error::from(super::ErrorKind::RowMapping(RowMappingError { ordinal }))
    }

    /// Returns `true` if this error, or any error it wraps, is a row mapping error.
    pub fn is_row_mapping(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::RowMapping(_)))
    }

    /// Returns the ordinal of the row that failed to map, if any.
    pub fn row_ordinal(&self) -> Option<u64> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::RowMapping(err) => Some(err.ordinal),
            _ => None,
        })
    }
}
