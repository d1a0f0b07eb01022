use super::Error;

/// Error when a row carries null for a field declared non-nullable.
#[derive(Debug)]
pub(super) struct UnexpectedNullError {
    field: Box<str>,
}

impl std::error::Error for UnexpectedNullError {}

impl core::fmt::Display for UnexpectedNullError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "null value for non-nullable field `{}`", self.field)
    }
}

impl Error {
    /// Creates an unexpected null error for the given output field path.
    pub fn unexpected_null(field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnexpectedNull(UnexpectedNullError {
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an unexpected null.
    pub fn is_unexpected_null(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnexpectedNull(_)))
    }
}
