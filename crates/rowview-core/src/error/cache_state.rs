use super::Error;

/// Error when the transformer cache observes a broken internal invariant.
///
/// This signals a defect rather than bad input, for example a transformer
/// installed under a signature other than the one it was compiled for.
/// It is never retried and never swallowed.
#[derive(Debug)]
pub(super) struct CacheStateError {
    message: Box<str>,
}

impl std::error::Error for CacheStateError {}

impl core::fmt::Display for CacheStateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cache state violated: {}", self.message)
    }
}

impl Error {
    /// Creates a cache state error.
    pub fn cache_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::CacheState(CacheStateError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a cache state error.
    pub fn is_cache_state(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::CacheState(_)))
    }
}
