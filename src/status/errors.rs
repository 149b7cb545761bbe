//! Status query errors

use thiserror::Error;

use crate::node::LockPoisoned;

/// Failure of a status query.
///
/// A status query has no recoverable failure modes; the only way it can fail
/// is a lock poisoned by a panicking writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error(transparent)]
    LockPoisoned(#[from] LockPoisoned),
}

/// Result type for status queries
pub type StatusResult<T> = Result<T, StatusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_poisoned_message() {
        let err: StatusError = LockPoisoned("vclock").into();
        assert_eq!(err.to_string(), "vclock lock poisoned");
    }
}
