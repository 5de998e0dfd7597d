use thiserror::Error;
use vedaguru_core::error::StoreError;

/// Request-level failures. Provider trouble is never one of these: it
/// degrades to a fallback reply instead.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unauthorized access to conversation {0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ChatError> for vedaguru_core::Error {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Store(e) => vedaguru_core::Error::Store(e),
            other => vedaguru_core::Error::Rejected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_the_top_level_error() {
        let forbidden: vedaguru_core::Error = ChatError::Forbidden("c-1".into()).into();
        assert!(matches!(forbidden, vedaguru_core::Error::Rejected(_)));
        assert_eq!(forbidden.to_string(), "Request rejected: Unauthorized access to conversation c-1");

        let store: vedaguru_core::Error = ChatError::Store(StoreError::NotFound("c-2".into())).into();
        assert!(matches!(store, vedaguru_core::Error::Store(StoreError::NotFound(_))));
    }
}
