use thiserror::Error;

/// Error from a remote backend call.
///
/// The remote service reports failures per call; there is no transaction
/// to roll back on its side, which is exactly why the saga layer exists.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    #[error("invalid credentials")]
    Unauthorized,

    #[error("rate limited by the backend")]
    RateLimited,

    #[error("backend call failed: {message}")]
    Service { message: String },
}

impl BackendError {
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    #[must_use]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
        }
    }

    #[must_use]
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }
}
