use taskdeck_backend::BackendError;
use taskdeck_saga::SagaError;
use thiserror::Error;

pub type Result<T, E = ActionError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActionError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Saga(#[from] SagaError<BackendError>),
}
