//! Interface boundary to the remote backend-as-a-service.
//!
//! Defines the resource types, typed identifiers, error taxonomy, and one
//! provider trait per resource family. Callers treat every operation as an
//! opaque fallible remote call; the coordinator layer composes them
//! without knowing their semantics beyond "can succeed with a value" and
//! "can reject".

mod error;
mod ids;
pub mod provider;
mod types;

#[cfg(any(test, feature = "testing"))]
mod memory;

pub use error::BackendError;
pub use ids::{AccountId, FileId, RowId, SessionId, TeamId};
pub use types::{Account, Row, Session, StoredFile, Team};

#[cfg(any(test, feature = "testing"))]
pub use memory::InMemoryBackend;
