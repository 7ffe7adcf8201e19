//! Compensating-transaction coordinator for multi-step backend operations.
//!
//! This crate provides infrastructure for running an ordered sequence of
//! independent, non-transactional side effects against a remote service,
//! with automatic rollback of the already-completed steps when a later
//! step fails. Each successful step records a compensation built from its
//! result; the first failure short-circuits the remaining steps and
//! replays the recorded compensations.

mod audit;
mod builder;
mod coordinator;
mod error;
mod ledger;
mod step;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::CoordinatorBuilder;
pub use coordinator::{CompensationOrder, Coordinator};
pub use error::{CompensationError, SagaError};
pub use step::{SagaStep, StepFailure};
