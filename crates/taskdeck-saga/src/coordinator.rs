use std::fmt::Debug;

use futures::FutureExt;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::builder::CoordinatorBuilder;
use crate::error::{CompensationError, SagaError};
use crate::ledger::{Compensation, RollbackLedger};
use crate::step::{SagaStep, StepFailure};

/// Order in which recorded compensations execute during rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompensationOrder {
    /// Start every remaining compensation at once and await them together.
    /// No ordering guarantee between them, only that all are attempted.
    #[default]
    Concurrent,
    /// Await each compensation before starting the next, in the order the
    /// steps completed. A failed compensation does not halt the sequence.
    Sequential,
}

pub(crate) type FailureObserver<E> = Box<dyn Fn(&StepFailure<'_, E>) + Send + Sync>;

struct CapturedFailure<E> {
    step: &'static str,
    error: E,
}

/// Coordinates one saga: a sequence of independently-committing steps with
/// automatic rollback on failure.
///
/// Construct one `Coordinator` per multi-step action invocation, run the
/// steps in dependency order, and call [`Coordinator::finish`] before
/// returning so the enclosing action surfaces the saga's error through its
/// normal error-handling path.
///
/// Forward steps execute strictly in the order they are run; the only true
/// concurrency is [`CompensationOrder::Concurrent`]-mode rollback. Rollback
/// of a failed saga completes before the failing [`Coordinator::run`] call
/// returns, so a recorded failure is never observable without its rollback
/// having been attempted.
pub struct Coordinator<Ctx: 'static, E: 'static> {
    ledger: RollbackLedger<Ctx, E>,
    failure: Option<CapturedFailure<E>>,
    order: CompensationOrder,
    on_failure: Option<FailureObserver<E>>,
    audit: SagaAuditLog,
    compensation_failures: Vec<CompensationError<E>>,
}

impl<Ctx, E> Coordinator<Ctx, E>
where
    Ctx: Send + Sync + 'static,
    E: Debug + Send + 'static,
{
    /// Create a coordinator with the default configuration: concurrent
    /// compensation, no failure observer.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(CompensationOrder::default(), None)
    }

    /// Create a builder for configuring compensation order and the
    /// coordinator-level failure observer.
    #[must_use]
    pub fn builder() -> CoordinatorBuilder<Ctx, E> {
        CoordinatorBuilder::new()
    }

    pub(crate) fn from_parts(
        order: CompensationOrder,
        on_failure: Option<FailureObserver<E>>,
    ) -> Self {
        Self {
            ledger: RollbackLedger::new(),
            failure: None,
            order,
            on_failure,
            audit: SagaAuditLog::new(),
            compensation_failures: Vec::new(),
        }
    }

    /// Run one step of the saga.
    ///
    /// Returns the forward action's result on success. Returns `None` both
    /// when this step fails (after rolling back every previously completed
    /// step) and when an earlier step has already failed (in which case
    /// the forward action is never called). The captured error travels
    /// through [`Coordinator::failure`] and [`Coordinator::finish`], never
    /// through the return channel, so call sites may treat a missing
    /// result as tolerable where a partial outcome makes sense.
    pub async fn run<S>(&mut self, ctx: &Ctx, step: S, args: S::Args) -> Option<S::Output>
    where
        S: SagaStep<Context = Ctx, Error = E> + 'static,
    {
        let name = step.name();

        if self.failure.is_some() {
            debug!(step = name, "saga already failed, skipping step");
            self.audit.record_skipped(name);
            return None;
        }

        self.audit.record_start(name);

        match step.forward(ctx, args).await {
            Ok(output) => {
                self.audit.record_success();
                let result = output.clone();
                self.ledger.record(
                    name,
                    Box::new(move |ctx| {
                        async move { step.compensate(ctx, output).await }.boxed()
                    }),
                );
                Some(result)
            }
            Err(error) => {
                warn!(step = name, error = ?error, "saga step failed, rolling back");
                self.audit.record_failure();

                step.on_error(&StepFailure {
                    step: name,
                    error: &error,
                });
                if let Some(observer) = &self.on_failure {
                    observer(&StepFailure {
                        step: name,
                        error: &error,
                    });
                }

                // First writer wins. There is at most one writer because
                // forward steps never run concurrently with each other.
                self.failure = Some(CapturedFailure { step: name, error });
                self.rollback(ctx, name).await;
                None
            }
        }
    }

    async fn rollback(&mut self, ctx: &Ctx, failed_step: &'static str) {
        let pending = self.ledger.drain_excluding(failed_step);
        if pending.is_empty() {
            debug!(step = failed_step, "nothing to roll back");
            return;
        }
        debug!(
            step = failed_step,
            count = pending.len(),
            order = ?self.order,
            "compensating completed steps"
        );

        let results: Vec<(&'static str, Result<(), E>)> = match self.order {
            CompensationOrder::Concurrent => {
                join_all(pending.into_iter().map(|entry| {
                    let Compensation { step, run } = entry;
                    async move { (step, run(ctx).await) }
                }))
                .await
            }
            CompensationOrder::Sequential => {
                let mut results = Vec::with_capacity(pending.len());
                for entry in pending {
                    let Compensation { step, run } = entry;
                    results.push((step, run(ctx).await));
                }
                results
            }
        };

        for (step, result) in results {
            match result {
                Ok(()) => self.audit.record_compensated(step),
                Err(error) => {
                    warn!(step, error = ?error, "compensation failed, continuing rollback");
                    self.audit.record_compensation_failed(step);
                    self.compensation_failures.push(CompensationError {
                        step: step.to_string(),
                        error,
                    });
                }
            }
        }
    }

    /// The captured error, if any step has failed.
    ///
    /// Usable mid-saga, e.g. to branch on whether an earlier optional step
    /// failed.
    #[must_use]
    pub fn failure(&self) -> Option<&E> {
        self.failure.as_ref().map(|failure| &failure.error)
    }

    /// Name of the step that failed, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&str> {
        self.failure.as_ref().map(|failure| failure.step)
    }

    /// Names of the steps whose compensations are currently recorded, in
    /// completion order.
    pub fn completed_steps(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ledger.names()
    }

    /// The audit log of every step run so far.
    #[must_use]
    pub fn audit(&self) -> &SagaAuditLog {
        &self.audit
    }

    /// Errors from compensations that failed during rollback.
    ///
    /// These never replace the saga's original failure; they are collected
    /// here (and logged) so callers can observe an incomplete rollback.
    #[must_use]
    pub fn compensation_failures(&self) -> &[CompensationError<E>] {
        &self.compensation_failures
    }

    /// Surface the saga's outcome.
    ///
    /// The single call at the end of a saga's step sequence: a no-op for a
    /// fully successful saga, otherwise the exact captured error is
    /// returned wrapped in [`SagaError::StepFailed`].
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` carrying the failing step's name
    /// and the error its forward action produced.
    pub fn finish(self) -> Result<(), SagaError<E>> {
        match self.failure {
            None => Ok(()),
            Some(CapturedFailure { step, error }) => Err(SagaError::StepFailed {
                step: step.to_string(),
                source: error,
            }),
        }
    }
}

impl<Ctx, E> Default for Coordinator<Ctx, E>
where
    Ctx: Send + Sync + 'static,
    E: Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
