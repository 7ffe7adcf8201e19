use async_trait::async_trait;

/// A step in a saga that can be executed and compensated.
///
/// Each step wraps one fallible unit of remote work together with the
/// action that reverses it. The compensation receives the forward action's
/// successful result, so it can undo exactly what was created.
///
/// # Type Parameters (associated)
///
/// - `Args`: Step-specific input supplied by the caller at invocation
/// - `Output`: Result of the forward action, returned to the caller and
///   stored for compensation
/// - `Context`: Shared dependencies (injected, not passed between steps)
/// - `Error`: The error type for step failures
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Step-specific input supplied at invocation.
    type Args: Send + 'static;

    /// Result of the forward action. Cloned once on success: one copy goes
    /// back to the caller, the other feeds the recorded compensation.
    type Output: Clone + Send + Sync + 'static;

    /// Shared context providing dependencies.
    type Context: Send + Sync;

    /// Error type for step failures.
    type Error: Send;

    /// Human-readable name for logging and for excluding the failed step's
    /// own entry from the rollback pass.
    fn name(&self) -> &'static str;

    /// Execute the fallible unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails to complete. The error becomes
    /// the saga's terminal failure.
    async fn forward(
        &self,
        ctx: &Self::Context,
        args: Self::Args,
    ) -> Result<Self::Output, Self::Error>;

    /// Reverse the step's committed effect.
    ///
    /// Called at most once, during rollback, with the result the forward
    /// action produced. The default implementation is a no-op, suitable
    /// for effects that cannot or need not be reversed.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails. Compensation errors are
    /// collected and logged but never replace the saga's original failure.
    async fn compensate(
        &self,
        ctx: &Self::Context,
        output: Self::Output,
    ) -> Result<(), Self::Error> {
        let _ = (ctx, output);
        Ok(())
    }

    /// Step-local failure observer, called in addition to the
    /// coordinator-level one when this step's forward action fails.
    fn on_error(&self, failure: &StepFailure<'_, Self::Error>) {
        let _ = failure;
    }
}

/// Context passed to failure observers when a step's forward action fails.
#[derive(Debug)]
pub struct StepFailure<'a, E> {
    /// Name of the step that failed.
    pub step: &'a str,
    /// The error captured from the forward action.
    pub error: &'a E,
}
