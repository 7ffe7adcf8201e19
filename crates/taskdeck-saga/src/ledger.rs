use futures::future::BoxFuture;

/// A recorded compensation: invoked with the shared context, it reverses
/// one committed step.
pub(crate) type CompensationFn<Ctx, E> =
    Box<dyn for<'a> FnOnce(&'a Ctx) -> BoxFuture<'a, Result<(), E>> + Send>;

pub(crate) struct Compensation<Ctx: 'static, E: 'static> {
    pub(crate) step: &'static str,
    pub(crate) run: CompensationFn<Ctx, E>,
}

/// Ordered record of successfully completed steps and their compensations.
///
/// Append-only during forward execution; drained exactly once, on failure.
/// Insertion order is completion order, the saga's only ordering guarantee.
pub(crate) struct RollbackLedger<Ctx: 'static, E: 'static> {
    entries: Vec<Compensation<Ctx, E>>,
}

impl<Ctx: 'static, E: 'static> RollbackLedger<Ctx, E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a committed step's compensation. Called only after the
    /// step's forward action has succeeded.
    pub(crate) fn record(&mut self, step: &'static str, run: CompensationFn<Ctx, E>) {
        self.entries.push(Compensation { step, run });
    }

    /// Take every entry out of the ledger, skipping any recorded under the
    /// failing step's name. Such an entry cannot exist (failure prevents
    /// registration); the filter guards against a reused step name.
    pub(crate) fn drain_excluding(&mut self, failed_step: &str) -> Vec<Compensation<Ctx, E>> {
        self.entries
            .drain(..)
            .filter(|entry| entry.step != failed_step)
            .collect()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.step)
    }
}
