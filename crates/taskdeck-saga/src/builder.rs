use std::fmt::Debug;
use std::marker::PhantomData;

use crate::coordinator::{CompensationOrder, Coordinator, FailureObserver};
use crate::step::StepFailure;

/// Builder for a [`Coordinator`] with non-default configuration.
///
/// Both knobs are fixed at construction: the order compensations execute
/// in during rollback, and an observer invoked exactly once at the moment
/// the saga's failure is first captured.
pub struct CoordinatorBuilder<Ctx: 'static, E: 'static> {
    order: CompensationOrder,
    on_failure: Option<FailureObserver<E>>,
    _phantom: PhantomData<Ctx>,
}

impl<Ctx, E> CoordinatorBuilder<Ctx, E>
where
    Ctx: Send + Sync + 'static,
    E: Debug + Send + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: CompensationOrder::default(),
            on_failure: None,
            _phantom: PhantomData,
        }
    }

    /// Set the order compensations execute in during rollback.
    #[must_use]
    pub fn compensation_order(mut self, order: CompensationOrder) -> Self {
        self.order = order;
        self
    }

    /// Observe the saga's failure at the moment it is first captured.
    #[must_use]
    pub fn on_failure<F>(mut self, observer: F) -> Self
    where
        F: Fn(&StepFailure<'_, E>) + Send + Sync + 'static,
    {
        self.on_failure = Some(Box::new(observer));
        self
    }

    #[must_use]
    pub fn build(self) -> Coordinator<Ctx, E> {
        Coordinator::from_parts(self.order, self.on_failure)
    }
}

impl<Ctx, E> Default for CoordinatorBuilder<Ctx, E>
where
    Ctx: Send + Sync + 'static,
    E: Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
