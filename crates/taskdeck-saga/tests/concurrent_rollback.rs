//! Integration tests for concurrent-mode rollback: all remaining
//! compensations start together and are awaited together.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskdeck_saga::{CompensationOrder, Coordinator, SagaStep};
use tokio::sync::Barrier;
use tokio::time::timeout;

struct TestContext {
    // passes only if every compensation reaches the barrier at once
    barrier: Arc<Barrier>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TestError(String);

struct BarrierStep {
    name: &'static str,
}

#[async_trait]
impl SagaStep for BarrierStep {
    type Args = ();
    type Output = ();
    type Context = TestContext;
    type Error = TestError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn forward(&self, _ctx: &TestContext, (): ()) -> Result<(), TestError> {
        Ok(())
    }

    async fn compensate(&self, ctx: &TestContext, (): ()) -> Result<(), TestError> {
        ctx.barrier.wait().await;
        Ok(())
    }
}

struct FailingStep;

#[async_trait]
impl SagaStep for FailingStep {
    type Args = ();
    type Output = ();
    type Context = TestContext;
    type Error = TestError;

    fn name(&self) -> &'static str {
        "failing"
    }

    async fn forward(&self, _ctx: &TestContext, (): ()) -> Result<(), TestError> {
        Err(TestError("boom".to_string()))
    }
}

#[tokio::test]
async fn concurrent_mode_starts_every_compensation_before_awaiting_any() {
    let ctx = TestContext {
        barrier: Arc::new(Barrier::new(3)),
    };
    let mut saga = Coordinator::builder()
        .compensation_order(CompensationOrder::Concurrent)
        .build();

    saga.run(&ctx, BarrierStep { name: "step_a" }, ()).await;
    saga.run(&ctx, BarrierStep { name: "step_b" }, ()).await;
    saga.run(&ctx, BarrierStep { name: "step_c" }, ()).await;

    // The rollback only completes if all three compensations are in
    // flight simultaneously; sequential execution would deadlock on the
    // barrier and trip the timeout.
    timeout(Duration::from_secs(5), saga.run(&ctx, FailingStep, ()))
        .await
        .expect("all compensations ran concurrently");

    let err = saga.finish().expect_err("saga failed");
    assert_eq!(err.to_string(), "step 'failing' failed");
}
