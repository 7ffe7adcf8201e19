//! Integration tests for failing compensations: rollback is best-effort,
//! the original step failure stays authoritative, and the compensation
//! errors are collected for inspection.

use std::sync::Mutex;

use async_trait::async_trait;
use taskdeck_saga::{CompensationOrder, Coordinator, SagaStep, StepStatus};

#[derive(Default)]
struct TestContext {
    log: Mutex<Vec<String>>,
}

impl TestContext {
    fn push(&self, entry: String) {
        self.log.lock().expect("log lock").push(entry);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TestError(String);

struct Step {
    name: &'static str,
    fail_compensation: bool,
}

#[async_trait]
impl SagaStep for Step {
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
        if self.fail_compensation {
            return Err(TestError(format!("cannot undo {}", self.name)));
        }
        ctx.push(format!("compensated {}", self.name));
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

async fn run_saga(order: CompensationOrder, ctx: &TestContext) -> Coordinator<TestContext, TestError> {
    let mut saga = Coordinator::builder().compensation_order(order).build();

    saga.run(
        ctx,
        Step {
            name: "reversible",
            fail_compensation: false,
        },
        (),
    )
    .await;
    saga.run(
        ctx,
        Step {
            name: "stuck",
            fail_compensation: true,
        },
        (),
    )
    .await;
    saga.run(
        ctx,
        Step {
            name: "also_reversible",
            fail_compensation: false,
        },
        (),
    )
    .await;
    saga.run(ctx, FailingStep, ()).await;

    saga
}

#[tokio::test]
async fn sequential_rollback_continues_past_a_failed_compensation() {
    let ctx = TestContext::default();
    let saga = run_saga(CompensationOrder::Sequential, &ctx).await;

    let log = ctx.log.lock().expect("log lock").clone();
    assert_eq!(log, ["compensated reversible", "compensated also_reversible"]);

    let failures = saga.compensation_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].step, "stuck");
    assert_eq!(failures[0].error.to_string(), "cannot undo stuck");
}

#[tokio::test]
async fn concurrent_rollback_attempts_every_compensation() {
    let ctx = TestContext::default();
    let saga = run_saga(CompensationOrder::Concurrent, &ctx).await;

    let mut log = ctx.log.lock().expect("log lock").clone();
    log.sort();
    assert_eq!(log, ["compensated also_reversible", "compensated reversible"]);
    assert_eq!(saga.compensation_failures().len(), 1);
}

#[tokio::test]
async fn the_original_step_failure_stays_authoritative() {
    let ctx = TestContext::default();
    let saga = run_saga(CompensationOrder::Sequential, &ctx).await;

    let err = saga.finish().expect_err("saga failed");
    assert_eq!(err.to_string(), "step 'failing' failed");
}

#[tokio::test]
async fn audit_log_distinguishes_failed_compensations() {
    let ctx = TestContext::default();
    let saga = run_saga(CompensationOrder::Sequential, &ctx).await;

    let records = saga.audit().records();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].status, StepStatus::Compensated);
    assert_eq!(records[1].status, StepStatus::CompensationFailed);
    assert_eq!(records[2].status, StepStatus::Compensated);
    assert_eq!(records[3].status, StepStatus::Failed);
}
