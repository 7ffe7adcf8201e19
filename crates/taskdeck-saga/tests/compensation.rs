//! Integration tests for rollback behavior: which compensations run, how
//! often, with what data, and in what order.

use std::sync::Mutex;

use async_trait::async_trait;
use taskdeck_saga::{CompensationOrder, Coordinator, SagaStep};

#[derive(Default)]
struct TestContext {
    log: Mutex<Vec<String>>,
}

impl TestContext {
    fn push(&self, entry: String) {
        self.log.lock().expect("log lock").push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.log.lock().expect("log lock").clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TestError(String);

struct TrackedStep {
    name: &'static str,
}

#[async_trait]
impl SagaStep for TrackedStep {
    type Args = i32;
    type Output = i32;
    type Context = TestContext;
    type Error = TestError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn forward(&self, ctx: &TestContext, args: i32) -> Result<i32, TestError> {
        ctx.push(format!("forward {}", self.name));
        Ok(args + 1)
    }

    async fn compensate(&self, ctx: &TestContext, output: i32) -> Result<(), TestError> {
        ctx.push(format!("compensate {}: output was {output}", self.name));
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

    async fn forward(&self, ctx: &TestContext, (): ()) -> Result<(), TestError> {
        ctx.push("forward failing".to_string());
        Err(TestError("boom".to_string()))
    }

    async fn compensate(&self, ctx: &TestContext, (): ()) -> Result<(), TestError> {
        ctx.push("compensate failing".to_string());
        Ok(())
    }
}

#[tokio::test]
async fn middle_step_failure_reverses_only_the_committed_steps() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    let first = saga.run(&ctx, TrackedStep { name: "step_a" }, 0).await;
    saga.run(&ctx, FailingStep, ()).await;
    let third = saga.run(&ctx, TrackedStep { name: "step_c" }, 10).await;

    assert_eq!(first, Some(1));
    assert_eq!(third, None);

    let log = ctx.entries();
    assert_eq!(
        log,
        [
            "forward step_a",
            "forward failing",
            "compensate step_a: output was 1"
        ]
    );
}

#[tokio::test]
async fn compensation_receives_the_forward_actions_result() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    saga.run(&ctx, TrackedStep { name: "step_a" }, 41).await;
    saga.run(&ctx, FailingStep, ()).await;

    let log = ctx.entries();
    assert!(log.contains(&"compensate step_a: output was 42".to_string()));
}

#[tokio::test]
async fn first_step_failure_leaves_nothing_to_reverse() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    saga.run(&ctx, FailingStep, ()).await;
    saga.run(&ctx, TrackedStep { name: "never_runs" }, 0).await;

    let err = saga.finish().expect_err("saga failed");
    assert_eq!(err.to_string(), "step 'failing' failed");

    assert_eq!(ctx.entries(), ["forward failing"]);
}

#[tokio::test]
async fn the_failing_steps_own_compensation_never_runs() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    saga.run(&ctx, TrackedStep { name: "step_a" }, 0).await;
    saga.run(&ctx, FailingStep, ()).await;

    let log = ctx.entries();
    assert!(!log.iter().any(|entry| entry == "compensate failing"));
}

#[tokio::test]
async fn no_compensation_runs_more_than_once() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    saga.run(&ctx, TrackedStep { name: "step_a" }, 0).await;
    saga.run(&ctx, TrackedStep { name: "step_b" }, 0).await;
    saga.run(&ctx, FailingStep, ()).await;
    // further failures must not replay the rollback
    saga.run(&ctx, FailingStep, ()).await;

    let log = ctx.entries();
    let compensations: Vec<_> = log
        .iter()
        .filter(|entry| entry.starts_with("compensate"))
        .collect();
    assert_eq!(compensations.len(), 2);
}

#[tokio::test]
async fn sequential_mode_compensates_in_completion_order() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::builder()
        .compensation_order(CompensationOrder::Sequential)
        .build();

    saga.run(&ctx, TrackedStep { name: "step_a" }, 0).await;
    saga.run(&ctx, TrackedStep { name: "step_b" }, 1).await;
    saga.run(&ctx, TrackedStep { name: "step_c" }, 2).await;
    saga.run(&ctx, FailingStep, ()).await;

    let log = ctx.entries();
    assert_eq!(
        log,
        [
            "forward step_a",
            "forward step_b",
            "forward step_c",
            "forward failing",
            "compensate step_a: output was 1",
            "compensate step_b: output was 2",
            "compensate step_c: output was 3"
        ]
    );
}
