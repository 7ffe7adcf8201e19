//! Integration tests for short-circuiting: once the saga has failed, no
//! further forward action may execute.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use taskdeck_saga::{Coordinator, SagaStep, StepStatus};

#[derive(Default)]
struct TestContext {
    forward_calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TestError(String);

struct CountedStep {
    name: &'static str,
    fail: bool,
}

#[async_trait]
impl SagaStep for CountedStep {
    type Args = ();
    type Output = u32;
    type Context = TestContext;
    type Error = TestError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn forward(&self, ctx: &TestContext, (): ()) -> Result<u32, TestError> {
        ctx.forward_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TestError(format!("{} failed", self.name)));
        }
        Ok(7)
    }

    async fn compensate(&self, ctx: &TestContext, _output: u32) -> Result<(), TestError> {
        ctx.log
            .lock()
            .expect("log lock")
            .push(format!("compensate {}", self.name));
        Ok(())
    }
}

#[tokio::test]
async fn skipped_steps_neither_execute_nor_register_compensations() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    saga.run(
        &ctx,
        CountedStep {
            name: "breaks",
            fail: true,
        },
        (),
    )
    .await;
    let late = saga
        .run(
            &ctx,
            CountedStep {
                name: "late",
                fail: false,
            },
            (),
        )
        .await;

    assert_eq!(late, None);
    assert_eq!(ctx.forward_calls.load(Ordering::SeqCst), 1);
    assert_eq!(saga.completed_steps().count(), 0);
}

#[tokio::test]
async fn failure_is_inspectable_mid_saga() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    assert!(saga.failure().is_none());

    saga.run(
        &ctx,
        CountedStep {
            name: "breaks",
            fail: true,
        },
        (),
    )
    .await;

    assert_eq!(saga.failed_step(), Some("breaks"));
    assert_eq!(
        saga.failure().map(ToString::to_string),
        Some("breaks failed".to_string())
    );
}

#[tokio::test]
async fn audit_log_marks_skipped_steps() {
    let ctx = TestContext::default();
    let mut saga = Coordinator::new();

    saga.run(
        &ctx,
        CountedStep {
            name: "ok",
            fail: false,
        },
        (),
    )
    .await;
    saga.run(
        &ctx,
        CountedStep {
            name: "breaks",
            fail: true,
        },
        (),
    )
    .await;
    saga.run(
        &ctx,
        CountedStep {
            name: "late",
            fail: false,
        },
        (),
    )
    .await;

    let records = saga.audit().records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "ok");
    assert_eq!(records[0].status, StepStatus::Compensated);
    assert_eq!(records[1].name, "breaks");
    assert_eq!(records[1].status, StepStatus::Failed);
    assert_eq!(records[2].name, "late");
    assert_eq!(records[2].status, StepStatus::Skipped);
}
