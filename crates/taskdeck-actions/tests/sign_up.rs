//! End-to-end sign-up tests: either every resource exists afterwards, or
//! none of the user-visible ones do.

use taskdeck_actions::actions::{SignUpInput, sign_up};
use taskdeck_actions::ActionError;
use taskdeck_backend::InMemoryBackend;
use taskdeck_saga::SagaError;

fn input() -> SignUpInput {
    SignUpInput {
        email: "ada@example.com".to_string(),
        password: "hunter2".to_string(),
        name: "Ada".to_string(),
    }
}

fn failed_step(err: &ActionError) -> Option<&str> {
    match err {
        ActionError::Saga(SagaError::StepFailed { step, .. }) => Some(step),
        _ => None,
    }
}

#[tokio::test]
async fn sign_up_creates_account_profile_and_session() -> anyhow::Result<()> {
    let backend = InMemoryBackend::new();

    let outcome = sign_up(&backend, input()).await?;

    assert_eq!(backend.account_count(), 1);
    assert_eq!(backend.row_count("profiles"), 1);
    assert_eq!(backend.session_count(), 1);
    assert_eq!(outcome.session.account_id, outcome.account.id);
    assert_eq!(
        outcome.profile.data.get("account_id").and_then(|v| v.as_str()),
        Some(outcome.account.id.as_str())
    );
    Ok(())
}

#[tokio::test]
async fn failed_session_step_rolls_back_account_and_profile() {
    let backend = InMemoryBackend::new();
    backend.fail_next("create_session");

    let err = sign_up(&backend, input()).await.expect_err("session fails");

    assert_eq!(failed_step(&err), Some("create_session"));
    assert_eq!(backend.account_count(), 0);
    assert_eq!(backend.row_count("profiles"), 0);
    assert_eq!(backend.session_count(), 0);
}

#[tokio::test]
async fn failed_profile_step_rolls_back_the_account_and_skips_the_session() {
    let backend = InMemoryBackend::new();
    backend.fail_next("create_row");

    let err = sign_up(&backend, input()).await.expect_err("profile fails");

    assert_eq!(failed_step(&err), Some("create_profile"));
    assert_eq!(backend.account_count(), 0);
    assert_eq!(backend.session_count(), 0);
}

#[tokio::test]
async fn duplicate_email_fails_without_touching_the_existing_user() -> anyhow::Result<()> {
    let backend = InMemoryBackend::new();
    sign_up(&backend, input()).await?;

    let err = sign_up(&backend, input()).await.expect_err("email taken");

    assert_eq!(failed_step(&err), Some("create_account"));
    assert_eq!(backend.account_count(), 1);
    assert_eq!(backend.row_count("profiles"), 1);
    assert_eq!(backend.session_count(), 1);
    Ok(())
}
