use taskdeck_backend::provider::{Accounts, Rows, Sessions};
use taskdeck_backend::{Account, Row, Session};
use taskdeck_saga::Coordinator;

use super::steps::{CreateAccountStep, CreateProfileStep, CreateSessionStep, SessionArgs};
use crate::Result;

/// Input to [`sign_up`].
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Resources created by a successful sign-up.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub account: Account,
    pub profile: Row,
    pub session: Session,
}

/// Register a new user: account, profile row, then session.
///
/// The three resources commit independently on the backend; if any step
/// fails, the ones already created are deleted again before the error is
/// surfaced, so a failed sign-up leaves no orphaned account or profile.
pub async fn sign_up<P>(backend: &P, input: SignUpInput) -> Result<SignUpOutcome>
where
    P: Accounts + Rows + Sessions + 'static,
{
    let mut saga = Coordinator::new();

    let account = saga
        .run(backend, CreateAccountStep::new(), input.clone())
        .await;
    let profile = match &account {
        Some(account) => {
            saga.run(backend, CreateProfileStep::new(), account.clone())
                .await
        }
        None => None,
    };
    let session = saga
        .run(
            backend,
            CreateSessionStep::new(),
            SessionArgs {
                email: input.email,
                password: input.password,
            },
        )
        .await;
    saga.finish()?;

    Ok(SignUpOutcome {
        account: account.expect("saga finished cleanly, so every step ran"),
        profile: profile.expect("saga finished cleanly, so every step ran"),
        session: session.expect("saga finished cleanly, so every step ran"),
    })
}
