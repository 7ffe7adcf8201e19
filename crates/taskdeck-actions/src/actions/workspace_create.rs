use taskdeck_backend::provider::{Files, Rows, Teams};
use taskdeck_backend::{AccountId, BackendError, Row, StoredFile, Team};
use taskdeck_saga::{Coordinator, StepFailure};
use tracing::warn;

use super::steps::{
    CreateMembershipStep, CreateTeamStep, CreateWorkspaceRowStep, MembershipArgs, NewIcon,
    UploadIconStep, WorkspaceRowArgs,
};
use crate::Result;

/// Input to [`create_workspace`].
#[derive(Debug, Clone)]
pub struct CreateWorkspaceInput {
    pub name: String,
    pub owner: AccountId,
    pub icon: Option<NewIcon>,
}

/// Resources created by a successful workspace creation.
#[derive(Debug, Clone)]
pub struct WorkspaceOutcome {
    pub workspace: Row,
    pub team: Team,
    pub membership: Row,
    pub icon: Option<StoredFile>,
}

/// Create a workspace: optional icon upload, team, workspace row, and the
/// owner's membership, in dependency order.
pub async fn create_workspace<P>(
    backend: &P,
    input: CreateWorkspaceInput,
) -> Result<WorkspaceOutcome>
where
    P: Files + Rows + Teams + 'static,
{
    let mut saga = Coordinator::builder()
        .on_failure(|failure: &StepFailure<'_, BackendError>| {
            warn!(
                step = failure.step,
                error = %failure.error,
                "workspace creation failed, rolling back"
            );
        })
        .build();

    let icon = match input.icon.clone() {
        Some(icon) => saga.run(backend, UploadIconStep::new(), icon).await,
        None => None,
    };
    let team = saga
        .run(backend, CreateTeamStep::new(), input.name.clone())
        .await;
    let workspace = match &team {
        Some(team) => {
            saga.run(
                backend,
                CreateWorkspaceRowStep::new(),
                WorkspaceRowArgs {
                    name: input.name.clone(),
                    owner: input.owner.clone(),
                    team_id: team.id.clone(),
                    icon_id: icon.as_ref().map(|file| file.id.clone()),
                },
            )
            .await
        }
        None => None,
    };
    let membership = match &workspace {
        Some(workspace) => {
            saga.run(
                backend,
                CreateMembershipStep::new(),
                MembershipArgs {
                    workspace_id: workspace.id.clone(),
                    account_id: input.owner,
                    role: "owner",
                },
            )
            .await
        }
        None => None,
    };
    saga.finish()?;

    Ok(WorkspaceOutcome {
        workspace: workspace.expect("saga finished cleanly, so every step ran"),
        team: team.expect("saga finished cleanly, so every step ran"),
        membership: membership.expect("saga finished cleanly, so every step ran"),
        icon,
    })
}
