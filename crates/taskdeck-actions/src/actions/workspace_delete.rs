use serde_json::Value;
use taskdeck_backend::provider::{Files, Rows, Teams};
use taskdeck_backend::{FileId, Row, RowId, TeamId};
use taskdeck_saga::{CompensationOrder, Coordinator};

use super::steps::{
    DeleteFileStep, DeleteRowsArgs, DeleteRowsStep, DeleteTeamStep, DeleteWorkspaceRowStep,
};
use super::tables;
use crate::Result;

/// Resources removed by a successful workspace deletion.
#[derive(Debug, Clone)]
pub struct DeleteWorkspaceOutcome {
    pub workspace: Row,
    pub deleted_tasks: usize,
    pub deleted_projects: usize,
    pub deleted_members: usize,
}

/// Delete a workspace and everything that belongs to it: tasks, projects,
/// memberships, the icon file, the team, and finally the workspace row.
///
/// Deletions compensate by re-creating the snapshotted resources under
/// their original ids, so this saga uses sequential compensation: the
/// rows come back in a deterministic order. The icon file is the
/// exception — its bytes cannot be restored once gone.
pub async fn delete_workspace<P>(
    backend: &P,
    workspace_id: &RowId,
) -> Result<DeleteWorkspaceOutcome>
where
    P: Files + Rows + Teams + 'static,
{
    let workspace = backend.get_row(tables::WORKSPACES, workspace_id).await?;
    let team_id = workspace
        .data
        .get("team_id")
        .and_then(Value::as_str)
        .map(TeamId::from);
    let icon_id = workspace
        .data
        .get("icon_id")
        .and_then(Value::as_str)
        .map(FileId::from);

    let mut saga = Coordinator::builder()
        .compensation_order(CompensationOrder::Sequential)
        .build();

    let tasks = saga
        .run(
            backend,
            DeleteRowsStep::named("delete_tasks"),
            DeleteRowsArgs {
                table: tables::TASKS,
                field: "workspace_id",
                value: workspace_id.to_string(),
            },
        )
        .await;
    let projects = saga
        .run(
            backend,
            DeleteRowsStep::named("delete_projects"),
            DeleteRowsArgs {
                table: tables::PROJECTS,
                field: "workspace_id",
                value: workspace_id.to_string(),
            },
        )
        .await;
    let members = saga
        .run(
            backend,
            DeleteRowsStep::named("delete_memberships"),
            DeleteRowsArgs {
                table: tables::MEMBERS,
                field: "workspace_id",
                value: workspace_id.to_string(),
            },
        )
        .await;
    if let Some(icon) = icon_id {
        saga.run(backend, DeleteFileStep::named("delete_workspace_icon"), icon)
            .await;
    }
    if let Some(team) = team_id {
        saga.run(backend, DeleteTeamStep::new(), team).await;
    }
    let removed = saga
        .run(backend, DeleteWorkspaceRowStep::new(), workspace_id.clone())
        .await;
    saga.finish()?;

    Ok(DeleteWorkspaceOutcome {
        workspace: removed.expect("saga finished cleanly, so every step ran"),
        deleted_tasks: tasks.map_or(0, |rows| rows.len()),
        deleted_projects: projects.map_or(0, |rows| rows.len()),
        deleted_members: members.map_or(0, |rows| rows.len()),
    })
}
