use serde_json::Value;
use taskdeck_backend::provider::{Files, Rows};
use taskdeck_backend::{FileId, RowId, StoredFile};
use taskdeck_saga::Coordinator;

use super::steps::{DeleteFileStep, IconSwap, NewIcon, SetWorkspaceIconStep, UploadIconStep};
use super::tables;
use crate::Result;

/// Resources touched by a successful icon update.
#[derive(Debug, Clone)]
pub struct UpdateWorkspaceIconOutcome {
    pub icon: StoredFile,
    pub replaced: Option<FileId>,
}

/// Replace a workspace's icon: upload the new image, point the workspace
/// row at it, then delete the old image.
///
/// The old image is deleted last, once nothing references it anymore, and
/// without compensation; a failure in any earlier step leaves the
/// workspace pointing at its previous icon.
pub async fn update_workspace_icon<P>(
    backend: &P,
    workspace_id: &RowId,
    icon: NewIcon,
) -> Result<UpdateWorkspaceIconOutcome>
where
    P: Files + Rows + 'static,
{
    let workspace = backend.get_row(tables::WORKSPACES, workspace_id).await?;
    let previous_icon = workspace
        .data
        .get("icon_id")
        .and_then(Value::as_str)
        .map(FileId::from);

    let mut saga = Coordinator::new();

    let uploaded = saga.run(backend, UploadIconStep::new(), icon).await;
    if let Some(file) = &uploaded {
        saga.run(
            backend,
            SetWorkspaceIconStep::new(),
            IconSwap {
                workspace_id: workspace_id.clone(),
                icon_id: file.id.clone(),
                previous_icon: previous_icon.clone(),
            },
        )
        .await;
    }
    if let Some(old) = previous_icon.clone() {
        saga.run(backend, DeleteFileStep::named("delete_old_icon"), old)
            .await;
    }
    saga.finish()?;

    Ok(UpdateWorkspaceIconOutcome {
        icon: uploaded.expect("saga finished cleanly, so every step ran"),
        replaced: previous_icon,
    })
}
