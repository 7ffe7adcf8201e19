//! The server actions and their saga steps.

mod sign_up;
mod steps;
mod workspace_create;
mod workspace_delete;
mod workspace_icon;

pub use sign_up::{SignUpInput, SignUpOutcome, sign_up};
pub use steps::NewIcon;
pub use workspace_create::{CreateWorkspaceInput, WorkspaceOutcome, create_workspace};
pub use workspace_delete::{DeleteWorkspaceOutcome, delete_workspace};
pub use workspace_icon::{UpdateWorkspaceIconOutcome, update_workspace_icon};

/// Table names in the backend's structured storage.
pub(crate) mod tables {
    pub(crate) const WORKSPACES: &str = "workspaces";
    pub(crate) const PROFILES: &str = "profiles";
    pub(crate) const MEMBERS: &str = "members";
    pub(crate) const PROJECTS: &str = "projects";
    pub(crate) const TASKS: &str = "tasks";
}
