//! Saga steps shared by the server actions.
//!
//! Each step pairs one backend call with the action that reverses it. The
//! steps are generic over the provider traits they touch, so actions can
//! run against the real service or the in-memory double.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Value, json};
use taskdeck_backend::provider::{Accounts, Files, Rows, Sessions, Teams};
use taskdeck_backend::{
    Account, AccountId, BackendError, FileId, Row, RowId, Session, StoredFile, Team, TeamId,
};
use taskdeck_saga::SagaStep;
use tracing::debug;

use super::sign_up::SignUpInput;
use super::tables;

pub(crate) struct CreateAccountStep<P> {
    _marker: PhantomData<P>,
}

impl<P> CreateAccountStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for CreateAccountStep<P>
where
    P: Accounts + 'static,
{
    type Args = SignUpInput;
    type Output = Account;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "create_account"
    }

    async fn forward(&self, backend: &P, args: SignUpInput) -> Result<Account, BackendError> {
        backend
            .create_account(&args.email, &args.password, &args.name)
            .await
    }

    async fn compensate(&self, backend: &P, account: Account) -> Result<(), BackendError> {
        debug!(account = %account.id, "rolling back account creation");
        backend.delete_account(&account.id).await
    }
}

pub(crate) struct CreateProfileStep<P> {
    _marker: PhantomData<P>,
}

impl<P> CreateProfileStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for CreateProfileStep<P>
where
    P: Rows + 'static,
{
    type Args = Account;
    type Output = Row;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "create_profile"
    }

    async fn forward(&self, backend: &P, account: Account) -> Result<Row, BackendError> {
        backend
            .create_row(
                tables::PROFILES,
                None,
                json!({
                    "account_id": account.id.as_str(),
                    "email": account.email,
                    "name": account.name,
                }),
            )
            .await
    }

    async fn compensate(&self, backend: &P, profile: Row) -> Result<(), BackendError> {
        debug!(profile = %profile.id, "rolling back profile creation");
        backend.delete_row(tables::PROFILES, &profile.id).await
    }
}

pub(crate) struct SessionArgs {
    pub(crate) email: String,
    pub(crate) password: String,
}

pub(crate) struct CreateSessionStep<P> {
    _marker: PhantomData<P>,
}

impl<P> CreateSessionStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for CreateSessionStep<P>
where
    P: Sessions + 'static,
{
    type Args = SessionArgs;
    type Output = Session;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "create_session"
    }

    async fn forward(&self, backend: &P, args: SessionArgs) -> Result<Session, BackendError> {
        backend.create_session(&args.email, &args.password).await
    }

    async fn compensate(&self, backend: &P, session: Session) -> Result<(), BackendError> {
        backend.delete_session(&session.id).await
    }
}

/// An icon image to upload, by name and content.
#[derive(Debug, Clone)]
pub struct NewIcon {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub(crate) struct UploadIconStep<P> {
    _marker: PhantomData<P>,
}

impl<P> UploadIconStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for UploadIconStep<P>
where
    P: Files + 'static,
{
    type Args = NewIcon;
    type Output = StoredFile;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "upload_icon"
    }

    async fn forward(&self, backend: &P, icon: NewIcon) -> Result<StoredFile, BackendError> {
        backend.upload(&icon.name, icon.bytes).await
    }

    async fn compensate(&self, backend: &P, file: StoredFile) -> Result<(), BackendError> {
        debug!(file = %file.id, "rolling back icon upload");
        backend.delete_file(&file.id).await
    }
}

pub(crate) struct CreateTeamStep<P> {
    _marker: PhantomData<P>,
}

impl<P> CreateTeamStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for CreateTeamStep<P>
where
    P: Teams + 'static,
{
    type Args = String;
    type Output = Team;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "create_team"
    }

    async fn forward(&self, backend: &P, name: String) -> Result<Team, BackendError> {
        backend.create_team(None, &name).await
    }

    async fn compensate(&self, backend: &P, team: Team) -> Result<(), BackendError> {
        debug!(team = %team.id, "rolling back team creation");
        backend.delete_team(&team.id).await
    }
}

pub(crate) struct WorkspaceRowArgs {
    pub(crate) name: String,
    pub(crate) owner: AccountId,
    pub(crate) team_id: TeamId,
    pub(crate) icon_id: Option<FileId>,
}

pub(crate) struct CreateWorkspaceRowStep<P> {
    _marker: PhantomData<P>,
}

impl<P> CreateWorkspaceRowStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for CreateWorkspaceRowStep<P>
where
    P: Rows + 'static,
{
    type Args = WorkspaceRowArgs;
    type Output = Row;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "create_workspace_row"
    }

    async fn forward(&self, backend: &P, args: WorkspaceRowArgs) -> Result<Row, BackendError> {
        let icon = args
            .icon_id
            .as_ref()
            .map_or(Value::Null, |id| Value::String(id.as_str().to_string()));
        backend
            .create_row(
                tables::WORKSPACES,
                None,
                json!({
                    "name": args.name,
                    "owner_id": args.owner.as_str(),
                    "team_id": args.team_id.as_str(),
                    "icon_id": icon,
                }),
            )
            .await
    }

    async fn compensate(&self, backend: &P, workspace: Row) -> Result<(), BackendError> {
        debug!(workspace = %workspace.id, "rolling back workspace row creation");
        backend.delete_row(tables::WORKSPACES, &workspace.id).await
    }
}

pub(crate) struct MembershipArgs {
    pub(crate) workspace_id: RowId,
    pub(crate) account_id: AccountId,
    pub(crate) role: &'static str,
}

pub(crate) struct CreateMembershipStep<P> {
    _marker: PhantomData<P>,
}

impl<P> CreateMembershipStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for CreateMembershipStep<P>
where
    P: Rows + 'static,
{
    type Args = MembershipArgs;
    type Output = Row;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "create_membership"
    }

    async fn forward(&self, backend: &P, args: MembershipArgs) -> Result<Row, BackendError> {
        backend
            .create_row(
                tables::MEMBERS,
                None,
                json!({
                    "workspace_id": args.workspace_id.as_str(),
                    "account_id": args.account_id.as_str(),
                    "role": args.role,
                }),
            )
            .await
    }

    async fn compensate(&self, backend: &P, membership: Row) -> Result<(), BackendError> {
        backend.delete_row(tables::MEMBERS, &membership.id).await
    }
}

#[derive(Debug, Clone)]
pub(crate) struct IconSwap {
    pub(crate) workspace_id: RowId,
    pub(crate) icon_id: FileId,
    pub(crate) previous_icon: Option<FileId>,
}

pub(crate) struct SetWorkspaceIconStep<P> {
    _marker: PhantomData<P>,
}

impl<P> SetWorkspaceIconStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for SetWorkspaceIconStep<P>
where
    P: Rows + 'static,
{
    type Args = IconSwap;
    type Output = IconSwap;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "set_workspace_icon"
    }

    async fn forward(&self, backend: &P, args: IconSwap) -> Result<IconSwap, BackendError> {
        backend
            .update_row(
                tables::WORKSPACES,
                &args.workspace_id,
                json!({ "icon_id": args.icon_id.as_str() }),
            )
            .await?;
        Ok(args)
    }

    async fn compensate(&self, backend: &P, swap: IconSwap) -> Result<(), BackendError> {
        let previous = swap
            .previous_icon
            .as_ref()
            .map_or(Value::Null, |id| Value::String(id.as_str().to_string()));
        debug!(workspace = %swap.workspace_id, "restoring previous workspace icon");
        backend
            .update_row(
                tables::WORKSPACES,
                &swap.workspace_id,
                json!({ "icon_id": previous }),
            )
            .await?;
        Ok(())
    }
}

/// Deletes one file. No compensation: the deleted bytes are unrecoverable,
/// so this step must come after every reversible one.
pub(crate) struct DeleteFileStep<P> {
    name: &'static str,
    _marker: PhantomData<P>,
}

impl<P> DeleteFileStep<P> {
    pub(crate) fn named(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for DeleteFileStep<P>
where
    P: Files + 'static,
{
    type Args = FileId;
    type Output = FileId;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn forward(&self, backend: &P, id: FileId) -> Result<FileId, BackendError> {
        backend.delete_file(&id).await?;
        Ok(id)
    }
}

pub(crate) struct DeleteRowsArgs {
    pub(crate) table: &'static str,
    pub(crate) field: &'static str,
    pub(crate) value: String,
}

/// Deletes every row of a table matching a field, snapshotting them so
/// compensation can restore each one under its original id.
pub(crate) struct DeleteRowsStep<P> {
    name: &'static str,
    _marker: PhantomData<P>,
}

impl<P> DeleteRowsStep<P> {
    pub(crate) fn named(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for DeleteRowsStep<P>
where
    P: Rows + 'static,
{
    type Args = DeleteRowsArgs;
    type Output = Vec<Row>;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn forward(&self, backend: &P, args: DeleteRowsArgs) -> Result<Vec<Row>, BackendError> {
        let rows = backend
            .query_rows(args.table, args.field, &args.value)
            .await?;
        for row in &rows {
            backend.delete_row(args.table, &row.id).await?;
        }
        debug!(table = args.table, count = rows.len(), "deleted dependent rows");
        Ok(rows)
    }

    async fn compensate(&self, backend: &P, rows: Vec<Row>) -> Result<(), BackendError> {
        debug!(count = rows.len(), "restoring deleted rows");
        for row in rows {
            let Row { id, table, data } = row;
            backend.create_row(&table, Some(id), data).await?;
        }
        Ok(())
    }
}

pub(crate) struct DeleteTeamStep<P> {
    _marker: PhantomData<P>,
}

impl<P> DeleteTeamStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for DeleteTeamStep<P>
where
    P: Teams + 'static,
{
    type Args = TeamId;
    type Output = Team;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "delete_team"
    }

    async fn forward(&self, backend: &P, id: TeamId) -> Result<Team, BackendError> {
        let team = backend.get_team(&id).await?;
        backend.delete_team(&id).await?;
        Ok(team)
    }

    async fn compensate(&self, backend: &P, team: Team) -> Result<(), BackendError> {
        debug!(team = %team.id, "recreating deleted team");
        backend.create_team(Some(team.id), &team.name).await?;
        Ok(())
    }
}

pub(crate) struct DeleteWorkspaceRowStep<P> {
    _marker: PhantomData<P>,
}

impl<P> DeleteWorkspaceRowStep<P> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P> SagaStep for DeleteWorkspaceRowStep<P>
where
    P: Rows + 'static,
{
    type Args = RowId;
    type Output = Row;
    type Context = P;
    type Error = BackendError;

    fn name(&self) -> &'static str {
        "delete_workspace_row"
    }

    async fn forward(&self, backend: &P, id: RowId) -> Result<Row, BackendError> {
        let row = backend.get_row(tables::WORKSPACES, &id).await?;
        backend.delete_row(tables::WORKSPACES, &id).await?;
        Ok(row)
    }

    async fn compensate(&self, backend: &P, workspace: Row) -> Result<(), BackendError> {
        debug!(workspace = %workspace.id, "recreating deleted workspace row");
        let Row { id, table, data } = workspace;
        backend.create_row(&table, Some(id), data).await?;
        Ok(())
    }
}
