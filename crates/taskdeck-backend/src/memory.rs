//! In-memory provider used by consumer tests.
//!
//! Implements every provider trait over plain maps, with one-shot failure
//! injection so saga rollback paths can be exercised deterministically.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;
use crate::ids::{AccountId, FileId, RowId, SessionId, TeamId};
use crate::provider::{Accounts, Files, Rows, Sessions, Teams};
use crate::types::{Account, Row, Session, StoredFile, Team};

#[derive(Default)]
struct State {
    next_id: u64,
    accounts: HashMap<AccountId, Account>,
    credentials: HashMap<String, (String, AccountId)>,
    sessions: HashMap<SessionId, Session>,
    files: HashMap<FileId, (StoredFile, Vec<u8>)>,
    rows: HashMap<RowId, Row>,
    teams: HashMap<TeamId, Team>,
    failures: HashMap<String, u32>,
}

impl State {
    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }

    fn check_failure(&mut self, operation: &str) -> Result<(), BackendError> {
        if let Some(remaining) = self.failures.get_mut(operation) {
            *remaining -= 1;
            if *remaining == 0 {
                self.failures.remove(operation);
                return Err(BackendError::service(format!(
                    "injected failure in {operation}"
                )));
            }
        }
        Ok(())
    }
}

/// In-memory stand-in for the remote backend.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("backend state lock poisoned")
    }

    /// Make the next call to `operation` fail with a service error.
    pub fn fail_next(&self, operation: &str) {
        self.fail_nth(operation, 1);
    }

    /// Make the `nth` upcoming call to `operation` (1-based) fail with a
    /// service error. Consumed when it fires.
    pub fn fail_nth(&self, operation: &str, nth: u32) {
        self.state().failures.insert(operation.to_string(), nth);
    }

    #[must_use]
    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.state().files.len()
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.state().teams.len()
    }

    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.state()
            .rows
            .values()
            .filter(|row| row.table == table)
            .count()
    }
}

#[async_trait]
impl Accounts for InMemoryBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError> {
        let mut state = self.state();
        state.check_failure("create_account")?;
        if state.credentials.contains_key(email) {
            return Err(BackendError::already_exists(format!("account '{email}'")));
        }
        let id = AccountId::new(state.mint("acc"));
        let account = Account {
            id: id.clone(),
            email: email.to_string(),
            name: name.to_string(),
        };
        state
            .credentials
            .insert(email.to_string(), (password.to_string(), id.clone()));
        state.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), BackendError> {
        let mut state = self.state();
        state.check_failure("delete_account")?;
        let account = state
            .accounts
            .remove(id)
            .ok_or_else(|| BackendError::not_found(format!("account '{id}'")))?;
        state.credentials.remove(&account.email);
        Ok(())
    }
}

#[async_trait]
impl Sessions for InMemoryBackend {
    async fn create_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut state = self.state();
        state.check_failure("create_session")?;
        let account_id = match state.credentials.get(email) {
            Some((stored, account_id)) if stored == password => account_id.clone(),
            _ => return Err(BackendError::Unauthorized),
        };
        let id = SessionId::new(state.mint("ses"));
        let session = Session {
            id: id.clone(),
            account_id,
        };
        state.sessions.insert(id, session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), BackendError> {
        let mut state = self.state();
        state.check_failure("delete_session")?;
        state
            .sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BackendError::not_found(format!("session '{id}'")))
    }
}

#[async_trait]
impl Files for InMemoryBackend {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<StoredFile, BackendError> {
        let mut state = self.state();
        state.check_failure("upload")?;
        let id = FileId::new(state.mint("file"));
        let file = StoredFile {
            id: id.clone(),
            name: name.to_string(),
            size: bytes.len() as u64,
        };
        state.files.insert(id, (file.clone(), bytes));
        Ok(file)
    }

    async fn download(&self, id: &FileId) -> Result<Vec<u8>, BackendError> {
        let mut state = self.state();
        state.check_failure("download")?;
        state
            .files
            .get(id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| BackendError::not_found(format!("file '{id}'")))
    }

    async fn delete_file(&self, id: &FileId) -> Result<(), BackendError> {
        let mut state = self.state();
        state.check_failure("delete_file")?;
        state
            .files
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BackendError::not_found(format!("file '{id}'")))
    }
}

fn merge_into(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                target.insert(key, value);
            }
        }
        (target, patch) => *target = patch,
    }
}

#[async_trait]
impl Rows for InMemoryBackend {
    async fn create_row(
        &self,
        table: &str,
        id: Option<RowId>,
        data: Value,
    ) -> Result<Row, BackendError> {
        let mut state = self.state();
        state.check_failure("create_row")?;
        let id = match id {
            Some(id) => {
                if state.rows.contains_key(&id) {
                    return Err(BackendError::already_exists(format!("row '{id}'")));
                }
                id
            }
            None => RowId::new(state.mint("row")),
        };
        let row = Row {
            id: id.clone(),
            table: table.to_string(),
            data,
        };
        state.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn get_row(&self, table: &str, id: &RowId) -> Result<Row, BackendError> {
        let mut state = self.state();
        state.check_failure("get_row")?;
        state
            .rows
            .get(id)
            .filter(|row| row.table == table)
            .cloned()
            .ok_or_else(|| BackendError::not_found(format!("row '{id}' in '{table}'")))
    }

    async fn update_row(&self, table: &str, id: &RowId, data: Value) -> Result<Row, BackendError> {
        let mut state = self.state();
        state.check_failure("update_row")?;
        let row = state
            .rows
            .get_mut(id)
            .filter(|row| row.table == table)
            .ok_or_else(|| BackendError::not_found(format!("row '{id}' in '{table}'")))?;
        merge_into(&mut row.data, data);
        Ok(row.clone())
    }

    async fn delete_row(&self, table: &str, id: &RowId) -> Result<(), BackendError> {
        let mut state = self.state();
        state.check_failure("delete_row")?;
        match state.rows.get(id) {
            Some(row) if row.table == table => {
                state.rows.remove(id);
                Ok(())
            }
            _ => Err(BackendError::not_found(format!("row '{id}' in '{table}'"))),
        }
    }

    async fn query_rows(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Row>, BackendError> {
        let mut state = self.state();
        state.check_failure("query_rows")?;
        let mut rows: Vec<Row> = state
            .rows
            .values()
            .filter(|row| {
                row.table == table
                    && row.data.get(field).and_then(Value::as_str) == Some(value)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(rows)
    }
}

#[async_trait]
impl Teams for InMemoryBackend {
    async fn create_team(&self, id: Option<TeamId>, name: &str) -> Result<Team, BackendError> {
        let mut state = self.state();
        state.check_failure("create_team")?;
        let id = match id {
            Some(id) => {
                if state.teams.contains_key(&id) {
                    return Err(BackendError::already_exists(format!("team '{id}'")));
                }
                id
            }
            None => TeamId::new(state.mint("team")),
        };
        let team = Team {
            id: id.clone(),
            name: name.to_string(),
        };
        state.teams.insert(id, team.clone());
        Ok(team)
    }

    async fn get_team(&self, id: &TeamId) -> Result<Team, BackendError> {
        let mut state = self.state();
        state.check_failure("get_team")?;
        state
            .teams
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::not_found(format!("team '{id}'")))
    }

    async fn delete_team(&self, id: &TeamId) -> Result<(), BackendError> {
        let mut state = self.state();
        state.check_failure("delete_team")?;
        state
            .teams
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BackendError::not_found(format!("team '{id}'")))
    }
}
