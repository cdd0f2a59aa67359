#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;

use super::WorkflowStorage;
use crate::domain::models::InitOutcome;
use crate::domain::models::NewSession;
use crate::domain::models::NewStep;
use crate::domain::models::SeedBox;
use crate::domain::models::Session;
use crate::domain::models::SessionPatch;
use crate::domain::models::StepPatch;
use crate::domain::models::WorkflowError;

/// In-memory mirror of the stored document, owned by whoever drives the
/// console. Mutations go through `WorkflowStorage` and are followed by a
/// `refresh`, so the mirror never drifts from storage.
pub struct AppState {
    pub sessions: Vec<Session>,
    pub current_session_id: Option<String>,
    storage: WorkflowStorage,
}

impl AppState {
    /// Initializes storage from `seed` if needed, then loads the mirror.
    pub async fn new(storage: WorkflowStorage, seed: &SeedBox) -> Result<(AppState, InitOutcome)> {
        let outcome = storage.initialize(seed).await?;

        let mut app_state = AppState {
            sessions: vec![],
            current_session_id: None,
            storage,
        };
        app_state.refresh();

        return Ok((app_state, outcome));
    }

    pub fn refresh(&mut self) {
        self.sessions = self.storage.list_sessions();
        self.current_session_id = self.storage.get_current_session_id();
    }

    pub fn current_session(&self) -> Option<&Session> {
        let current_id = self.current_session_id.as_deref()?;
        return self.sessions.iter().find(|e| return e.session_id == current_id);
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        return self.sessions.iter().find(|e| return e.session_id == session_id);
    }

    /// Resolves a full id or unique id prefix to a session id. `None` picks
    /// the current session.
    pub fn resolve_session_id(&self, prefix: Option<&str>) -> Result<String> {
        let prefix = match prefix {
            Some(prefix) => prefix,
            None => {
                return match &self.current_session_id {
                    Some(id) => Ok(id.to_string()),
                    None => bail!("No session selected. Pass a session id or select one first"),
                };
            }
        };

        if self.session(prefix).is_some() {
            return Ok(prefix.to_string());
        }

        let matches = self
            .sessions
            .iter()
            .filter(|e| return e.session_id.starts_with(prefix))
            .collect::<Vec<&Session>>();

        return match matches.len() {
            1 => Ok(matches[0].session_id.to_string()),
            0 => Err(WorkflowError::SessionNotFound(prefix.to_string()).into()),
            count => bail!(format!("Session id '{prefix}' is ambiguous, it matches {count} sessions")),
        };
    }

    /// Same as `resolve_session_id`, for steps within one session.
    pub fn resolve_step_id(&self, session_id: &str, prefix: &str) -> Result<String> {
        let session = match self.session(session_id) {
            Some(session) => session,
            None => return Err(WorkflowError::SessionNotFound(session_id.to_string()).into()),
        };

        if session.step(prefix).is_some() {
            return Ok(prefix.to_string());
        }

        let matches = session
            .steps
            .iter()
            .filter(|e| return e.id.starts_with(prefix))
            .map(|e| return e.id.to_string())
            .collect::<Vec<String>>();

        return match matches.len() {
            1 => Ok(matches[0].to_string()),
            0 => Err(WorkflowError::StepNotFound(prefix.to_string()).into()),
            count => bail!(format!("Step id '{prefix}' is ambiguous, it matches {count} steps")),
        };
    }

    pub fn select_session(&mut self, session_id: Option<&str>) -> Result<()> {
        self.storage.set_current_session_id(session_id)?;
        self.refresh();
        return Ok(());
    }

    pub fn add_session(&mut self, new_session: NewSession) -> Result<String> {
        let session_id = self.storage.add_session(new_session)?;
        self.refresh();
        return Ok(session_id);
    }

    pub fn update_session(&mut self, session_id: &str, patch: SessionPatch) -> Result<()> {
        self.storage.update_session(session_id, patch)?;
        self.refresh();
        return Ok(());
    }

    pub fn delete_session(&mut self, session_id: &str) -> Result<()> {
        self.storage.delete_session(session_id)?;
        self.refresh();
        return Ok(());
    }

    pub fn duplicate_session(&mut self, session_id: &str) -> Result<String> {
        let copy_id = self.storage.duplicate_session(session_id)?;
        self.refresh();
        return Ok(copy_id);
    }

    pub fn add_step(&mut self, session_id: &str, new_step: NewStep) -> Result<String> {
        let step_id = self.storage.add_step(session_id, new_step)?;
        self.refresh();
        return Ok(step_id);
    }

    pub fn update_step(&mut self, session_id: &str, step_id: &str, patch: StepPatch) -> Result<()> {
        self.storage.update_step(session_id, step_id, patch)?;
        self.refresh();
        return Ok(());
    }

    pub fn delete_step(&mut self, session_id: &str, step_id: &str) -> Result<()> {
        self.storage.delete_step(session_id, step_id)?;
        self.refresh();
        return Ok(());
    }

    pub fn move_step_left(&mut self, session_id: &str, step_id: &str) -> Result<bool> {
        let moved = self.storage.move_step_left(session_id, step_id)?;
        self.refresh();
        return Ok(moved);
    }
}
