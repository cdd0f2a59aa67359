#[cfg(test)]
#[path = "workflow_storage_test.rs"]
mod tests;

use anyhow::Context;
use anyhow::Result;
use chrono::SecondsFormat;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::models::Document;
use crate::domain::models::InitOutcome;
use crate::domain::models::NewSession;
use crate::domain::models::NewStep;
use crate::domain::models::SeedBox;
use crate::domain::models::Session;
use crate::domain::models::SessionPatch;
use crate::domain::models::StepPatch;
use crate::domain::models::StorageBox;
use crate::domain::models::WorkflowError;
use crate::domain::models::SCHEMA_VERSION;

pub const STORAGE_KEY: &str = "workflow-console-v0.2";

/// Repository over the single persisted workflow document. Every mutator
/// re-reads the latest document, changes one entity and writes the whole
/// document back.
pub struct WorkflowStorage {
    storage: StorageBox,
}

impl WorkflowStorage {
    pub fn new(storage: StorageBox) -> WorkflowStorage {
        return WorkflowStorage { storage };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4().to_string();
    }

    pub fn now() -> String {
        return Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    }

    /// Reads the persisted document. Anything unusable, whether missing,
    /// unreadable, corrupt or from another schema version, comes back as
    /// `None`.
    pub fn load(&self) -> Option<Document> {
        let payload = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                tracing::error!(
                    error = ?err,
                    storage = %self.storage.name(),
                    "Failed to read workflow data"
                );
                return None;
            }
        };

        let version = match Document::stored_version(&payload) {
            Ok(version) => version,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to parse workflow data");
                return None;
            }
        };
        if version != SCHEMA_VERSION {
            tracing::warn!(version = %version, "Data version mismatch, ignoring stored data");
            return None;
        }

        let document: Document = match serde_json::from_str(&payload) {
            Ok(document) => document,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to parse workflow data");
                return None;
            }
        };

        return Some(document);
    }

    /// Stamps `last_updated` and overwrites the stored document.
    pub fn save(&self, document: &mut Document) -> Result<()> {
        document.last_updated = WorkflowStorage::now();
        let payload = serde_json::to_string(document)?;

        self.storage
            .set_item(STORAGE_KEY, &payload)
            .context("Failed to save workflow data")?;

        tracing::debug!(
            storage = %self.storage.name(),
            sessions = document.sessions.len(),
            "Saved workflow data"
        );
        return Ok(());
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(STORAGE_KEY)?;
        return Ok(());
    }

    fn load_initialized(&self) -> Result<Document> {
        return match self.load() {
            Some(document) => Ok(document),
            None => Err(WorkflowError::NotInitialized.into()),
        };
    }

    /// Loads, applies `f`, then saves. Nothing is written if `f` fails.
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let mut document = self.load_initialized()?;
        let res = f(&mut document)?;
        self.save(&mut document)?;

        return Ok(res);
    }

    /// All sessions, newest first.
    pub fn list_sessions(&self) -> Vec<Session> {
        return match self.load() {
            Some(document) => document.sorted_sessions().into_iter().cloned().collect(),
            None => vec![],
        };
    }

    pub fn get_session(&self, session_id: &str) -> Option<Session> {
        return self
            .load()
            .and_then(|document| return document.session(session_id).cloned());
    }

    pub fn get_current_session_id(&self) -> Option<String> {
        return self
            .load()
            .and_then(|document| return document.current_session_id);
    }

    pub fn set_current_session_id(&self, session_id: Option<&str>) -> Result<()> {
        return self.mutate(|document| {
            if let Some(id) = session_id {
                if document.session(id).is_none() {
                    return Err(WorkflowError::SessionNotFound(id.to_string()).into());
                }
            }

            document.current_session_id = session_id.map(|e| return e.to_string());
            return Ok(());
        });
    }

    /// Creates an empty session and makes it current.
    pub fn add_session(&self, new_session: NewSession) -> Result<String> {
        let new_session = new_session.normalize()?;

        return self.mutate(|document| {
            let session =
                new_session.into_session(WorkflowStorage::create_id(), WorkflowStorage::now());
            let session_id = session.session_id.to_string();

            document.sessions.push(session);
            document.current_session_id = Some(session_id.to_string());

            tracing::debug!(session_id, "Added session");
            return Ok(session_id);
        });
    }

    pub fn update_session(&self, session_id: &str, patch: SessionPatch) -> Result<()> {
        return self.mutate(|document| {
            let session = document.session_mut(session_id)?;
            patch.apply(session)?;
            return Ok(());
        });
    }

    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        return self.mutate(|document| {
            let removed = document.remove_session(session_id)?;
            tracing::debug!(
                session_id,
                steps = removed.steps.len(),
                current = ?document.current_session_id,
                "Deleted session"
            );
            return Ok(());
        });
    }

    /// Deep copies a session with fresh ids and makes the copy current.
    pub fn duplicate_session(&self, session_id: &str) -> Result<String> {
        return self.mutate(|document| {
            let copy = match document.session(session_id) {
                Some(session) => {
                    session.duplicate(WorkflowStorage::now(), WorkflowStorage::create_id)
                }
                None => return Err(WorkflowError::SessionNotFound(session_id.to_string()).into()),
            };
            let copy_id = copy.session_id.to_string();

            document.sessions.push(copy);
            document.current_session_id = Some(copy_id.to_string());

            return Ok(copy_id);
        });
    }

    /// Appends a step after the current highest order.
    pub fn add_step(&self, session_id: &str, new_step: NewStep) -> Result<String> {
        let new_step = new_step.normalize()?;

        return self.mutate(|document| {
            let session = document.session_mut(session_id)?;
            let order = session.next_order()?;
            let step = new_step.into_step(
                WorkflowStorage::create_id(),
                order,
                WorkflowStorage::now(),
            );
            let step_id = step.id.to_string();

            session.steps.push(step);
            return Ok(step_id);
        });
    }

    pub fn update_step(&self, session_id: &str, step_id: &str, patch: StepPatch) -> Result<()> {
        return self.mutate(|document| {
            let step = document.session_mut(session_id)?.step_mut(step_id)?;
            patch.apply(step)?;
            return Ok(());
        });
    }

    /// Removes a step and renumbers the remaining ones to `1..N`.
    pub fn delete_step(&self, session_id: &str, step_id: &str) -> Result<()> {
        return self.mutate(|document| {
            document.session_mut(session_id)?.remove_step(step_id)?;
            return Ok(());
        });
    }

    /// Swaps a step with the one before it. The first step is left alone and
    /// nothing is written.
    pub fn move_step_left(&self, session_id: &str, step_id: &str) -> Result<bool> {
        let mut document = self.load_initialized()?;
        let moved = document.session_mut(session_id)?.move_step_left(step_id)?;
        if moved {
            self.save(&mut document)?;
        }

        return Ok(moved);
    }

    /// Bootstraps an empty store from `seed`. A failing seed still leaves a
    /// valid, empty document behind; only storage write errors are returned.
    pub async fn initialize(&self, seed: &SeedBox) -> Result<InitOutcome> {
        if self.load().is_some() {
            tracing::debug!("Storage already initialized");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        match seed.fetch().await {
            Ok(session) => {
                let session_id = session.session_id.to_string();
                let mut document = Document::with_session(session, WorkflowStorage::now());
                self.save(&mut document)?;

                tracing::info!(seed = seed.describe(), "Storage initialized with sample data");
                return Ok(InitOutcome::Seeded(session_id));
            }
            Err(err) => {
                tracing::error!(error = ?err, seed = seed.describe(), "Failed to load seed data");

                let mut document = Document::empty(WorkflowStorage::now());
                self.save(&mut document)?;

                tracing::info!("Storage initialized with empty data");
                return Ok(InitOutcome::Empty);
            }
        }
    }
}
