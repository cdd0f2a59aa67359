#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use std::cmp::Reverse;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Session;
use super::WorkflowError;

pub const SCHEMA_VERSION: &str = "0.2";

/// Just enough of a stored payload to tell its schema version.
#[derive(Deserialize)]
struct DocumentHeader {
    version: String,
}

/// Root record persisted under a single storage key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub sessions: Vec<Session>,
    #[serde(rename = "currentSessionId")]
    pub current_session_id: Option<String>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl Document {
    pub fn empty(last_updated: String) -> Document {
        return Document {
            version: SCHEMA_VERSION.to_string(),
            sessions: vec![],
            current_session_id: None,
            last_updated,
        };
    }

    /// A document holding only `session`, which is also made current.
    pub fn with_session(session: Session, last_updated: String) -> Document {
        return Document {
            version: SCHEMA_VERSION.to_string(),
            current_session_id: Some(session.session_id.clone()),
            sessions: vec![session],
            last_updated,
        };
    }

    /// Reads the schema version of a stored payload without requiring the
    /// rest of it to match the current shape.
    pub fn stored_version(payload: &str) -> Result<String> {
        let header: DocumentHeader = serde_json::from_str(payload)?;
        return Ok(header.version);
    }

    /// Sessions newest first. Ties keep their stored order.
    pub fn sorted_sessions(&self) -> Vec<&Session> {
        let mut sessions = self.sessions.iter().collect::<Vec<&Session>>();
        sessions.sort_by_key(|e| return Reverse(e.created_at_time()));
        return sessions;
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        return self.sessions.iter().find(|e| return e.session_id == session_id);
    }

    pub fn session_mut(&mut self, session_id: &str) -> Result<&mut Session> {
        return match self
            .sessions
            .iter_mut()
            .find(|e| return e.session_id == session_id)
        {
            Some(session) => Ok(session),
            None => Err(WorkflowError::SessionNotFound(session_id.to_string()).into()),
        };
    }

    /// Removes a session with its steps. If it was current, the newest
    /// remaining session takes over, or nothing when none are left.
    pub fn remove_session(&mut self, session_id: &str) -> Result<Session> {
        let idx = match self
            .sessions
            .iter()
            .position(|e| return e.session_id == session_id)
        {
            Some(idx) => idx,
            None => return Err(WorkflowError::SessionNotFound(session_id.to_string()).into()),
        };

        let removed = self.sessions.remove(idx);
        if self.current_session_id.as_deref() == Some(session_id) {
            self.current_session_id = self
                .sorted_sessions()
                .first()
                .map(|e| return e.session_id.clone());
        }

        return Ok(removed);
    }
}
