#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use anyhow::Result;
use chrono::DateTime;
use chrono::FixedOffset;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Step;
use super::WorkflowError;

/// A titled, timestamped container for an ordered sequence of steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub title: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewSession {
    pub title: String,
    pub description: Option<String>,
}

/// Partial session update. A blank description clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

fn required_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::InvalidField {
            field: "title",
            message: "is required",
        }
        .into());
    }

    return Ok(trimmed.to_string());
}

fn optional_description(description: Option<&String>) -> Option<String> {
    return description
        .map(|e| return e.trim().to_string())
        .filter(|e| return !e.is_empty());
}

impl NewSession {
    pub fn normalize(&self) -> Result<NewSession> {
        return Ok(NewSession {
            title: required_title(&self.title)?,
            description: optional_description(self.description.as_ref()),
        });
    }

    pub fn into_session(self, session_id: String, created_at: String) -> Session {
        return Session {
            session_id,
            title: self.title,
            created_at,
            description: self.description,
            steps: vec![],
        };
    }
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        return *self == SessionPatch::default();
    }

    pub fn apply(&self, session: &mut Session) -> Result<()> {
        if let Some(title) = &self.title {
            session.title = required_title(title)?;
        }
        if self.description.is_some() {
            session.description = optional_description(self.description.as_ref());
        }

        return Ok(());
    }
}

impl Session {
    /// Parsed `created_at`. Unparseable values sort as the oldest.
    pub fn created_at_time(&self) -> Option<DateTime<FixedOffset>> {
        return DateTime::parse_from_rfc3339(&self.created_at).ok();
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        return self.steps.iter().find(|e| return e.id == step_id);
    }

    pub fn step_mut(&mut self, step_id: &str) -> Result<&mut Step> {
        return match self.steps.iter_mut().find(|e| return e.id == step_id) {
            Some(step) => Ok(step),
            None => Err(WorkflowError::StepNotFound(step_id.to_string()).into()),
        };
    }

    /// Steps in flow order.
    pub fn sorted_steps(&self) -> Vec<&Step> {
        let mut steps = self.steps.iter().collect::<Vec<&Step>>();
        steps.sort_by_key(|e| return e.order);
        return steps;
    }

    /// Order for a step appended after the current highest one.
    pub fn next_order(&self) -> Result<u32> {
        let highest = self.steps.iter().map(|e| return e.order).max().unwrap_or(0);
        return match highest.checked_add(1) {
            Some(order) => Ok(order),
            None => Err(WorkflowError::InvalidField {
                field: "order",
                message: "is out of range",
            }
            .into()),
        };
    }

    /// Removes a step and renumbers the rest to a dense `1..N` run, keeping
    /// their relative order.
    pub fn remove_step(&mut self, step_id: &str) -> Result<Step> {
        let idx = match self.steps.iter().position(|e| return e.id == step_id) {
            Some(idx) => idx,
            None => return Err(WorkflowError::StepNotFound(step_id.to_string()).into()),
        };

        let removed = self.steps.remove(idx);
        self.renumber_steps();

        return Ok(removed);
    }

    pub fn renumber_steps(&mut self) {
        self.steps.sort_by_key(|e| return e.order);
        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.order = idx as u32 + 1;
        }
    }

    /// Swaps the step's order with the step right before it. Returns `false`
    /// without touching anything when the step is already first.
    pub fn move_step_left(&mut self, step_id: &str) -> Result<bool> {
        let mut sorted = self
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| return (idx, step.order, step.id == step_id))
            .collect::<Vec<(usize, u32, bool)>>();
        sorted.sort_by_key(|(_, order, _)| return *order);

        let pos = match sorted.iter().position(|(_, _, found)| return *found) {
            Some(pos) => pos,
            None => return Err(WorkflowError::StepNotFound(step_id.to_string()).into()),
        };
        if pos == 0 {
            return Ok(false);
        }

        let (current_idx, current_order, _) = sorted[pos];
        let (previous_idx, previous_order, _) = sorted[pos - 1];
        self.steps[current_idx].order = previous_order;
        self.steps[previous_idx].order = current_order;

        return Ok(true);
    }

    /// Deep copy with fresh identifiers. `new_id` is called once for the
    /// session and once per step.
    pub fn duplicate<F>(&self, created_at: String, mut new_id: F) -> Session
    where
        F: FnMut() -> String,
    {
        return Session {
            session_id: new_id(),
            title: format!("{} (Copy)", self.title),
            created_at,
            description: self.description.clone(),
            steps: self
                .steps
                .iter()
                .map(|step| {
                    return Step {
                        id: new_id(),
                        ..step.clone()
                    };
                })
                .collect(),
        };
    }
}
