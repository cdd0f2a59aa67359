#[cfg(test)]
#[path = "step_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::WorkflowError;

/// A single hop in a workflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique within the owning session.
    pub id: String,
    /// 1-based position in the flow.
    pub order: u32,
    pub timestamp: String,
    /// Actor, coach or role, e.g. "Coach C" or "Replit".
    pub actor: String,
    /// Always written, `null` when no skill was used.
    #[serde(default)]
    pub skill: Option<String>,
    /// Execution tool or environment, e.g. "Claude Code".
    pub tool: String,
    pub input_label: String,
    pub output_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// User supplied fields for a new step. `id`, `order` and `timestamp` are
/// assigned by storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewStep {
    pub actor: String,
    pub skill: Option<String>,
    pub tool: String,
    pub input_label: String,
    pub output_label: String,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial step update. `skill` is doubly optional so it can be cleared back
/// to `null` with `Some(None)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepPatch {
    pub actor: Option<String>,
    pub skill: Option<Option<String>>,
    pub tool: Option<String>,
    pub input_label: Option<String>,
    pub output_label: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::InvalidField {
            field,
            message: "is required",
        }
        .into());
    }

    return Ok(trimmed.to_string());
}

fn optional(value: Option<&String>) -> Option<String> {
    return value
        .map(|e| return e.trim().to_string())
        .filter(|e| return !e.is_empty());
}

fn optional_tags(tags: Option<&Vec<String>>) -> Option<Vec<String>> {
    return tags
        .map(|tags| {
            return tags
                .iter()
                .map(|tag| return tag.trim().to_string())
                .filter(|tag| return !tag.is_empty())
                .collect::<Vec<String>>();
        })
        .filter(|tags| return !tags.is_empty());
}

/// Splits a comma separated tag list, dropping blanks. Returns `None` when no
/// tag survives.
pub fn parse_tags(text: &str) -> Option<Vec<String>> {
    let tags = text
        .split(',')
        .map(|tag| return tag.to_string())
        .collect::<Vec<String>>();

    return optional_tags(Some(&tags));
}

impl NewStep {
    /// Trims every field, rejecting blank required ones. Blank optional
    /// fields become `None`.
    pub fn normalize(&self) -> Result<NewStep> {
        return Ok(NewStep {
            actor: required("actor", &self.actor)?,
            skill: optional(self.skill.as_ref()),
            tool: required("tool", &self.tool)?,
            input_label: required("input_label", &self.input_label)?,
            output_label: required("output_label", &self.output_label)?,
            summary: optional(self.summary.as_ref()),
            tags: optional_tags(self.tags.as_ref()),
        });
    }

    pub fn into_step(self, id: String, order: u32, timestamp: String) -> Step {
        return Step {
            id,
            order,
            timestamp,
            actor: self.actor,
            skill: self.skill,
            tool: self.tool,
            input_label: self.input_label,
            output_label: self.output_label,
            summary: self.summary,
            tags: self.tags,
        };
    }
}

impl StepPatch {
    pub fn is_empty(&self) -> bool {
        return *self == StepPatch::default();
    }

    /// Merges the patch into `step`. Required fields are validated before
    /// anything is written, so a rejected patch leaves `step` untouched.
    pub fn apply(&self, step: &mut Step) -> Result<()> {
        let actor = self
            .actor
            .as_ref()
            .map(|e| return required("actor", e))
            .transpose()?;
        let tool = self
            .tool
            .as_ref()
            .map(|e| return required("tool", e))
            .transpose()?;
        let input_label = self
            .input_label
            .as_ref()
            .map(|e| return required("input_label", e))
            .transpose()?;
        let output_label = self
            .output_label
            .as_ref()
            .map(|e| return required("output_label", e))
            .transpose()?;

        if let Some(actor) = actor {
            step.actor = actor;
        }
        if let Some(tool) = tool {
            step.tool = tool;
        }
        if let Some(input_label) = input_label {
            step.input_label = input_label;
        }
        if let Some(output_label) = output_label {
            step.output_label = output_label;
        }
        if let Some(skill) = &self.skill {
            step.skill = optional(skill.as_ref());
        }
        if self.summary.is_some() {
            step.summary = optional(self.summary.as_ref());
        }
        if self.tags.is_some() {
            step.tags = optional_tags(self.tags.as_ref());
        }

        return Ok(());
    }
}
