use anyhow::Result;

use super::parse_tags;
use super::NewStep;
use super::Step;
use super::StepPatch;
use crate::domain::models::WorkflowError;

fn new_step() -> NewStep {
    return NewStep {
        actor: "  Coach C ".to_string(),
        skill: Some("   ".to_string()),
        tool: "Claude Code".to_string(),
        input_label: "Spec draft".to_string(),
        output_label: "Reviewed spec".to_string(),
        summary: Some("".to_string()),
        tags: Some(vec![" review ".to_string(), "".to_string()]),
    };
}

fn step() -> Step {
    return new_step()
        .normalize()
        .unwrap()
        .into_step("step-1".to_string(), 1, "2025-11-18T09:00:00.000Z".to_string());
}

#[test]
fn it_normalizes_new_steps() -> Result<()> {
    let res = new_step().normalize()?;

    assert_eq!(res.actor, "Coach C");
    assert_eq!(res.skill, None);
    assert_eq!(res.summary, None);
    assert_eq!(res.tags, Some(vec!["review".to_string()]));
    return Ok(());
}

#[test]
fn it_rejects_blank_required_fields() {
    let mut draft = new_step();
    draft.tool = " ".to_string();

    let err = draft.normalize().unwrap_err();
    assert_eq!(
        err.downcast_ref::<WorkflowError>(),
        Some(&WorkflowError::InvalidField {
            field: "tool",
            message: "is required"
        })
    );
    insta::assert_snapshot!(err.to_string(), @"tool: is required");
}

#[test]
fn it_parses_tags() {
    assert_eq!(
        parse_tags("design, review,,  ship "),
        Some(vec![
            "design".to_string(),
            "review".to_string(),
            "ship".to_string()
        ])
    );
    assert_eq!(parse_tags(" , "), None);
    assert_eq!(parse_tags(""), None);
}

#[test]
fn it_serializes_missing_skill_as_null() -> Result<()> {
    let json = serde_json::to_value(step())?;

    assert!(json["skill"].is_null());
    assert!(json.get("summary").is_none());
    assert_eq!(json["tags"], serde_json::json!(["review"]));
    return Ok(());
}

#[test]
fn it_applies_patches() -> Result<()> {
    let mut step = step();
    let patch = StepPatch {
        actor: Some("Coach A".to_string()),
        skill: Some(Some("spec-writer".to_string())),
        summary: Some("Tightened wording".to_string()),
        ..StepPatch::default()
    };
    patch.apply(&mut step)?;

    assert_eq!(step.actor, "Coach A");
    assert_eq!(step.skill, Some("spec-writer".to_string()));
    assert_eq!(step.summary, Some("Tightened wording".to_string()));
    assert_eq!(step.tool, "Claude Code");
    assert_eq!(step.order, 1);
    assert_eq!(step.id, "step-1");

    StepPatch {
        skill: Some(None),
        ..StepPatch::default()
    }
    .apply(&mut step)?;
    assert_eq!(step.skill, None);

    return Ok(());
}

#[test]
fn it_leaves_step_untouched_on_invalid_patch() {
    let mut step = step();
    let original = step.clone();
    let patch = StepPatch {
        actor: Some("Coach A".to_string()),
        output_label: Some("".to_string()),
        ..StepPatch::default()
    };

    assert!(patch.apply(&mut step).is_err());
    assert_eq!(step, original);
}
