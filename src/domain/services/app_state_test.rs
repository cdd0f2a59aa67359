use anyhow::Result;

use super::AppState;
use crate::domain::models::InitOutcome;
use crate::domain::models::NewSession;
use crate::domain::models::NewStep;
use crate::domain::models::SessionPatch;
use crate::domain::models::StepPatch;
use crate::domain::models::WorkflowError;
use crate::domain::services::WorkflowStorage;
use crate::infrastructure::seeds::SeedManager;
use crate::infrastructure::storage::memory::MemoryStorage;

const SEED_ID: &str = "2025-11-18-agentos-demo-seed";

async fn app_state(seed: &str) -> (AppState, InitOutcome) {
    let storage = WorkflowStorage::new(Box::<MemoryStorage>::default());
    return AppState::new(storage, &SeedManager::get(seed)).await.unwrap();
}

fn step_draft() -> NewStep {
    return NewStep {
        actor: "Coach B".to_string(),
        tool: "Cursor".to_string(),
        input_label: "Running demo".to_string(),
        output_label: "Polished demo".to_string(),
        ..NewStep::default()
    };
}

#[tokio::test]
async fn it_loads_the_seeded_mirror() {
    let (app_state, outcome) = app_state("embedded").await;

    assert_eq!(outcome, InitOutcome::Seeded(SEED_ID.to_string()));
    assert_eq!(app_state.sessions.len(), 1);
    assert_eq!(app_state.current_session().unwrap().session_id, SEED_ID);
}

#[tokio::test]
async fn it_starts_empty_without_a_seed() {
    let (app_state, outcome) = app_state("none").await;

    assert_eq!(outcome, InitOutcome::Empty);
    assert!(app_state.sessions.is_empty());
    assert!(app_state.current_session().is_none());
}

#[tokio::test]
async fn it_refreshes_after_every_mutation() -> Result<()> {
    let (mut app_state, _) = app_state("embedded").await;

    let session_id = app_state.add_session(NewSession {
        title: "Second".to_string(),
        description: None,
    })?;
    assert_eq!(app_state.sessions[0].session_id, session_id);
    assert_eq!(app_state.current_session_id, Some(session_id.to_string()));

    let step_id = app_state.add_step(&session_id, step_draft())?;
    assert_eq!(app_state.current_session().unwrap().steps.len(), 1);

    app_state.update_step(
        &session_id,
        &step_id,
        StepPatch {
            summary: Some("Recorded a walkthrough".to_string()),
            ..StepPatch::default()
        },
    )?;
    assert_eq!(
        app_state.current_session().unwrap().steps[0].summary,
        Some("Recorded a walkthrough".to_string())
    );

    app_state.update_session(
        &session_id,
        SessionPatch {
            title: Some("Renamed".to_string()),
            description: None,
        },
    )?;
    assert_eq!(app_state.current_session().unwrap().title, "Renamed");

    app_state.delete_step(&session_id, &step_id)?;
    assert!(app_state.current_session().unwrap().steps.is_empty());

    app_state.select_session(Some(SEED_ID))?;
    assert_eq!(app_state.current_session().unwrap().session_id, SEED_ID);

    assert!(app_state.move_step_left(SEED_ID, "step-002")?);
    assert_eq!(
        app_state.session(SEED_ID).unwrap().step("step-002").unwrap().order,
        1
    );

    let copy_id = app_state.duplicate_session(SEED_ID)?;
    assert_eq!(app_state.current_session_id, Some(copy_id.to_string()));
    assert_eq!(app_state.sessions.len(), 3);

    app_state.delete_session(&copy_id)?;
    assert_eq!(app_state.sessions.len(), 2);
    assert!(app_state.current_session().is_some());
    return Ok(());
}

#[tokio::test]
async fn it_resolves_session_prefixes() -> Result<()> {
    let (mut app_state, _) = app_state("embedded").await;

    assert_eq!(app_state.resolve_session_id(None)?, SEED_ID);
    assert_eq!(app_state.resolve_session_id(Some("2025-11"))?, SEED_ID);

    let err = app_state.resolve_session_id(Some("ghost")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<WorkflowError>(),
        Some(&WorkflowError::SessionNotFound("ghost".to_string()))
    );

    app_state.select_session(None)?;
    let err = app_state.resolve_session_id(None).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"No session selected. Pass a session id or select one first");
    return Ok(());
}

#[tokio::test]
async fn it_resolves_step_prefixes() -> Result<()> {
    let (app_state, _) = app_state("embedded").await;

    assert_eq!(app_state.resolve_step_id(SEED_ID, "step-003")?, "step-003");

    let err = app_state.resolve_step_id(SEED_ID, "step-").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Step id 'step-' is ambiguous, it matches 3 steps");

    let err = app_state.resolve_step_id(SEED_ID, "zzz").unwrap_err();
    assert_eq!(
        err.downcast_ref::<WorkflowError>(),
        Some(&WorkflowError::StepNotFound("zzz".to_string()))
    );
    return Ok(());
}
