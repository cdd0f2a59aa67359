use test_utils::seed_session_json;

use super::format_date;
use super::format_session_line;
use super::render_flow_map;
use super::render_session;
use super::render_step_detail;
use crate::domain::models::Session;

fn seed_session() -> Session {
    return serde_json::from_str(seed_session_json()).unwrap();
}

#[test]
fn it_formats_dates_in_utc() {
    assert_eq!(format_date("2025-11-18T11:30:00+02:00"), "2025-11-18 09:30");
    assert_eq!(format_date("last tuesday"), "last tuesday");
}

#[test]
fn it_formats_session_lines() {
    let mut session = seed_session();
    insta::assert_snapshot!(
        format_session_line(&session, true),
        @"* (ID: 2025-11-18-agentos-demo-seed) AgentOS demo seed, 2025-11-18 09:00, 3 steps"
    );

    session.steps.truncate(1);
    insta::assert_snapshot!(
        format_session_line(&session, false),
        @"- (ID: 2025-11-18-agentos-demo-seed) AgentOS demo seed, 2025-11-18 09:00, 1 step"
    );
}

#[test]
fn it_renders_steps_in_order() {
    let mut session = seed_session();
    session.steps.reverse();

    insta::assert_snapshot!(
        render_flow_map(&session),
        @"[1] Coach C (Claude Code) → [2] Coach A (ChatGPT) → [3] Replit (Replit)"
    );
}

#[test]
fn it_renders_empty_sessions() {
    let mut session = seed_session();
    session.steps.clear();
    session.description = None;

    insta::assert_snapshot!(render_session(&session), @r###"
    AgentOS demo seed
    Created 2025-11-18 09:00 · 0 steps

    No steps yet.
    "###);
}

#[test]
fn it_renders_sessions() {
    insta::assert_snapshot!(render_session(&seed_session()), @r###"
    AgentOS demo seed
    Spec to shipped demo, passed between two coaches and a hosted runtime.
    Created 2025-11-18 09:00 · 3 steps

    [1] Coach C (Claude Code) → [2] Coach A (ChatGPT) → [3] Replit (Replit)
    "###);
}

#[test]
fn it_renders_full_step_details() {
    insta::assert_snapshot!(render_step_detail(&seed_session().steps[0]), @r###"
    Step 1 · Coach C
    Tool:    Claude Code
    Skill:   spec-writer
    Input:   Product brief
    Output:  Draft spec
    Summary: Turned the product brief into a first draft of the spec.
    Tags:    spec, draft
    Time:    2025-11-18 09:05
    ID:      step-001
    "###);
}

#[test]
fn it_skips_missing_step_details() {
    insta::assert_snapshot!(render_step_detail(&seed_session().steps[2]), @r###"
    Step 3 · Replit
    Tool:    Replit
    Input:   Reviewed spec
    Output:  Running demo
    Time:    2025-11-18 10:15
    ID:      step-003
    "###);
}
