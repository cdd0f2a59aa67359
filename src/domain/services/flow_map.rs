#[cfg(test)]
#[path = "flow_map_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::models::Session;
use crate::domain::models::Step;

/// Formats an RFC 3339 timestamp as UTC minutes. Anything unparseable is
/// shown as-is.
pub fn format_date(timestamp: &str) -> String {
    return match DateTime::parse_from_rfc3339(timestamp) {
        Ok(date) => date.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    };
}

fn format_step_count(count: usize) -> String {
    if count == 1 {
        return "1 step".to_string();
    }

    return format!("{count} steps");
}

pub fn format_session_line(session: &Session, is_current: bool) -> String {
    let marker = if is_current { "*" } else { "-" };

    return format!(
        "{marker} (ID: {}) {}, {}, {}",
        session.session_id,
        session.title,
        format_date(&session.created_at),
        format_step_count(session.steps.len())
    );
}

/// Steps in order, left to right.
pub fn render_flow_map(session: &Session) -> String {
    if session.steps.is_empty() {
        return "No steps yet.".to_string();
    }

    return session
        .sorted_steps()
        .iter()
        .map(|step| return format!("[{}] {} ({})", step.order, step.actor, step.tool))
        .collect::<Vec<String>>()
        .join(" → ");
}

pub fn render_session(session: &Session) -> String {
    let mut lines = vec![session.title.to_string()];
    if let Some(description) = &session.description {
        lines.push(description.to_string());
    }
    lines.push(format!(
        "Created {} · {}",
        format_date(&session.created_at),
        format_step_count(session.steps.len())
    ));
    lines.push("".to_string());
    lines.push(render_flow_map(session));

    return lines.join("\n");
}

pub fn render_step_detail(step: &Step) -> String {
    let mut lines = vec![
        format!("Step {} · {}", step.order, step.actor),
        format!("Tool:    {}", step.tool),
    ];

    if let Some(skill) = &step.skill {
        lines.push(format!("Skill:   {skill}"));
    }
    lines.push(format!("Input:   {}", step.input_label));
    lines.push(format!("Output:  {}", step.output_label));
    if let Some(summary) = &step.summary {
        lines.push(format!("Summary: {summary}"));
    }
    if let Some(tags) = &step.tags {
        lines.push(format!("Tags:    {}", tags.join(", ")));
    }
    lines.push(format!("Time:    {}", format_date(&step.timestamp)));
    lines.push(format!("ID:      {}", step.id));

    return lines.join("\n");
}
