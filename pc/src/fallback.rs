//! Fallback plan synthesis
//!
//! Builds task lists when the model reply held no usable JSON: first from
//! list items found in the text, otherwise from a fixed generic breakdown.
//! Also derives the aggressive and safe variants from a balanced list.

use tracing::debug;

use crate::domain::{DraftTask, MAX_RISK, MIN_RISK, PlanRequest};
use crate::extract::{derive_title, extract_candidate_lines};

/// No synthesized or team-scaled estimate drops below this
pub const MIN_TASK_HOURS: f64 = 2.0;

/// Aggressive variant keeps only this many leading tasks
pub const AGGRESSIVE_TASK_LIMIT: usize = 4;

const AGGRESSIVE_HOURS_FACTOR: f64 = 0.7;
const SAFE_HOURS_FACTOR: f64 = 1.3;

/// Generic breakdown: title, hours, risk, description template
const GENERIC_TASKS: [(&str, f64, u8, &str); 4] = [
    (
        "Goal Analysis",
        4.0,
        2,
        "Conduct thorough analysis of requirements and constraints for '{goal}'. Define scope, objectives, and success criteria.",
    ),
    (
        "Planning & Preparation",
        6.0,
        2,
        "Create comprehensive project plan with timelines, resources, and deliverables for '{goal}'. Gather necessary materials and tools.",
    ),
    (
        "Implementation",
        8.0,
        3,
        "Execute the core activities and deliverables for '{goal}'. Apply best practices and maintain quality standards throughout the process.",
    ),
    (
        "Review & Delivery",
        4.0,
        2,
        "Conduct final review, testing, and quality assurance for '{goal}'. Prepare deliverables and ensure all requirements are met.",
    ),
];

/// Task list recovered from unstructured text
///
/// Uses list items found in the text when there are any, the generic
/// breakdown otherwise. Never empty.
pub fn tasks_from_text(text: &str, request: &PlanRequest) -> Vec<DraftTask> {
    debug!(text_len = text.len(), team_size = request.team_size(), "tasks_from_text: called");
    let lines = extract_candidate_lines(text);

    if lines.is_empty() {
        debug!("tasks_from_text: no candidate lines, using generic tasks");
        return fallback_tasks(request);
    }

    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let n = idx + 1;
            let base_hours = (8.0 - n as f64 * 1.5).max(4.0);
            DraftTask::new(chain_id(idx), derive_title(line), scale_hours(base_hours, request.team_size()))
                .with_description(describe_line(line, request.goal()))
                .with_dependencies(chain_dependencies(idx))
                .with_risk(2 + (n % 3) as u8)
        })
        .collect()
}

/// The fixed four-step generic plan, scaled to the team
pub fn fallback_tasks(request: &PlanRequest) -> Vec<DraftTask> {
    debug!(team_size = request.team_size(), "fallback_tasks: called");
    GENERIC_TASKS
        .iter()
        .enumerate()
        .map(|(idx, (title, hours, risk, description))| {
            DraftTask::new(chain_id(idx), *title, scale_hours(*hours, request.team_size()))
                .with_description(description.replace("{goal}", request.goal()))
                .with_dependencies(chain_dependencies(idx))
                .with_risk(*risk)
        })
        .collect()
}

/// Faster, riskier variant: first four tasks, 70% hours, risk +1
///
/// Tasks past the fourth are dropped.
pub fn aggressive_variant(tasks: &[DraftTask]) -> Vec<DraftTask> {
    tasks
        .iter()
        .take(AGGRESSIVE_TASK_LIMIT)
        .enumerate()
        .map(|(idx, task)| DraftTask {
            id: chain_id(idx),
            dependencies: chain_dependencies(idx),
            est_hours: (task.est_hours * AGGRESSIVE_HOURS_FACTOR).max(MIN_TASK_HOURS),
            risk_score: (task.risk_score + 1).min(MAX_RISK),
            ..task.clone()
        })
        .collect()
}

/// Slower, safer variant: all tasks, 130% hours, risk -1
pub fn safe_variant(tasks: &[DraftTask]) -> Vec<DraftTask> {
    tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| DraftTask {
            id: chain_id(idx),
            dependencies: chain_dependencies(idx),
            est_hours: task.est_hours * SAFE_HOURS_FACTOR,
            risk_score: task.risk_score.saturating_sub(1).max(MIN_RISK),
            ..task.clone()
        })
        .collect()
}

/// Split hours across the team, never below the minimum
fn scale_hours(hours: f64, team_size: u32) -> f64 {
    if team_size > 1 {
        (hours / f64::from(team_size)).max(MIN_TASK_HOURS)
    } else {
        hours.max(MIN_TASK_HOURS)
    }
}

fn chain_id(idx: usize) -> String {
    format!("t{}", idx + 1)
}

/// Linear chain: each task depends on the one before it
fn chain_dependencies(idx: usize) -> Vec<String> {
    if idx == 0 { Vec::new() } else { vec![format!("t{}", idx)] }
}

fn describe_line(line: &str, goal: &str) -> String {
    let mut description = format!("Detailed implementation of: {}", line.trim());
    let goal_lower = goal.to_lowercase();

    if goal_lower.contains("learn") || goal_lower.contains("study") {
        description.push_str(&format!(
            ". This involves comprehensive study and practice to master the concepts for {}.",
            goal
        ));
    } else if goal_lower.contains("build") || goal_lower.contains("create") {
        description.push_str(&format!(
            ". This involves hands-on development and implementation for {}.",
            goal
        ));
    } else if goal_lower.contains("organize") || goal_lower.contains("plan") {
        description.push_str(&format!(". This involves coordination and logistics for {}.", goal));
    }

    description
}
