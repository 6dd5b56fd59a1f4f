//! Duplicate detection and specialized subtask synthesis
//!
//! Models asked to plan for a team sometimes hand every member the same task.
//! When that happens the scheduled list is thrown away and replaced by a
//! rotating breakdown drawn from a fixed catalog.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::ScheduledTask;
use crate::member::{base_title, member_title};
use crate::schedule::{add_days, duration_days};

/// Generic software-project subtasks, taken in this order
pub const SUBTASK_CATALOG: [&str; 20] = [
    "Design Homepage Layout",
    "Set Up Database Schema",
    "Create User Authentication",
    "Build API Endpoints",
    "Implement Frontend Components",
    "Add Data Validation",
    "Configure Server Environment",
    "Create Wireframes",
    "Design UI Components",
    "Build User Interface",
    "Set Up Deployment Pipeline",
    "Implement Security Features",
    "Create Content Management",
    "Add Search Functionality",
    "Optimize Performance",
    "Write Documentation",
    "Set Up Testing Framework",
    "Configure Analytics",
    "Create Admin Dashboard",
    "Implement Payment System",
];

pub const MIN_SUBTASKS: usize = 6;
pub const MAX_SUBTASKS: usize = 12;
const SUBTASKS_PER_MEMBER: usize = 3;

const MIN_SUBTASK_HOURS: f64 = 2.0;
const MAX_SUBTASK_HOURS: f64 = 8.0;

/// Stand-in sample when there is no original task to borrow from
const SAMPLE_HOURS: f64 = 8.0;
const SAMPLE_RISK: u8 = 3;

/// True when two scheduled tasks share a title once member tags are stripped
pub fn has_duplicates(tasks: &[ScheduledTask]) -> bool {
    let mut seen = HashSet::new();
    tasks.iter().any(|task| !seen.insert(base_title(&task.title)))
}

/// Pass the schedule through, or replace it wholesale if it is degenerate
pub fn resolve_duplicates(tasks: Vec<ScheduledTask>, team_size: u32, today: NaiveDate) -> Vec<ScheduledTask> {
    if team_size <= 1 || !has_duplicates(&tasks) {
        return tasks;
    }

    warn!(
        task_count = tasks.len(),
        %team_size,
        "resolve_duplicates: tasks repeat across members, synthesizing specialized subtasks"
    );
    specialized_tasks(&tasks, team_size, today)
}

/// How many subtasks a team gets: three per member, between six and twelve
pub fn subtask_count(team_size: u32) -> usize {
    (team_size as usize)
        .saturating_mul(SUBTASKS_PER_MEMBER)
        .clamp(MIN_SUBTASKS, MAX_SUBTASKS)
}

/// Build the rotating per-member breakdown
///
/// Subtask `i` goes to member `i mod team + 1` and starts on day `i div team`.
/// Hours and risk are borrowed from the original tasks in rotation. Every
/// subtask after the first phase depends on its slot in the previous phase.
pub fn specialized_tasks(original: &[ScheduledTask], team_size: u32, today: NaiveDate) -> Vec<ScheduledTask> {
    let team = team_size.max(1) as usize;
    let count = subtask_count(team_size);
    debug!(%team_size, %count, original_count = original.len(), "specialized_tasks: called");

    SUBTASK_CATALOG
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, name)| {
            let member = (idx % team) as u32 + 1;
            let (sample_hours, sample_risk) = match original.get(idx % original.len().max(1)) {
                Some(sample) => (sample.est_hours, sample.risk_score),
                None => (SAMPLE_HOURS, SAMPLE_RISK),
            };

            let est_hours = (sample_hours / 2.0).clamp(MIN_SUBTASK_HOURS, MAX_SUBTASK_HOURS);
            let start = add_days(today, (idx / team) as u64);
            let end = add_days(start, duration_days(est_hours));
            let dependencies = if idx >= team {
                vec![format!("t{}", idx - team + 1)]
            } else {
                Vec::new()
            };

            ScheduledTask {
                id: format!("t{}", idx + 1),
                title: member_title(member, name),
                description: format!(
                    "Team Member {} is responsible for {}. This is a specific, focused task that contributes to the overall project goal.",
                    member, name
                ),
                est_hours,
                dependencies,
                risk_score: sample_risk,
                start,
                end,
                team_member: member.to_string(),
                team_size,
            }
        })
        .collect()
}
