//! Task scheduling
//!
//! Places each task of a variant on the calendar from its effort estimate and
//! assigns it to team members. Tasks are walked in order with a date cursor
//! that starts on `today`.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::domain::{DraftTask, ScheduledTask};
use crate::member::{assigned_member, member_title};

/// Working hours in one calendar day
pub const WORK_HOURS_PER_DAY: f64 = 8.0;

/// Upper bound on a single task's duration (about a century)
pub const MAX_DURATION_DAYS: u64 = 36_500;

/// Title suffix some models append to general tasks
const TEAM_SUFFIX: &str = " (Team of";

/// Whole working days for an estimate: ceil(hours / 8), at least one
pub fn duration_days(est_hours: f64) -> u64 {
    let days = (est_hours / WORK_HOURS_PER_DAY).ceil();
    if days.is_nan() || days < 1.0 {
        1
    } else {
        (days as u64).min(MAX_DURATION_DAYS)
    }
}

/// Date `days` after `date`, saturating at the calendar limit
pub(crate) fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Schedule a variant's tasks
///
/// - A title already tagged "Team Member N:" (team > 1) runs at the cursor for
///   member N and does not advance the cursor.
/// - Any other task on a team is copied once per member, each copy with the
///   full estimate and the same window; the cursor then moves past it.
/// - Solo tasks run at the cursor and advance it.
pub fn schedule_tasks(tasks: &[DraftTask], team_size: u32, today: NaiveDate) -> Vec<ScheduledTask> {
    debug!(task_count = tasks.len(), %team_size, %today, "schedule_tasks: called");
    let mut cursor = today;
    let mut scheduled = Vec::with_capacity(tasks.len() * team_size.max(1) as usize);

    for task in tasks {
        let days = duration_days(task.est_hours);
        let end = add_days(cursor, days);

        if team_size > 1
            && let Some(member) = assigned_member(&task.title)
        {
            debug!(id = %task.id, %member, "schedule_tasks: pre-assigned task");
            scheduled.push(place(task, cursor, end, member, team_size));
            continue;
        }

        if team_size > 1 {
            debug!(id = %task.id, "schedule_tasks: splitting task across team");
            let base = strip_team_suffix(&task.title);
            for member in 1..=team_size {
                let mut sibling = place(task, cursor, end, member, team_size);
                sibling.id = format!("{}_{}", task.id, member);
                sibling.title = member_title(member, base);
                sibling.description = format!("Team Member {} is responsible for: {}", member, task.description);
                scheduled.push(sibling);
            }
        } else {
            scheduled.push(place(task, cursor, end, 1, 1));
        }

        cursor = end;
    }

    debug!(scheduled_count = scheduled.len(), "schedule_tasks: done");
    scheduled
}

fn place(task: &DraftTask, start: NaiveDate, end: NaiveDate, member: u32, team_size: u32) -> ScheduledTask {
    ScheduledTask {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        est_hours: task.est_hours,
        dependencies: task.dependencies.clone(),
        risk_score: task.risk_score,
        start,
        end,
        team_member: member.to_string(),
        team_size,
    }
}

/// Cut a trailing " (Team of N)" annotation
fn strip_team_suffix(title: &str) -> &str {
    match title.find(TEAM_SUFFIX) {
        Some(idx) => &title[..idx],
        None => title,
    }
}
