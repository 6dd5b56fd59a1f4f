//! Task domain types
//!
//! A `DraftTask` is what the model (or the fallback synthesizer) proposes.
//! A `ScheduledTask` is the same work with a calendar window and an owner.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Hours assumed when the model gives no usable estimate
pub const DEFAULT_EST_HOURS: f64 = 1.0;

/// Risk assumed when the model gives no usable score
pub const DEFAULT_RISK: u8 = 1;

pub const MIN_RISK: u8 = 1;
pub const MAX_RISK: u8 = 5;

/// A task before scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftTask {
    /// Unique within its variant
    pub id: String,
    pub title: String,
    pub description: String,
    /// Always positive
    pub est_hours: f64,
    /// Ids of tasks in the same variant (best effort; may dangle)
    pub dependencies: Vec<String>,
    /// 1-5
    pub risk_score: u8,
}

impl DraftTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>, est_hours: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            est_hours: sanitize_hours(est_hours),
            dependencies: Vec::new(),
            risk_score: DEFAULT_RISK,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_risk(mut self, risk_score: u8) -> Self {
        self.risk_score = risk_score.clamp(MIN_RISK, MAX_RISK);
        self
    }

    /// Decode a task object from model output, field by field
    ///
    /// Never fails: unusable fields fall back to defaults so one bad field
    /// cannot reject a whole plan.
    pub fn from_value(value: &Value) -> Self {
        debug!("DraftTask::from_value: called");
        let id = value
            .get("id")
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(generate_task_id);

        let title = value.get("title").and_then(Value::as_str).unwrap_or_default().to_string();
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let est_hours = value
            .get("est_hours")
            .and_then(number_from_value)
            .map(sanitize_hours)
            .unwrap_or(DEFAULT_EST_HOURS);

        let dependencies = match value.get("dependencies") {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };

        let risk_score = value
            .get("risk_score")
            .and_then(number_from_value)
            .map(|n| n.round().clamp(f64::from(MIN_RISK), f64::from(MAX_RISK)) as u8)
            .unwrap_or(DEFAULT_RISK);

        Self {
            id,
            title,
            description,
            est_hours,
            dependencies,
            risk_score,
        }
    }
}

/// A task placed on the calendar and assigned to a team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub est_hours: f64,
    pub dependencies: Vec<String>,
    pub risk_score: u8,
    pub start: NaiveDate,
    /// Never before `start`
    pub end: NaiveDate,
    /// Member numeral, "1"-based
    pub team_member: String,
    pub team_size: u32,
}

impl ScheduledTask {
    /// Whole days between start and end
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Keep estimates strictly positive and finite
fn sanitize_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        debug!(%hours, "sanitize_hours: unusable estimate, using default");
        DEFAULT_EST_HOURS
    }
}

/// Short random id for tasks the model left unnamed
fn generate_task_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
