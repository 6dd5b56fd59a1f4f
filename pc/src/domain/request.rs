//! Plan request
//!
//! The request is validated once at the boundary; everything downstream reads
//! the same explicit struct.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Mode used when the caller does not supply one
pub const DEFAULT_MODE: &str = "balanced";

/// Service limit on team size; each general task expands into one copy per member
pub const MAX_TEAM_SIZE: u32 = 1000;

/// Reasons a request is rejected before reaching the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("goal must not be empty")]
    EmptyGoal,

    #[error("team_size must be at least 1, got {0}")]
    TeamSizeTooSmall(i64),

    #[error("team_size {value} exceeds the service limit of {max} members")]
    TeamSizeOverLimit { value: i64, max: u32 },
}

/// A validated planning request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    goal: String,
    team_size: u32,
    mode: String,
}

impl PlanRequest {
    /// Validate raw request fields
    ///
    /// `team_size` defaults to 1 and `mode` to "balanced" when absent. The mode
    /// is informational only: all three variants are always produced.
    pub fn new(goal: impl Into<String>, team_size: Option<i64>, mode: Option<String>) -> Result<Self, RequestError> {
        let goal = goal.into();
        debug!(goal_len = goal.len(), ?team_size, ?mode, "PlanRequest::new: called");

        if goal.trim().is_empty() {
            return Err(RequestError::EmptyGoal);
        }

        let team_size = match team_size {
            None => 1,
            Some(value) if value < 1 => return Err(RequestError::TeamSizeTooSmall(value)),
            Some(value) if value > i64::from(MAX_TEAM_SIZE) => {
                return Err(RequestError::TeamSizeOverLimit {
                    value,
                    max: MAX_TEAM_SIZE,
                });
            }
            Some(value) => value as u32,
        };

        Ok(Self {
            goal,
            team_size,
            mode: mode.unwrap_or_else(|| DEFAULT_MODE.to_string()),
        })
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn team_size(&self) -> u32 {
        self.team_size
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// True when work is split across more than one member
    pub fn is_team(&self) -> bool {
        self.team_size > 1
    }
}
