//! Plan pipeline
//!
//! Raw model reply in, scheduled plan out:
//! interpret -> resolve -> normalize -> schedule -> dedup, once per variant.
//! Pure apart from logging; the caller supplies `today`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::dedup::resolve_duplicates;
use crate::domain::{PlanRequest, PlanResponse, Variant};
use crate::extract::interpret_response;
use crate::normalize::{normalize, resolve};
use crate::schedule::schedule_tasks;

const PLAN_ID_MODULUS: u64 = 10_000;

/// Turn a model reply into a complete, scheduled plan
///
/// Never fails: malformed replies are recovered by synthesis.
pub fn build_plan(reply: &str, request: &PlanRequest, today: NaiveDate) -> PlanResponse {
    debug!(reply_len = reply.len(), team_size = request.team_size(), %today, "build_plan: called");

    let raw = resolve(interpret_response(reply), request);
    let plan_id = plan_id(raw.balanced_task_count(), request.goal());
    let plan = normalize(raw);
    let team_size = request.team_size();

    let variants = plan.variants.map(|kind, variant| {
        let scheduled = schedule_tasks(&variant.tasks, team_size, today);
        let tasks = resolve_duplicates(scheduled, team_size, today);
        debug!(%kind, task_count = tasks.len(), "build_plan: variant scheduled");
        Variant {
            tasks,
            critical_path: variant.critical_path,
            reasoning: variant.reasoning,
        }
    });

    info!(%plan_id, "build_plan: plan ready");
    PlanResponse {
        plan_id,
        variants,
        summary: plan.summary,
        assumptions: plan.assumptions,
    }
}

/// `plan_{balanced task count}_{goal hash mod 10000}`
pub fn plan_id(balanced_count: usize, goal: &str) -> String {
    let mut hasher = DefaultHasher::new();
    goal.hash(&mut hasher);
    format!("plan_{}_{}", balanced_count, hasher.finish() % PLAN_ID_MODULUS)
}
