//! Domain types for plan generation

mod plan;
mod request;
mod task;
mod variant;

pub use plan::{ModelOutput, NormalizedPlan, PlanResponse, RawPlan, RawVariant};
pub use request::{DEFAULT_MODE, MAX_TEAM_SIZE, PlanRequest, RequestError};
pub use task::{DEFAULT_EST_HOURS, DEFAULT_RISK, DraftTask, MAX_RISK, MIN_RISK, ScheduledTask};
pub use variant::{Variant, VariantKind, Variants};
