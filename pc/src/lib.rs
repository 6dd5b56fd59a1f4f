//! plancore - turns unreliable model replies into scheduled task plans
//!
//! Everything here is synchronous and deterministic given `today`, apart
//! from ids generated for tasks the model left unnamed. The entry point is
//! [`build_plan`].

pub mod dedup;
pub mod domain;
pub mod extract;
pub mod fallback;
pub mod member;
pub mod normalize;
pub mod pipeline;
pub mod schedule;

pub use domain::{
    DraftTask, ModelOutput, NormalizedPlan, PlanRequest, PlanResponse, RawPlan, RawVariant, RequestError,
    ScheduledTask, Variant, VariantKind, Variants,
};
pub use extract::{extract_json, interpret_response};
pub use pipeline::{build_plan, plan_id};
