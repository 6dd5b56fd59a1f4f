//! Plan normalization
//!
//! Turns whatever the model produced into a plan with all three variants
//! present. Structured replies are patched where they have gaps; text replies
//! are rebuilt from scratch by the fallback synthesizer.

use tracing::{debug, info};

use crate::domain::{
    DraftTask, ModelOutput, NormalizedPlan, PlanRequest, RawPlan, RawVariant, Variant, VariantKind, Variants,
};
use crate::fallback::{aggressive_variant, safe_variant, tasks_from_text};

/// Chars of the reply quoted in recovered reasoning
const REASONING_EXCERPT_CHARS: usize = 100;

/// Fill in missing variants and fields
///
/// A variant that is absent, or present with no recognised fields, becomes the
/// placeholder for its kind. Present variants keep their tasks verbatim.
/// Applying this to its own output changes nothing.
pub fn normalize(plan: RawPlan) -> NormalizedPlan {
    debug!(variant_count = plan.variants.len(), "normalize: called");
    let RawPlan {
        assumptions,
        summary,
        mut variants,
    } = plan;

    let variants = Variants::from_fn(|kind| match variants.remove(kind.name()) {
        Some(raw) if !raw.is_empty() => Variant {
            tasks: raw.tasks.unwrap_or_default(),
            critical_path: raw.critical_path.unwrap_or_default(),
            reasoning: raw.reasoning.unwrap_or_default(),
        },
        _ => {
            debug!(%kind, "normalize: variant missing, using placeholder");
            Variant::placeholder(kind)
        }
    });

    NormalizedPlan {
        assumptions: assumptions.unwrap_or_default(),
        summary: summary.unwrap_or_default(),
        variants,
    }
}

/// Rebuild a complete plan from a reply that carried no JSON
pub fn recover_from_text(text: &str, request: &PlanRequest) -> RawPlan {
    info!(goal = %request.goal(), "recover_from_text: building plan from unstructured reply");
    let excerpt: String = text.chars().take(REASONING_EXCERPT_CHARS).collect();
    let goal = request.goal();

    let balanced = tasks_from_text(text, request);
    let aggressive = aggressive_variant(&balanced);
    let safe = safe_variant(&balanced);

    let mut plan = RawPlan {
        assumptions: Some(format!("AI-generated plan for {}", goal)),
        summary: Some(format!("AI-generated plan for: {}", goal)),
        ..RawPlan::default()
    };

    let recovered = [
        (balanced, format!("AI-generated balanced approach for {}: {}...", goal, excerpt)),
        (aggressive, format!("AI-generated aggressive timeline for {}: {}...", goal, excerpt)),
        (safe, format!("AI-generated safe approach for {}: {}...", goal, excerpt)),
    ];

    for (kind, (tasks, reasoning)) in VariantKind::ALL.into_iter().zip(recovered) {
        plan.variants.insert(kind.name().to_string(), recovered_variant(tasks, reasoning));
    }

    plan
}

/// Resolve a model reply into a raw plan, recovering from text if needed
pub fn resolve(output: ModelOutput, request: &PlanRequest) -> RawPlan {
    match output {
        ModelOutput::Structured(plan) => plan,
        ModelOutput::RawText(text) => recover_from_text(&text, request),
    }
}

fn recovered_variant(tasks: Vec<DraftTask>, reasoning: String) -> RawVariant {
    let critical_path = tasks.iter().map(|t| t.id.clone()).collect();
    RawVariant {
        tasks: Some(tasks),
        critical_path: Some(critical_path),
        reasoning: Some(reasoning),
    }
}
