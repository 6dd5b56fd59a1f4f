//! Plan domain types
//!
//! `ModelOutput` is the single boundary shape for whatever the model replied.
//! `RawPlan` keeps every field optional so gaps stay visible until
//! normalization fills them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::task::{DraftTask, ScheduledTask};
use super::variant::{Variant, VariantKind, Variants};

/// What the model replied, resolved once at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// A JSON object was found and decoded
    Structured(RawPlan),
    /// No usable JSON object; the trimmed reply text
    RawText(String),
}

/// One variant as the model supplied it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawVariant {
    pub tasks: Option<Vec<DraftTask>>,
    pub critical_path: Option<Vec<String>>,
    pub reasoning: Option<String>,
}

impl RawVariant {
    /// A variant with no recognised fields counts as missing
    pub fn is_empty(&self) -> bool {
        self.tasks.is_none() && self.critical_path.is_none() && self.reasoning.is_none()
    }

    fn from_value(value: &Value) -> Self {
        let tasks = value
            .get("tasks")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter(|v| v.is_object()).map(DraftTask::from_value).collect());

        let critical_path = value.get("critical_path").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        });

        let reasoning = value.get("reasoning").and_then(text_field);

        Self {
            tasks,
            critical_path,
            reasoning,
        }
    }
}

/// A plan as decoded from model output, before normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlan {
    pub assumptions: Option<String>,
    pub summary: Option<String>,
    pub variants: BTreeMap<String, RawVariant>,
}

impl RawPlan {
    /// Decode a JSON object leniently; anything other than an object yields None
    pub fn from_value(value: &Value) -> Option<Self> {
        debug!("RawPlan::from_value: called");
        let object = value.as_object()?;

        let variants = object
            .get("variants")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter(|(_, v)| v.is_object())
                    .map(|(name, v)| (name.clone(), RawVariant::from_value(v)))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            assumptions: object.get("assumptions").and_then(text_field),
            summary: object.get("summary").and_then(text_field),
            variants,
        })
    }

    pub fn variant(&self, kind: VariantKind) -> Option<&RawVariant> {
        self.variants.get(kind.name())
    }

    /// Number of balanced tasks the plan arrived with
    pub fn balanced_task_count(&self) -> usize {
        self.variant(VariantKind::Balanced)
            .and_then(|v| v.tasks.as_ref())
            .map_or(0, Vec::len)
    }
}

/// Plan with all three variants present, not yet scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPlan {
    pub assumptions: String,
    pub summary: String,
    pub variants: Variants<DraftTask>,
}

impl From<NormalizedPlan> for RawPlan {
    fn from(plan: NormalizedPlan) -> Self {
        let mut variants = BTreeMap::new();
        for kind in VariantKind::ALL {
            let Variant {
                tasks,
                critical_path,
                reasoning,
            } = plan.variants.get(kind).clone();
            variants.insert(
                kind.name().to_string(),
                RawVariant {
                    tasks: Some(tasks),
                    critical_path: Some(critical_path),
                    reasoning: Some(reasoning),
                },
            );
        }

        Self {
            assumptions: Some(plan.assumptions),
            summary: Some(plan.summary),
            variants,
        }
    }
}

/// Final response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan_id: String,
    pub variants: Variants<ScheduledTask>,
    pub summary: String,
    pub assumptions: String,
}

/// Strings pass through; other non-null values keep their JSON text
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(RawPlan::from_value(&json!([1, 2, 3])).is_none());
        assert!(RawPlan::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_from_value_reads_variants() {
        let plan = RawPlan::from_value(&json!({
            "assumptions": "a",
            "summary": "s",
            "variants": {
                "balanced": {
                    "tasks": [{"id": "t1", "title": "One", "est_hours": 4}],
                    "critical_path": ["t1"],
                    "reasoning": "because"
                },
                "safe": {}
            }
        }))
        .unwrap();

        assert_eq!(plan.assumptions.as_deref(), Some("a"));
        assert_eq!(plan.balanced_task_count(), 1);
        let balanced = plan.variant(VariantKind::Balanced).unwrap();
        assert_eq!(balanced.critical_path.as_deref(), Some(&["t1".to_string()][..]));
        assert!(plan.variant(VariantKind::Safe).unwrap().is_empty());
        assert!(plan.variant(VariantKind::Aggressive).is_none());
    }

    #[test]
    fn test_from_value_skips_non_object_tasks() {
        let plan = RawPlan::from_value(&json!({
            "variants": {"balanced": {"tasks": ["nope", {"id": "t1"}]}}
        }))
        .unwrap();
        assert_eq!(plan.balanced_task_count(), 1);
    }

    #[test]
    fn test_text_field_stringifies_structures() {
        let plan = RawPlan::from_value(&json!({"summary": ["a", "b"], "assumptions": null})).unwrap();
        assert_eq!(plan.summary.as_deref(), Some(r#"["a","b"]"#));
        assert!(plan.assumptions.is_none());
    }
}
