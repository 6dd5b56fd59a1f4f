//! Plan generation service
//!
//! Renders the planning prompt, asks the model once, and hands the reply to
//! the plancore pipeline.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

use plancore::{PlanRequest, PlanResponse, build_plan};

use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::prompts::PromptLoader;

/// Failures that stop a plan from being generated
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Generates plans for validated requests
pub struct PlanService {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl PlanService {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        debug!(%max_tokens, "PlanService::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Generate a plan scheduled from today
    pub async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError> {
        self.generate_on(request, Local::now().date_naive()).await
    }

    /// Generate a plan scheduled from the given day
    pub async fn generate_on(&self, request: &PlanRequest, today: NaiveDate) -> Result<PlanResponse, PlanError> {
        info!(goal = %request.goal(), team_size = request.team_size(), mode = %request.mode(), "generate: planning");

        let prompt = self
            .prompts
            .plan_prompt(request)
            .map_err(|e| PlanError::Prompt(e.to_string()))?;

        let response = match self.llm.complete(CompletionRequest::user_prompt(prompt, self.max_tokens)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(status = ?e.status(), error = %e, "generate: model call failed");
                return Err(e.into());
            }
        };
        info!(
            stop_reason = ?response.stop_reason,
            tokens = response.usage.total(),
            "generate: model replied"
        );

        let text = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("model returned no text".to_string()))?;

        let plan = build_plan(&text, request, today);
        info!(
            plan_id = %plan.plan_id,
            balanced = plan.variants.balanced.tasks.len(),
            aggressive = plan.variants.aggressive.tasks.len(),
            safe = plan.variants.safe.tasks.len(),
            "generate: plan ready"
        );
        Ok(plan)
    }
}
