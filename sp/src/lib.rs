//! SmartPlanner - goal in, three scheduled plan variants out
//!
//! Wraps the plancore pipeline with a model-service client, prompt
//! templates, configuration, an HTTP service and a CLI.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait with Gemini and OpenAI implementations
//! - [`prompts`] - Handlebars prompt templates
//! - [`planner`] - Prompt, model call and pipeline in one service
//! - [`server`] - axum router and handlers
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod server;

pub use config::{Config, LlmConfig, PromptsConfig, ServerConfig};
pub use llm::{CompletionRequest, CompletionResponse, GeminiClient, LlmClient, LlmError, OpenAIClient, create_client};
pub use planner::{PlanError, PlanService};
pub use prompts::{PromptContext, PromptLoader};
pub use server::{ApiError, AppState, GenerateRequest, router, serve};
