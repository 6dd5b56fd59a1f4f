//! SmartPlanner - goal in, three scheduled plan variants out
//!
//! CLI entry point: run the HTTP service or generate a single plan.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use plancore::{PlanRequest, PlanResponse};
use smartplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use smartplanner::config::Config;
use smartplanner::llm::create_client;
use smartplanner::planner::PlanService;
use smartplanner::prompts::PromptLoader;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up GEMINI_API_KEY and friends from ./.env before reading config
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "smartplanner loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            println!("{} Serving on http://{}", "✓".green(), bind.cyan());
            smartplanner::serve(&config, &bind).await
        }
        Command::Plan {
            goal,
            team_size,
            mode,
            format,
        } => cmd_plan(&config, goal, team_size, mode, format).await,
    }
}

async fn cmd_plan(config: &Config, goal: String, team_size: i64, mode: String, format: OutputFormat) -> Result<()> {
    let request = PlanRequest::new(goal, Some(team_size), Some(mode))?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptLoader::new(config.prompts.dir.as_deref());
    let planner = Arc::new(PlanService::new(llm, prompts, config.llm.max_tokens));

    let plan = planner.generate(&request).await.context("Plan generation failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print_plan(&plan),
    }
    Ok(())
}

fn print_plan(plan: &PlanResponse) {
    println!("{} {}", "Plan".bold(), plan.plan_id.cyan());
    if !plan.summary.is_empty() {
        println!("{}", plan.summary);
    }
    if !plan.assumptions.is_empty() {
        println!("{} {}", "Assumptions:".dimmed(), plan.assumptions);
    }

    for (kind, variant) in plan.variants.iter() {
        println!();
        println!("{} ({} tasks)", kind.title().bold().yellow(), variant.tasks.len());
        if !variant.reasoning.is_empty() {
            println!("  {}", variant.reasoning.dimmed());
        }
        for task in &variant.tasks {
            let deps = if task.dependencies.is_empty() {
                String::new()
            } else {
                format!(" after {}", task.dependencies.join(", "))
            };
            println!(
                "  {:<6} {} {} -> {}  {:>5.1}h  risk {}  member {}{}",
                task.id.cyan(),
                task.title,
                task.start.to_string().dimmed(),
                task.end.to_string().dimmed(),
                task.est_hours,
                task.risk_score,
                task.team_member,
                deps.dimmed()
            );
        }
        if !variant.critical_path.is_empty() {
            println!("  {} {}", "Critical path:".dimmed(), variant.critical_path.join(" -> "));
        }
    }
}
