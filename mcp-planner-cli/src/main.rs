mod cli;

use clap::Parser;
use cli::{Cli, Command, RunArgs, ServerArgs};
use mcp_planner_core::model::ProviderFactory;
use mcp_planner_core::{AppConfig, InferenceOutcome, McpClient, McpError, ServerRegistry, ToolCatalog};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    debug!(?cli, "CLI arguments parsed");

    if let Err(err) = execute(&cli).await {
        eprintln!("Error: {}", err.user_message());
        debug!(error = %err, "Command failed");
        process::exit(1);
    }
}

async fn execute(cli: &Cli) -> Result<(), McpError> {
    let app_config = AppConfig::load(cli.config.as_deref())?;
    let registry = ServerRegistry::from_config(&app_config);
    info!(servers = ?registry.ids(), "Loaded configuration");

    match &cli.command {
        Command::Run(args) => run(&registry, &app_config, args).await,
        Command::Tools(args) => tools(&registry, &app_config, args).await,
    }
}

fn connect(
    registry: &ServerRegistry,
    app_config: &AppConfig,
    args: &ServerArgs,
) -> Result<McpClient, McpError> {
    let provider = ProviderFactory::create(&app_config.llm);
    registry.client(&args.mcp_id, &args.overrides(), &app_config.llm, provider)
}

async fn run(registry: &ServerRegistry, app_config: &AppConfig, args: &RunArgs) -> Result<(), McpError> {
    let client = connect(registry, app_config, &args.server)?;
    info!(server = client.server_id(), stream = args.stream, "Running agentic inference");
    let outcome = client.run_agentic_inference(&args.query, args.stream).await?;

    if args.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("Failed to encode outcome: {err}"),
        }
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

async fn tools(registry: &ServerRegistry, app_config: &AppConfig, args: &ServerArgs) -> Result<(), McpError> {
    let client = connect(registry, app_config, args)?;
    client.initialize().await?;
    let tools = client.list_tools().await?;
    print!("{}", render_tools(&tools));
    Ok(())
}

fn render_outcome(outcome: &InferenceOutcome) -> String {
    let mut out = format!("=== Final Answer ===\n{}\n\n=== Reasoning Steps ===\n", outcome.answer);
    for step in &outcome.reasoning_steps {
        match &step.error {
            Some(error) => out.push_str(&format!("Step {} ({}): failed: {error}\n", step.id, step.tool)),
            None => out.push_str(&format!("Step {} ({}): {}\n", step.id, step.tool, step.response)),
        }
    }
    out
}

fn render_tools(tools: &ToolCatalog) -> String {
    if tools.is_empty() {
        return "No tools exposed by this server.\n".to_string();
    }
    let mut out = String::new();
    for tool in tools.values() {
        out.push_str(&format!("{}: {}\n", tool.name, tool.description));
        for arg in tool.input_schema.arguments() {
            let requirement = if arg.required { "required" } else { "optional" };
            out.push_str(&format!("    {} ({}, {requirement})\n", arg.name, arg.arg_type));
        }
    }
    out
}

fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
