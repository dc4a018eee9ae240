use clap::{Args, Parser, Subcommand};
use mcp_planner_core::ServerOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-planner",
    version,
    about = "Plans and runs MCP tool calls for a natural-language query"
)]
pub struct Cli {
    /// Configuration file (default: config/client.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Disable log output
    #[arg(long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a query by planning and executing tool calls
    Run(RunArgs),
    /// List the tools a server exposes
    Tools(ServerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Server id from the [[servers]] section
    #[arg(long = "mcp-id", alias = "server")]
    pub mcp_id: String,
    /// Override the configured server url
    #[arg(long)]
    pub url: Option<String>,
    /// Extra request header, repeatable
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

impl ServerArgs {
    pub fn overrides(&self) -> ServerOverrides {
        let mut overrides = ServerOverrides {
            url: self.url.clone(),
            ..ServerOverrides::default()
        };
        for (name, value) in &self.headers {
            overrides = overrides.with_header(name, value);
        }
        overrides
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub server: ServerArgs,
    #[arg(long, short)]
    pub query: String,
    /// Read tool responses as a byte stream
    #[arg(long)]
    pub stream: bool,
    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
