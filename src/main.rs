//! editagent - terminal code-editing agent
//!
//! CLI entry point: logging, configuration, sandbox setup and dispatch.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::filter::Directive;

use editagent::agent::Agent;
use editagent::cli::{Cli, Command, get_log_path};
use editagent::config::Config;
use editagent::llm::create_client;
use editagent::repl::ReplSession;
use editagent::sandbox::PathSandbox;
use editagent::tools::ToolContext;

/// Filter directive for this crate's own events; dependencies stay at their defaults
fn log_directive(debug_mode: bool) -> &'static str {
    if debug_mode { "editagent=debug" } else { "editagent=info" }
}

fn setup_logging(debug_mode: bool) -> Result<()> {
    let directive: Directive = log_directive(debug_mode).parse().context("Invalid log directive")?;
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(directive);

    if debug_mode {
        // Diagnostics go to stderr; stdout carries only the transcript
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        let log_path = get_log_path();
        if let Some(log_dir) = log_path.parent() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }
        let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
    }

    info!(%debug_mode, "Logging initialized");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    info!(
        "editagent loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Models) => cmd_models(&config).await,
        None => cmd_chat(&config, cli.root).await,
    }
}

/// List the provider's models
async fn cmd_models(config: &Config) -> Result<()> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let models = llm.list_models().await.context("Failed to list models")?;

    for model in models {
        println!("{}\t{}", model.id, model.display_name);
    }
    Ok(())
}

/// Interactive chat
async fn cmd_chat(config: &Config, root: Option<PathBuf>) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let sandbox =
        PathSandbox::new(&root).with_context(|| format!("Cannot use {} as project root", root.display()))?;
    info!(root = %sandbox.root().display(), "cmd_chat: sandbox ready");

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;

    let mut agent = Agent::new(llm, ToolContext::new(sandbox), config.llm.model.clone())
        .with_max_tokens(config.llm.max_tokens);
    if let Some(prompt) = &config.agent.system_prompt {
        agent = agent.with_system_prompt(prompt.clone());
    }

    ReplSession::new(agent).run().await
}
