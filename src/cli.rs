//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// editagent - terminal code-editing agent
#[derive(Parser)]
#[command(
    name = "editagent",
    about = "Chat with a model that can read, write and list files under a project root",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/editagent/logs/editagent.log (stderr with --debug)"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Model identifier (overrides config)
    #[arg(long, global = true, help = "Model identifier")]
    pub model: Option<String>,

    /// Sandbox root; defaults to the current directory
    #[arg(long, help = "Project root the tools are confined to")]
    pub root: Option<PathBuf>,

    /// Log tool calls, results and sandbox rejections to stderr
    #[arg(long, global = true, help = "Log tool activity to stderr")]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the models available from the provider
    Models,
}

/// Path of the log file used when not in debug mode
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("editagent")
        .join("logs")
        .join("editagent.log")
}
