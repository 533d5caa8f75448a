//! REPL session management

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use super::ConsoleTranscript;
use crate::agent::Agent;
use crate::llm::{Role, StopReason};

const PREVIEW_CHARS: usize = 50;

/// Interactive REPL session
pub struct ReplSession {
    agent: Agent,
}

/// Result of handling a slash command
#[derive(Debug, PartialEq, Eq)]
pub enum SlashResult {
    Continue,
    Quit,
}

impl ReplSession {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Run the REPL main loop until end of input or `/quit`
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", "You:".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - discard the line
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        debug!("ReplSession::run: input ended");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "editagent".bright_cyan().bold());
        println!("Model: {}", self.agent.model());
        println!("Project root: {}", self.agent.context().root().display());
        println!("Tools: {}", self.agent.executor().tool_names().join(", "));
        println!("Type {} for help, {} or Ctrl-D to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    pub fn handle_slash_command(&self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            "/usage" => {
                self.print_usage();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit", "/quit".yellow());
        println!("  {:14} Show conversation history", "/history".yellow());
        println!("  {:14} Show token usage and estimated cost", "/usage".yellow());
        println!();
        println!("{}", "Available Tools:".bright_cyan());
        for definition in self.agent.executor().definitions() {
            let summary = definition.description.lines().next().unwrap_or("");
            println!("  {:14} {}", definition.name.yellow(), summary);
        }
        println!();
    }

    fn print_history(&self) {
        let history = self.agent.history();
        if history.is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }

        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, msg) in history.entries().iter().enumerate() {
            let role = match msg.role {
                Role::User => "user".bright_green(),
                Role::Model => "model".bright_blue(),
            };
            println!("  {}. {}: {}", i + 1, role, entry_preview(msg));
        }
        println!(
            "{}",
            format!(
                "{} user / {} model entries",
                history.count_role(Role::User),
                history.count_role(Role::Model)
            )
            .dimmed()
        );
        println!();
    }

    fn print_usage(&self) {
        let usage = self.agent.usage();
        println!(
            "Tokens: {} in / {} out (cache read {}), estimated cost ${:.4}",
            usage.input_tokens,
            usage.output_tokens,
            usage.cache_read_tokens,
            usage.cost_usd(self.agent.model())
        );
    }

    /// Run one turn; failures are reported and the session keeps going
    async fn process_user_input(&mut self, input: &str) {
        let mut transcript = ConsoleTranscript::stdout(self.agent.model());

        match self.agent.run_turn(input, &mut transcript).await {
            Ok(outcome) => {
                if outcome.stop_reason == Some(StopReason::MaxTokens) {
                    println!("{}", "[Response truncated - max tokens reached]".yellow());
                }
            }
            Err(e) => {
                warn!(error = %e, "ReplSession::process_user_input: turn failed");
                eprintln!("{} {}", "Error:".red(), e);
            }
        }
    }
}

/// One-line summary of a history entry
fn entry_preview(msg: &crate::llm::Message) -> String {
    let calls = msg.tool_calls();
    if !calls.is_empty() {
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        return format!("[tool calls: {}]", names.join(", "));
    }

    let results = msg.tool_result_count();
    if results > 0 {
        return format!("[{} tool results]", results);
    }

    let text = msg.text();
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::ScriptedLlmClient;
    use crate::llm::{ContentBlock, Message};
    use crate::sandbox::PathSandbox;
    use crate::tools::ToolContext;
    use std::sync::Arc;

    fn session() -> (ReplSession, tempfile::TempDir) {
        let root = tempfile::tempdir().unwrap();
        let context = ToolContext::new(PathSandbox::new(root.path()).unwrap());
        let agent = Agent::new(Arc::new(ScriptedLlmClient::new(vec![])), context, "test-model");
        (ReplSession::new(agent), root)
    }

    #[test]
    fn test_slash_commands() {
        let (session, _root) = session();
        assert_eq!(session.handle_slash_command("/quit"), SlashResult::Quit);
        assert_eq!(session.handle_slash_command("/exit"), SlashResult::Quit);
        assert_eq!(session.handle_slash_command("/help"), SlashResult::Continue);
        assert_eq!(session.handle_slash_command("/history"), SlashResult::Continue);
        assert_eq!(session.handle_slash_command("/usage"), SlashResult::Continue);
        assert_eq!(session.handle_slash_command("/bogus"), SlashResult::Continue);
    }

    #[tokio::test]
    async fn test_failed_turn_does_not_end_session() {
        let (mut session, _root) = session();
        session.process_user_input("hello").await;
        assert!(session.agent().history().is_empty());
    }

    #[test]
    fn test_entry_preview() {
        assert_eq!(entry_preview(&Message::user("short")), "short");

        let long = "x".repeat(80);
        assert_eq!(entry_preview(&Message::user(long)), format!("{}...", "x".repeat(50)));

        let calls = Message::model_blocks(vec![ContentBlock::ToolUse {
            id: "t".to_string(),
            name: "read_file".to_string(),
            input: serde_json::json!({}),
        }]);
        assert_eq!(entry_preview(&calls), "[tool calls: read_file]");

        let results = Message::user_blocks(vec![
            ContentBlock::tool_result("a", "{}", false),
            ContentBlock::tool_result("b", "{}", true),
        ]);
        assert_eq!(entry_preview(&results), "[2 tool results]");
    }
}
