//! Interactive REPL
//!
//! Reads one line at a time, hands it to the [`Agent`](crate::agent::Agent)
//! and renders the streamed transcript to the terminal.

mod session;
mod transcript;

pub use session::{ReplSession, SlashResult};
pub use transcript::ConsoleTranscript;
