//! Console rendering of the turn transcript

use std::io::{self, Write};

use colored::Colorize;

use crate::agent::TranscriptSink;

/// Streams model text and tool markers to a writer (stdout by default)
pub struct ConsoleTranscript<W: Write = io::Stdout> {
    out: W,
    model: String,
    mid_response: bool,
}

impl ConsoleTranscript {
    pub fn stdout(model: impl Into<String>) -> Self {
        Self::new(io::stdout(), model)
    }
}

impl<W: Write> ConsoleTranscript<W> {
    pub fn new(out: W, model: impl Into<String>) -> Self {
        Self {
            out,
            model: model.into(),
            mid_response: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TranscriptSink for ConsoleTranscript<W> {
    fn text(&mut self, text: &str) {
        if !self.mid_response {
            let _ = write!(self.out, "{} ", format!("{}:", self.model).bright_blue().bold());
            self.mid_response = true;
        }
        let _ = write!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn tool_call(&mut self, name: &str) {
        let _ = writeln!(self.out, "{}", format!("→ {}", name).dimmed());
        let _ = self.out.flush();
    }

    fn response_end(&mut self) {
        if self.mid_response {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.mid_response = false;
        }
    }
}
