//! Append-only conversation history

use crate::llm::{Message, Role};

/// Ordered record of every committed conversation entry
///
/// Only the orchestrator appends, and only whole turns.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Message>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with the given role
    pub fn count_role(&self, role: Role) -> usize {
        self.entries.iter().filter(|m| m.role == role).count()
    }

    pub(crate) fn commit(&mut self, turn: Vec<Message>) {
        self.entries.extend(turn);
    }
}
