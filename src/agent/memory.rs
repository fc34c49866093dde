//! Per-request conversation transcript

use crate::types::{ConversationTurn, Role};

/// Ordered, append-only list of turns owned by one agent loop
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::system(content));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ConversationTurn::assistant(content));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Number of turns spoken by `role`
    pub fn count_role(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn into_turns(self) -> Vec<ConversationTurn> {
        self.turns
    }
}
