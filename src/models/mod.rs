//! Remote language model access

pub mod client;

pub use client::ChatClient;

use crate::errors::Result;
use crate::types::ConversationTurn;
use async_trait::async_trait;
use serde_json::Value;

/// One chat-completion round trip.
///
/// Returns the raw response document; interpreting it is the agent's job.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[ConversationTurn]) -> Result<Value>;
}
