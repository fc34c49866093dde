//! Agent loop
//!
//! State machine, per-request transcript, system contract, reply parser and
//! the loop that ties them to the chat model and tool dispatcher.

pub mod memory;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod state;

pub use memory::ConversationHistory;
pub use orchestrator::{AgentAnswer, AgentLoop, ModelRequester, TOOL_ERROR_MARKER};
pub use parser::parse_directive;
pub use state::{LoopEvent, LoopState};
