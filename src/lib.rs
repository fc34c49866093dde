//! GameBuddy - conversational game recommendations
//!
//! A chat endpoint forwards user text to a remote language model that can call
//! tools mid-conversation, including a semantic search over a local embedding
//! index of the Steam catalog, and answers with five recommended titles.
//!
//! # Architecture
//!
//! - **steamdb**: catalog filtering, document text, embeddings, cache, similarity index
//! - **tools**: tool catalog, registry, fail-soft dispatcher, built-in tools
//! - **agent**: bounded model ↔ tool loop with an explicit state machine
//! - **server**: axum HTTP surface

pub mod agent;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod server;
pub mod steamdb;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use config::ServerConfig;
pub use errors::{AgentError, Result};
