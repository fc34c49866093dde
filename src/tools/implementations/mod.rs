//! Built-in tool implementations
//!
//! Registration is an explicit table; the tool catalog decides which of these
//! the model gets to see.

pub mod example;
pub mod steam_search;

pub use example::ExampleTool;
pub use steam_search::{GameSummary, SteamDescriptionSearchTool, SteamStoreSearchTool};

use crate::errors::Result;
use crate::steamdb::SteamDbManager;
use crate::tools::types::Tool;
use std::sync::Arc;
use std::time::Duration;

/// Every built-in tool, wired to its dependencies
pub fn builtin(
    steamdb: Arc<SteamDbManager>,
    steam_store_url: &str,
    timeout: Duration,
) -> Result<Vec<Arc<dyn Tool>>> {
    Ok(vec![
        Arc::new(ExampleTool),
        Arc::new(SteamStoreSearchTool::new(steam_store_url, timeout)?),
        Arc::new(SteamDescriptionSearchTool::new(steamdb)),
    ])
}
