//! Tool registry and dispatch
//!
//! - Catalog: declarative tool list loaded from JSON
//! - Registry: catalog names resolved against built-in implementations
//! - Dispatcher: fail-soft call by name
//! - Retry policy: bounded exponential backoff for remote calls

pub mod dispatcher;
pub mod implementations;
pub mod registry;
pub mod retry;
pub mod types;

pub use dispatcher::ToolsDispatcher;
pub use registry::{ToolCatalog, ToolRegistry};
pub use retry::RetryPolicy;
pub use types::{Tool, ToolSpec};
