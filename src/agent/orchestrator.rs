//! Agent loop - drives model replies and tool dispatch to a final answer
//!
//! One `AgentLoop` per user request. It owns its transcript; the model
//! client and dispatcher are shared read-only.

use crate::agent::memory::ConversationHistory;
use crate::agent::parser::{content_text, message_content, parse_directive};
use crate::agent::prompt::system_prompt;
use crate::agent::state::{LoopEvent, LoopState};
use crate::config::DEFAULT_MAX_ITERATIONS;
use crate::errors::{AgentError, Result};
use crate::models::ChatModel;
use crate::tools::ToolsDispatcher;
use crate::types::ModelDirective;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turn appended when a dispatch yields nothing
pub const TOOL_ERROR_MARKER: &str = "Error: mistake in tool description or tool not found";

/// Outcome of one successful loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentAnswer {
    /// Final user-facing text
    pub text: String,

    /// Model calls made, failed ones included
    pub iterations: usize,

    /// Tool dispatches performed
    pub tool_calls: usize,
}

/// Shared factory for per-request agent loops
#[derive(Clone)]
pub struct ModelRequester {
    model: Arc<dyn ChatModel>,
    dispatcher: Arc<ToolsDispatcher>,
    system_prompt: Arc<str>,
    max_iterations: usize,
}

impl ModelRequester {
    pub fn new(model: Arc<dyn ChatModel>, dispatcher: Arc<ToolsDispatcher>) -> Self {
        let prompt = system_prompt(&dispatcher.catalog_json());
        Self {
            model,
            dispatcher,
            system_prompt: prompt.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration budget (at least one)
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Fresh loop with an empty transcript
    pub fn start(&self) -> AgentLoop {
        AgentLoop {
            model: Arc::clone(&self.model),
            dispatcher: Arc::clone(&self.dispatcher),
            system_prompt: Arc::clone(&self.system_prompt),
            max_iterations: self.max_iterations,
            state: LoopState::Start,
            history: ConversationHistory::new(),
            iterations: 0,
            tool_calls: 0,
        }
    }

    /// Answer one user query with a fresh loop
    pub async fn answer(&self, text: &str) -> Result<AgentAnswer> {
        self.start().run(text).await
    }
}

/// Bounded model ↔ tool loop for one request
pub struct AgentLoop {
    model: Arc<dyn ChatModel>,
    dispatcher: Arc<ToolsDispatcher>,
    system_prompt: Arc<str>,
    max_iterations: usize,
    state: LoopState,
    history: ConversationHistory,
    iterations: usize,
    tool_calls: usize,
}

impl AgentLoop {
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn tool_calls(&self) -> usize {
        self.tool_calls
    }

    fn advance(&mut self, event: LoopEvent) -> Result<()> {
        let next = self.state.transition(event)?;
        debug!(from = ?self.state, to = ?next, event = ?event, "Agent state transition");
        self.state = next;
        Ok(())
    }

    /// Run until a final answer or until the budget is spent
    pub async fn run(&mut self, text: &str) -> Result<AgentAnswer> {
        self.advance(LoopEvent::Begin)?;
        self.history.push_system(self.system_prompt.to_string());
        self.history.push_user(text);

        while self.iterations < self.max_iterations {
            self.iterations += 1;

            let response = match self.model.complete(self.history.turns()).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(iteration = self.iterations, error = %e, "Model call failed");
                    self.advance(LoopEvent::ModelFailed)?;
                    continue;
                }
            };

            let Some(content) = message_content(&response) else {
                warn!(iteration = self.iterations, "Model reply has no message content");
                self.advance(LoopEvent::ModelFailed)?;
                continue;
            };
            self.history.push_assistant(content_text(content));

            let result = match parse_directive(&response) {
                ModelDirective::FinalAnswer { text } => {
                    self.advance(LoopEvent::FinalAnswer)?;
                    info!(
                        iterations = self.iterations,
                        tool_calls = self.tool_calls,
                        "Agent produced final answer"
                    );
                    return Ok(AgentAnswer {
                        text,
                        iterations: self.iterations,
                        tool_calls: self.tool_calls,
                    });
                }
                ModelDirective::ToolCall {
                    function,
                    arguments,
                } => {
                    self.advance(LoopEvent::ToolRequested)?;
                    self.dispatcher.call(&function, &arguments).await
                }
                ModelDirective::Invalid(value) => {
                    warn!(iteration = self.iterations, "Model reply is not a valid directive");
                    self.advance(LoopEvent::ToolRequested)?;
                    self.dispatcher.parse_and_call(&value).await
                }
            };

            self.tool_calls += 1;
            self.history.push_user(tool_turn(&result));
            self.advance(LoopEvent::ToolDispatched)?;
        }

        self.advance(LoopEvent::BudgetExhausted)?;
        warn!(iterations = self.iterations, "Agent iteration budget exhausted");
        Err(AgentError::AgentBudgetExceeded {
            iterations: self.iterations,
        })
    }
}

/// Transcript text for a dispatch result
fn tool_turn(result: &Map<String, Value>) -> String {
    if result.is_empty() {
        return TOOL_ERROR_MARKER.to_string();
    }
    serde_json::to_string(result).unwrap_or_else(|_| TOOL_ERROR_MARKER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolCatalog, ToolRegistry};
    use crate::types::{ConversationTurn, Role};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<Vec<Result<Value>>>,
    }

    impl Scripted {
        fn new(mut replies: Vec<Result<Value>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl ChatModel for Scripted {
        async fn complete(&self, _messages: &[ConversationTurn]) -> Result<Value> {
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(AgentError::ModelServiceError("script ended".into())))
        }
    }

    fn reply(content: &str) -> Result<Value> {
        Ok(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
    }

    fn requester(replies: Vec<Result<Value>>) -> ModelRequester {
        let catalog = ToolCatalog::from_value(json!([])).unwrap();
        let dispatcher = ToolsDispatcher::new(catalog.clone(), ToolRegistry::resolve(&catalog, vec![]));
        ModelRequester::new(Arc::new(Scripted::new(replies)), Arc::new(dispatcher))
    }

    #[tokio::test]
    async fn test_model_failure_consumes_iteration() {
        let requester = requester(vec![
            Err(AgentError::ModelServiceError("502".into())),
            Ok(json!({"error": "overloaded"})),
            reply("{\"text\": \"A, B, C, D, E\"}"),
        ]);
        let mut agent = requester.start();
        let answer = agent.run("cozy farming").await.unwrap();

        assert_eq!(answer.text, "A, B, C, D, E");
        assert_eq!(answer.iterations, 3);
        assert_eq!(answer.tool_calls, 0);
        // system, user, final assistant only
        assert_eq!(agent.history().len(), 3);
        assert_eq!(agent.state(), LoopState::Finished);
    }

    #[tokio::test]
    async fn test_unknown_tool_appends_error_marker() {
        let requester = requester(vec![
            reply("{\"function\": \"missing_tool\", \"arguments\": {}}"),
            reply("not json"),
            reply("{\"text\": \"done\"}"),
        ]);
        let mut agent = requester.start();
        agent.run("q").await.unwrap();

        let markers = agent
            .history()
            .turns()
            .iter()
            .filter(|t| t.role == Role::User && t.content == TOOL_ERROR_MARKER)
            .count();
        assert_eq!(markers, 2);
        assert_eq!(agent.tool_calls(), 2);
    }

    #[tokio::test]
    async fn test_loop_cannot_be_reused() {
        let requester = requester(vec![reply("{\"text\": \"x\"}")]);
        let mut agent = requester.start();
        agent.run("q").await.unwrap();
        assert!(matches!(
            agent.run("again").await,
            Err(AgentError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_budget_override() {
        let requester = requester(vec![]).with_max_iterations(3);
        let err = requester.answer("q").await.unwrap_err();
        assert!(matches!(err, AgentError::AgentBudgetExceeded { iterations: 3 }));
    }

    #[test]
    fn test_tool_turn_rendering() {
        let mut result = Map::new();
        result.insert("result".to_string(), json!(["A", "B"]));
        assert_eq!(tool_turn(&result), "{\"result\":[\"A\",\"B\"]}");
        assert_eq!(tool_turn(&Map::new()), TOOL_ERROR_MARKER);
    }
}
