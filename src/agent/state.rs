//! Agent loop state machine
//!
//! Valid transitions:
//! 1. Start           → AwaitingModel   (on: Begin)
//! 2. AwaitingModel   → Finished        (on: FinalAnswer)
//! 3. AwaitingModel   → ToolCallPending (on: ToolRequested)
//! 4. AwaitingModel   → AwaitingModel   (on: ModelFailed)
//! 5. ToolCallPending → AwaitingModel   (on: ToolDispatched)
//! 6. AwaitingModel   → Exhausted       (on: BudgetExhausted)
//!
//! `Finished` and `Exhausted` are terminal.

use crate::errors::{AgentError, Result};
use serde::{Deserialize, Serialize};

/// Agent loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    /// Transcript not yet seeded
    Start,

    /// Waiting for the next model reply
    AwaitingModel,

    /// A tool call (or an unusable reply) must be dispatched
    ToolCallPending,

    /// Final answer produced (terminal)
    Finished,

    /// Iteration budget spent without an answer (terminal)
    Exhausted,
}

/// Events driving the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    Begin,
    FinalAnswer,
    ToolRequested,
    ModelFailed,
    ToolDispatched,
    BudgetExhausted,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Finished | LoopState::Exhausted)
    }

    /// Apply an event, rejecting anything outside the transition table
    pub fn transition(&self, event: LoopEvent) -> Result<LoopState> {
        use LoopEvent::*;
        use LoopState::*;

        let next = match (self, event) {
            (Start, Begin) => AwaitingModel,
            (AwaitingModel, FinalAnswer) => Finished,
            (AwaitingModel, ToolRequested) => ToolCallPending,
            (AwaitingModel, ModelFailed) => AwaitingModel,
            (AwaitingModel, BudgetExhausted) => Exhausted,
            (ToolCallPending, ToolDispatched) => AwaitingModel,
            (from, event) => {
                return Err(AgentError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                })
            }
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = LoopState::Start.transition(LoopEvent::Begin).unwrap();
        assert_eq!(state, LoopState::AwaitingModel);

        let state = state.transition(LoopEvent::ToolRequested).unwrap();
        assert_eq!(state, LoopState::ToolCallPending);

        let state = state.transition(LoopEvent::ToolDispatched).unwrap();
        let state = state.transition(LoopEvent::FinalAnswer).unwrap();
        assert_eq!(state, LoopState::Finished);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_model_failure_stays_awaiting() {
        assert_eq!(
            LoopState::AwaitingModel.transition(LoopEvent::ModelFailed).unwrap(),
            LoopState::AwaitingModel
        );
    }

    #[test]
    fn test_exhaustion_is_terminal() {
        let state = LoopState::AwaitingModel
            .transition(LoopEvent::BudgetExhausted)
            .unwrap();
        assert!(state.is_terminal());
        assert!(state.transition(LoopEvent::Begin).is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        for (state, event) in [
            (LoopState::Start, LoopEvent::FinalAnswer),
            (LoopState::ToolCallPending, LoopEvent::FinalAnswer),
            (LoopState::Finished, LoopEvent::ToolDispatched),
            (LoopState::AwaitingModel, LoopEvent::Begin),
        ] {
            let err = state.transition(event).unwrap_err();
            assert!(matches!(err, AgentError::InvalidTransition { .. }));
        }
    }
}
