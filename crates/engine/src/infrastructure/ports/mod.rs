//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (characters, decisions, catalog)
//! - LLM calls and the two collaborators built on them (narrative, judge)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CatalogRepo, CharacterRepo, DecisionRepo};

pub use types::{JudgeInput, JudgeVerdict, LedgerCommit, ReasoningRequest};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, JudgePort, LlmPort, LlmRequest, LlmResponse, MessageRole,
    NarrativePort, ResponseFormat, TokenUsage,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCatalogRepo, MockCharacterRepo, MockDecisionRepo};

#[cfg(test)]
pub use external::{MockJudgePort, MockLlmPort, MockNarrativePort};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{JudgeError, LlmError, RepoError};
