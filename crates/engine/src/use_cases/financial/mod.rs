//! Financial decision use cases.
//!
//! One decision per character at a time, moving PENDING -> RESOLVED:
//!
//! - [`ShouldTriggerDecision`] - per-turn probability roll
//! - [`GenerateDecisionEvent`] - pick category, subject and amount, persist PENDING
//! - [`ResolveDecision`] - coach response, adherence, judge, atomic ledger commit
//! - [`PollPendingDecision`] - pending decision, or trigger and generate one
//! - [`DecisionHistory`] - recent decisions, newest first

use std::sync::Arc;

mod error;
mod generate;
mod history;
mod locks;
mod poll;
mod resolve;
mod trigger;

pub use error::FinancialDecisionError;
pub use generate::GenerateDecisionEvent;
pub use history::{DecisionHistory, MAX_HISTORY_LIMIT};
pub use locks::{ResolutionGuard, ResolutionLocks};
pub use poll::PollPendingDecision;
pub use resolve::ResolveDecision;
pub use trigger::ShouldTriggerDecision;

/// Container for financial decision use cases.
pub struct FinancialUseCases {
    pub should_trigger: Arc<ShouldTriggerDecision>,
    pub generate: Arc<GenerateDecisionEvent>,
    pub resolve: Arc<ResolveDecision>,
    pub poll: Arc<PollPendingDecision>,
    pub history: Arc<DecisionHistory>,
}

impl FinancialUseCases {
    pub fn new(
        should_trigger: Arc<ShouldTriggerDecision>,
        generate: Arc<GenerateDecisionEvent>,
        resolve: Arc<ResolveDecision>,
        poll: Arc<PollPendingDecision>,
        history: Arc<DecisionHistory>,
    ) -> Self {
        Self {
            should_trigger,
            generate,
            resolve,
            poll,
            history,
        }
    }
}
