//! Per-turn entry point: the pending decision, or a freshly triggered one.

use std::sync::Arc;

use blankwars_domain::{CharacterId, FinancialDecision};

use crate::entities::Decision;

use super::{FinancialDecisionError, GenerateDecisionEvent, ShouldTriggerDecision};

pub struct PollPendingDecision {
    decision: Arc<Decision>,
    should_trigger: Arc<ShouldTriggerDecision>,
    generate: Arc<GenerateDecisionEvent>,
}

impl PollPendingDecision {
    pub fn new(
        decision: Arc<Decision>,
        should_trigger: Arc<ShouldTriggerDecision>,
        generate: Arc<GenerateDecisionEvent>,
    ) -> Self {
        Self {
            decision,
            should_trigger,
            generate,
        }
    }

    /// `None` when nothing is pending and the trigger roll did not fire.
    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<FinancialDecision>, FinancialDecisionError> {
        if let Some(pending) = self.decision.pending_for(character_id).await? {
            return Ok(Some(pending));
        }

        if !self.should_trigger.execute(character_id).await? {
            return Ok(None);
        }

        self.generate.execute(character_id).await.map(Some)
    }
}
