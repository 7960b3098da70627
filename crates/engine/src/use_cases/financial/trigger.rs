//! Should a character face a financial decision this turn?

use std::sync::Arc;

use blankwars_domain::finance::TriggerCheck;
use blankwars_domain::CharacterId;

use crate::entities::{Character, Decision};
use crate::infrastructure::ports::RandomPort;

use super::FinancialDecisionError;

pub struct ShouldTriggerDecision {
    character: Arc<Character>,
    decision: Arc<Decision>,
    random: Arc<dyn RandomPort>,
}

impl ShouldTriggerDecision {
    pub fn new(
        character: Arc<Character>,
        decision: Arc<Decision>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            character,
            decision,
            random,
        }
    }

    /// `false` without rolling while a decision is pending. No side effects.
    pub async fn execute(&self, character_id: CharacterId) -> Result<bool, FinancialDecisionError> {
        if let Some(pending) = self.decision.pending_for(character_id).await? {
            tracing::debug!(
                character_id = %character_id,
                decision_id = %pending.id,
                "Decision already pending, not triggering"
            );
            return Ok(false);
        }

        let state = self.character.financial_state(character_id).await?;
        let roll = roll_d100(self.random.as_ref());
        let check = TriggerCheck::evaluate(&state, roll);

        tracing::debug!(
            character_id = %character_id,
            roll = check.roll,
            threshold = check.probability,
            triggered = check.triggered,
            "Financial decision trigger check"
        );

        Ok(check.triggered)
    }
}

/// Uniform 1-100 roll.
pub(super) fn roll_d100(random: &dyn RandomPort) -> u8 {
    // Clamped range fits in u8
    random.gen_range(1, 100).clamp(1, 100) as u8
}
