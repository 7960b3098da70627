//! Recent decisions for a character.

use std::sync::Arc;

use blankwars_domain::{CharacterId, FinancialDecision};

use crate::entities::Decision;

use super::FinancialDecisionError;

/// Largest page the history query will return.
pub const MAX_HISTORY_LIMIT: u32 = 100;

pub struct DecisionHistory {
    decision: Arc<Decision>,
}

impl DecisionHistory {
    pub fn new(decision: Arc<Decision>) -> Self {
        Self { decision }
    }

    /// Newest first. `limit` is capped at [`MAX_HISTORY_LIMIT`].
    pub async fn execute(
        &self,
        character_id: CharacterId,
        limit: u32,
    ) -> Result<Vec<FinancialDecision>, FinancialDecisionError> {
        if limit == 0 {
            return Err(FinancialDecisionError::Validation(
                "History limit must be at least 1".to_string(),
            ));
        }
        Ok(self
            .decision
            .history(character_id, limit.min(MAX_HISTORY_LIMIT))
            .await?)
    }
}
