//! Financial decision entity operations.

use std::sync::Arc;
use blankwars_domain::{CharacterId, DecisionId, FinancialDecision};

use crate::infrastructure::ports::{DecisionRepo, LedgerCommit, RepoError};

/// Financial decision entity operations.
pub struct Decision {
    repo: Arc<dyn DecisionRepo>,
}

impl Decision {
    pub fn new(repo: Arc<dyn DecisionRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: DecisionId) -> Result<Option<FinancialDecision>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn pending_for(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<FinancialDecision>, RepoError> {
        self.repo.get_pending_for_character(character_id).await
    }

    pub async fn history(
        &self,
        character_id: CharacterId,
        limit: u32,
    ) -> Result<Vec<FinancialDecision>, RepoError> {
        self.repo.list_for_character(character_id, limit).await
    }

    pub async fn insert_pending(&self, decision: &FinancialDecision) -> Result<(), RepoError> {
        self.repo.insert_pending(decision).await
    }

    pub async fn commit(&self, commit: &LedgerCommit) -> Result<(), RepoError> {
        self.repo.commit_resolution(commit).await
    }
}
