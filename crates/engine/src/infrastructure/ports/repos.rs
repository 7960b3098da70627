//! Repository port traits for database access.

use async_trait::async_trait;
use blankwars_domain::*;

use super::error::RepoError;
use super::types::LedgerCommit;

// =============================================================================
// Database Ports (one per aggregate)
// =============================================================================

/// Character rows as stored. Validation happens in the use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn list_ids(&self) -> Result<Vec<CharacterId>, RepoError>;
    async fn get_finances(
        &self,
        id: CharacterId,
    ) -> Result<Option<RawCharacterFinances>, RepoError>;
    async fn get_profile(&self, id: CharacterId) -> Result<Option<RawCharacterProfile>, RepoError>;
    /// The judge persona assigned to the character's owner.
    async fn get_assigned_judge(
        &self,
        id: CharacterId,
    ) -> Result<Option<RawJudgeProfile>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecisionRepo: Send + Sync {
    async fn get(&self, id: DecisionId) -> Result<Option<FinancialDecision>, RepoError>;
    async fn get_pending_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<FinancialDecision>, RepoError>;
    /// Most recent first.
    async fn list_for_character(
        &self,
        character_id: CharacterId,
        limit: u32,
    ) -> Result<Vec<FinancialDecision>, RepoError>;
    /// Fails with `RepoError::Conflict` when the character already has a pending decision.
    async fn insert_pending(&self, decision: &FinancialDecision) -> Result<(), RepoError>;
    /// Atomically mark the decision resolved and apply every ledger effect.
    ///
    /// Fails with `RepoError::Conflict`, applying nothing, if the decision is
    /// no longer pending.
    async fn commit_resolution(&self, commit: &LedgerCommit) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// A random subject of `kind` priced inside `window`.
    async fn random_in_price_range(
        &self,
        kind: SubjectKind,
        window: PriceWindow,
    ) -> Result<Option<CatalogSubject>, RepoError>;
    /// The cheapest priced subject of either kind.
    async fn cheapest(&self) -> Result<Option<CatalogSubject>, RepoError>;
}
