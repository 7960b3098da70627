//! Character entity operations.
//!
//! Every read is strict: a missing row is `NotFound`, a missing column is a
//! validation failure. Nothing is defaulted.

use std::sync::Arc;
use blankwars_domain::{
    CharacterFinancialState, CharacterId, CharacterProfile, DomainError, JudgeProfile,
};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error("Character {0} has no assigned judge")]
    NoJudge(CharacterId),
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Character entity operations.
pub struct Character {
    repo: Arc<dyn CharacterRepo>,
}

impl Character {
    pub fn new(repo: Arc<dyn CharacterRepo>) -> Self {
        Self { repo }
    }

    pub async fn list_ids(&self) -> Result<Vec<CharacterId>, RepoError> {
        self.repo.list_ids().await
    }

    pub async fn financial_state(
        &self,
        id: CharacterId,
    ) -> Result<CharacterFinancialState, CharacterError> {
        let raw = self
            .repo
            .get_finances(id)
            .await?
            .ok_or(CharacterError::NotFound(id))?;
        Ok(raw.validate(id)?)
    }

    pub async fn profile(&self, id: CharacterId) -> Result<CharacterProfile, CharacterError> {
        let raw = self
            .repo
            .get_profile(id)
            .await?
            .ok_or(CharacterError::NotFound(id))?;
        Ok(raw.validate(id)?)
    }

    pub async fn assigned_judge(&self, id: CharacterId) -> Result<JudgeProfile, CharacterError> {
        let raw = self
            .repo
            .get_assigned_judge(id)
            .await?
            .ok_or(CharacterError::NoJudge(id))?;
        Ok(raw.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCharacterRepo;
    use blankwars_domain::{JudgeId, RawCharacterFinances, RawJudgeProfile};

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get_finances().returning(|_| Ok(None));

        let character = Character::new(Arc::new(repo));
        let err = character.financial_state(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, CharacterError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_incomplete_row_is_invalid() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get_finances()
            .returning(|_| Ok(Some(RawCharacterFinances::default())));

        let character = Character::new(Arc::new(repo));
        let err = character.financial_state(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, CharacterError::Invalid(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_judge_without_backstory_is_invalid() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get_assigned_judge().returning(|_| {
            Ok(Some(RawJudgeProfile {
                id: JudgeId::new(),
                name: Some("Anubis".to_string()),
                personality_traits: Some(vec![]),
                backstory: None,
            }))
        });

        let character = Character::new(Arc::new(repo));
        let err = character.assigned_judge(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, CharacterError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_unassigned_judge() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get_assigned_judge().returning(|_| Ok(None));

        let character = Character::new(Arc::new(repo));
        let err = character.assigned_judge(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, CharacterError::NoJudge(_)));
    }
}
