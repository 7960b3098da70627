//! Financial decision errors.

use blankwars_domain::DomainError;

use crate::entities::CharacterError;
use crate::infrastructure::ports::{JudgeError, RepoError};

/// Errors that can occur during financial decision operations.
#[derive(Debug, thiserror::Error)]
pub enum FinancialDecisionError {
    /// Incomplete or out-of-range stored data, or a malformed request
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// The decision or character is not in the state the operation needs
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The judge could not produce a usable verdict
    #[error("External service error: {0}")]
    ExternalService(String),
    #[error("Repository error: {0}")]
    Repo(RepoError),
}

impl FinancialDecisionError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<RepoError> for FinancialDecisionError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            RepoError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Repo(other),
        }
    }
}

impl From<DomainError> for FinancialDecisionError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            DomainError::InvalidStateTransition(msg) => Self::Conflict(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<CharacterError> for FinancialDecisionError {
    fn from(error: CharacterError) -> Self {
        match error {
            CharacterError::NotFound(id) => Self::not_found("Character", id),
            CharacterError::NoJudge(id) => Self::not_found("Judge for character", id),
            CharacterError::Invalid(e) => e.into(),
            CharacterError::Repo(e) => e.into(),
        }
    }
}

impl From<JudgeError> for FinancialDecisionError {
    fn from(error: JudgeError) -> Self {
        Self::ExternalService(error.to_string())
    }
}
