//! Character records the decision engine reads
//!
//! Three views of a character, each with a raw (as stored) and a validated form:
//!
//! - [`CharacterFinancialState`] - wallet, debt, stress, adherence, trust, experience
//!   and the embedded [`FinancialPersonality`]
//! - [`CharacterProfile`] - name, traits and money beliefs for narrative prompts
//! - [`JudgeProfile`] - the judge persona assigned to the character's owner
//!
//! The engine only ever works with the validated forms. Validation is strict:
//! the first missing field aborts with [`DomainError::Validation`].

use serde::{Deserialize, Serialize};

use crate::value_objects::financial_personality::score;
use crate::{CharacterId, DomainError, FinancialPersonality, JudgeId, RawFinancialPersonality};

/// Validated financial state of one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterFinancialState {
    pub character_id: CharacterId,
    /// Whole currency units, never negative
    pub wallet: i64,
    /// Whole currency units, never negative
    pub debt: i64,
    pub financial_stress: u8,
    /// Base compliance disposition, 0-100
    pub gameplan_adherence: u8,
    pub coach_trust: u8,
    pub experience: i64,
    pub personality: FinancialPersonality,
}

/// Financial state as stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCharacterFinances {
    pub wallet: Option<i64>,
    pub debt: Option<i64>,
    pub financial_stress: Option<i64>,
    pub gameplan_adherence: Option<i64>,
    pub coach_trust: Option<i64>,
    pub experience: Option<i64>,
    pub personality: Option<RawFinancialPersonality>,
}

impl RawCharacterFinances {
    pub fn validate(
        self,
        character_id: CharacterId,
    ) -> Result<CharacterFinancialState, DomainError> {
        let owner = format!("Character {}", character_id);

        let wallet = non_negative(&owner, "wallet", self.wallet)?;
        let debt = non_negative(&owner, "debt", self.debt)?;
        let financial_stress = score(&owner, "financial_stress", self.financial_stress)?;
        let gameplan_adherence = score(&owner, "gameplan_adherence", self.gameplan_adherence)?;
        let coach_trust = score(&owner, "coach_trust", self.coach_trust)?;
        let experience = non_negative(&owner, "experience", self.experience)?;
        let personality = self
            .personality
            .ok_or_else(|| DomainError::missing_field(&owner, "financial_personality"))?
            .validate(&owner)?;

        Ok(CharacterFinancialState {
            character_id,
            wallet,
            debt,
            financial_stress,
            gameplan_adherence,
            coach_trust,
            experience,
            personality,
        })
    }
}

fn non_negative(owner: &str, field: &str, value: Option<i64>) -> Result<i64, DomainError> {
    let value = value.ok_or_else(|| DomainError::missing_field(owner, field))?;
    if value < 0 {
        return Err(DomainError::validation(format!(
            "{} has negative {}: {}",
            owner, field, value
        )));
    }
    Ok(value)
}

/// Who the character is, for in-character reasoning and judge context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub character_id: CharacterId,
    pub name: String,
    pub personality_traits: Vec<String>,
    pub money_beliefs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCharacterProfile {
    pub name: Option<String>,
    pub personality_traits: Option<Vec<String>>,
    pub money_beliefs: Option<Vec<String>>,
}

impl RawCharacterProfile {
    pub fn validate(self, character_id: CharacterId) -> Result<CharacterProfile, DomainError> {
        let owner = format!("Character {}", character_id);
        Ok(CharacterProfile {
            character_id,
            name: required_text(&owner, "name", self.name)?,
            personality_traits: self
                .personality_traits
                .ok_or_else(|| DomainError::missing_field(&owner, "personality_traits"))?,
            money_beliefs: self
                .money_beliefs
                .ok_or_else(|| DomainError::missing_field(&owner, "money_beliefs"))?,
        })
    }
}

/// Judge persona assigned to the character's owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeProfile {
    pub id: JudgeId,
    pub name: String,
    pub personality_traits: Vec<String>,
    pub backstory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawJudgeProfile {
    pub id: JudgeId,
    pub name: Option<String>,
    pub personality_traits: Option<Vec<String>>,
    pub backstory: Option<String>,
}

impl RawJudgeProfile {
    pub fn validate(self) -> Result<JudgeProfile, DomainError> {
        let owner = format!("Judge {}", self.id);
        Ok(JudgeProfile {
            id: self.id,
            name: required_text(&owner, "name", self.name)?,
            personality_traits: self
                .personality_traits
                .ok_or_else(|| DomainError::missing_field(&owner, "personality_traits"))?,
            backstory: required_text(&owner, "backstory", self.backstory)?,
        })
    }
}

fn required_text(owner: &str, field: &str, value: Option<String>) -> Result<String, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::missing_field(owner, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpendingStyle;

    fn complete_finances() -> RawCharacterFinances {
        RawCharacterFinances {
            wallet: Some(500),
            debt: Some(0),
            financial_stress: Some(40),
            gameplan_adherence: Some(50),
            coach_trust: Some(60),
            experience: Some(1200),
            personality: Some(RawFinancialPersonality {
                spending_style: Some("moderate".to_string()),
                financial_wisdom: Some(50),
                risk_tolerance: Some(50),
                luxury_desire: Some(80),
                generosity: Some(50),
            }),
        }
    }

    #[test]
    fn test_complete_finances_validate() {
        let id = CharacterId::new();
        let state = complete_finances().validate(id).expect("valid");
        assert_eq!(state.character_id, id);
        assert_eq!(state.wallet, 500);
        assert_eq!(state.gameplan_adherence, 50);
        assert_eq!(state.personality.spending_style, SpendingStyle::Moderate);
    }

    #[test]
    fn test_missing_wallet_is_fatal() {
        let raw = RawCharacterFinances {
            wallet: None,
            ..complete_finances()
        };
        let err = raw.validate(CharacterId::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("missing wallet"));
    }

    #[test]
    fn test_missing_personality_is_fatal() {
        let raw = RawCharacterFinances {
            personality: None,
            ..complete_finances()
        };
        let err = raw.validate(CharacterId::new()).unwrap_err();
        assert!(err.to_string().contains("missing financial_personality"));
    }

    #[test]
    fn test_missing_nested_personality_field_is_fatal() {
        let mut raw = complete_finances();
        if let Some(p) = raw.personality.as_mut() {
            p.risk_tolerance = None;
        }
        let err = raw.validate(CharacterId::new()).unwrap_err();
        assert!(err.to_string().contains("financial_personality.risk_tolerance"));
    }

    #[test]
    fn test_negative_debt_rejected() {
        let raw = RawCharacterFinances {
            debt: Some(-1),
            ..complete_finances()
        };
        assert!(raw.validate(CharacterId::new()).is_err());
    }

    #[test]
    fn test_profile_requires_name_and_beliefs() {
        let id = CharacterId::new();
        let raw = RawCharacterProfile {
            name: Some("  ".to_string()),
            personality_traits: Some(vec!["bold".to_string()]),
            money_beliefs: Some(vec![]),
        };
        assert!(raw.validate(id).unwrap_err().to_string().contains("missing name"));

        let raw = RawCharacterProfile {
            name: Some("Achilles".to_string()),
            personality_traits: Some(vec!["bold".to_string()]),
            money_beliefs: None,
        };
        assert!(raw
            .validate(id)
            .unwrap_err()
            .to_string()
            .contains("missing money_beliefs"));
    }

    #[test]
    fn test_judge_requires_backstory() {
        let raw = RawJudgeProfile {
            id: JudgeId::new(),
            name: Some("Judge Solomon".to_string()),
            personality_traits: Some(vec!["wise".to_string()]),
            backstory: None,
        };
        assert!(raw.validate().unwrap_err().to_string().contains("missing backstory"));
    }
}
