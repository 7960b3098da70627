//! Financial personality value objects
//!
//! A character's money temperament. Every field drives at least one rule:
//!
//! - `spending_style` - trigger probability, impulse weight, impulse adherence
//! - `financial_wisdom` - debt payment weight and adherence
//! - `risk_tolerance` - investment weight and adherence
//! - `luxury_desire` - trigger probability, luxury weight and adherence
//! - `generosity` - generosity weight and adherence
//!
//! ## Strict Mode
//!
//! Storage hands back [`RawFinancialPersonality`] with every field optional.
//! [`RawFinancialPersonality::validate`] is the only way to obtain a
//! [`FinancialPersonality`]; a missing field is a validation error, never a default.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// How a character habitually spends money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingStyle {
    Impulsive,
    Moderate,
    Conservative,
    Strategic,
}

impl SpendingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingStyle::Impulsive => "impulsive",
            SpendingStyle::Moderate => "moderate",
            SpendingStyle::Conservative => "conservative",
            SpendingStyle::Strategic => "strategic",
        }
    }
}

impl fmt::Display for SpendingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpendingStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "impulsive" => Ok(SpendingStyle::Impulsive),
            "moderate" => Ok(SpendingStyle::Moderate),
            "conservative" => Ok(SpendingStyle::Conservative),
            "strategic" => Ok(SpendingStyle::Strategic),
            other => Err(DomainError::parse(format!("Unknown spending style: {}", other))),
        }
    }
}

/// Validated financial personality. All scores are 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialPersonality {
    pub spending_style: SpendingStyle,
    pub financial_wisdom: u8,
    pub risk_tolerance: u8,
    pub luxury_desire: u8,
    pub generosity: u8,
}

/// Financial personality as stored, before strict-mode validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFinancialPersonality {
    pub spending_style: Option<String>,
    pub financial_wisdom: Option<i64>,
    pub risk_tolerance: Option<i64>,
    pub luxury_desire: Option<i64>,
    pub generosity: Option<i64>,
}

impl RawFinancialPersonality {
    /// Validate every field, reporting the first missing or invalid one.
    ///
    /// `owner` only feeds the error message (usually "Character <id>").
    pub fn validate(self, owner: impl fmt::Display) -> Result<FinancialPersonality, DomainError> {
        let spending_style = self
            .spending_style
            .as_deref()
            .ok_or_else(|| {
                DomainError::missing_field(&owner, "financial_personality.spending_style")
            })?
            .parse::<SpendingStyle>()
            .map_err(|e| DomainError::validation(format!("{}: {}", owner, e)))?;

        Ok(FinancialPersonality {
            spending_style,
            financial_wisdom: score(
                &owner,
                "financial_personality.financial_wisdom",
                self.financial_wisdom,
            )?,
            risk_tolerance: score(
                &owner,
                "financial_personality.risk_tolerance",
                self.risk_tolerance,
            )?,
            luxury_desire: score(
                &owner,
                "financial_personality.luxury_desire",
                self.luxury_desire,
            )?,
            generosity: score(&owner, "financial_personality.generosity", self.generosity)?,
        })
    }
}

/// Require a 0-100 score.
pub(crate) fn score(
    owner: &impl fmt::Display,
    field: &str,
    value: Option<i64>,
) -> Result<u8, DomainError> {
    let value = value.ok_or_else(|| DomainError::missing_field(owner, field))?;
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| {
            DomainError::validation(format!(
                "{} has {} out of range 0-100: {}",
                owner, field, value
            ))
        })
}
