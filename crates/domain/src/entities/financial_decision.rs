//! Financial decision entity - the unit of work of the decision engine
//!
//! # Lifecycle
//!
//! ```text
//! PENDING (resolution = None) ──resolve()──> RESOLVED (terminal)
//! ```
//!
//! A decision is created PENDING by the generator and transitions to RESOLVED
//! exactly once. At most one PENDING decision exists per character; storage
//! enforces that, this type enforces the single transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    CharacterId, DecisionId, DomainError, EquipmentId, ItemId, JudgeGrade, JudgeId, SubjectRef,
};

/// Decision category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    Luxury,
    Investment,
    Essentials,
    Impulse,
    Generosity,
    DebtPayment,
}

impl DecisionCategory {
    pub fn all() -> &'static [DecisionCategory] {
        &[
            DecisionCategory::Luxury,
            DecisionCategory::Investment,
            DecisionCategory::Essentials,
            DecisionCategory::Impulse,
            DecisionCategory::Generosity,
            DecisionCategory::DebtPayment,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::Luxury => "luxury",
            DecisionCategory::Investment => "investment",
            DecisionCategory::Essentials => "essentials",
            DecisionCategory::Impulse => "impulse",
            DecisionCategory::Generosity => "generosity",
            DecisionCategory::DebtPayment => "debt_payment",
        }
    }

    /// Everything except debt payment buys a catalog subject.
    pub fn is_purchase(&self) -> bool {
        !matches!(self, DecisionCategory::DebtPayment)
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "luxury" => Ok(DecisionCategory::Luxury),
            "investment" => Ok(DecisionCategory::Investment),
            "essentials" => Ok(DecisionCategory::Essentials),
            "impulse" => Ok(DecisionCategory::Impulse),
            "generosity" => Ok(DecisionCategory::Generosity),
            "debt_payment" => Ok(DecisionCategory::DebtPayment),
            other => Err(DomainError::parse(format!(
                "Unknown decision category: {}",
                other
            ))),
        }
    }
}

/// Coach guidance on a proposed decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachResponse {
    Endorse,
    AdviseAgainst,
}

impl CoachResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoachResponse::Endorse => "endorse",
            CoachResponse::AdviseAgainst => "advise_against",
        }
    }
}

impl fmt::Display for CoachResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoachResponse {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "endorse" => Ok(CoachResponse::Endorse),
            "advise_against" => Ok(CoachResponse::AdviseAgainst),
            other => Err(DomainError::parse(format!(
                "Coach response must be \"endorse\" or \"advise_against\", got {:?}",
                other
            ))),
        }
    }
}

/// The character's resolved reaction to coach guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterResponse {
    Comply,
    Defy,
}

impl CharacterResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterResponse::Comply => "comply",
            CharacterResponse::Defy => "defy",
        }
    }
}

impl fmt::Display for CharacterResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CharacterResponse {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comply" => Ok(CharacterResponse::Comply),
            "defy" => Ok(CharacterResponse::Defy),
            other => Err(DomainError::parse(format!(
                "Unknown character response: {}",
                other
            ))),
        }
    }
}

/// Whether the proposed action actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Executed,
    Rejected,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Executed => "executed",
            DecisionOutcome::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "executed" => Ok(DecisionOutcome::Executed),
            "rejected" => Ok(DecisionOutcome::Rejected),
            other => Err(DomainError::parse(format!("Unknown outcome: {}", other))),
        }
    }
}

/// What the decision is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionSubject {
    DebtPayment,
    Equipment { id: EquipmentId, name: String },
    Item { id: ItemId, name: String },
}

impl DecisionSubject {
    pub fn from_catalog(reference: SubjectRef, name: impl Into<String>) -> Self {
        match reference {
            SubjectRef::Equipment(id) => DecisionSubject::Equipment {
                id,
                name: name.into(),
            },
            SubjectRef::Item(id) => DecisionSubject::Item {
                id,
                name: name.into(),
            },
        }
    }

    /// Human-readable description used in prompts and logs.
    pub fn description(&self) -> &str {
        match self {
            DecisionSubject::DebtPayment => "debt payment",
            DecisionSubject::Equipment { name, .. } | DecisionSubject::Item { name, .. } => name,
        }
    }

    pub fn catalog_ref(&self) -> Option<SubjectRef> {
        match self {
            DecisionSubject::DebtPayment => None,
            DecisionSubject::Equipment { id, .. } => Some(SubjectRef::Equipment(*id)),
            DecisionSubject::Item { id, .. } => Some(SubjectRef::Item(*id)),
        }
    }
}

/// All deltas written by a resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDelta {
    pub trust_change: i32,
    pub stress_change: i32,
    pub wallet_change: i64,
    pub debt_change: i64,
    /// Recorded as graded; only non-negative values reach stored experience
    pub xp_change: i32,
}

impl LedgerDelta {
    /// The part of `xp_change` that is actually added to experience.
    pub fn applied_xp(&self) -> i64 {
        i64::from(self.xp_change.max(0))
    }
}

/// Everything recorded when a decision is resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResolution {
    pub coach_response: CoachResponse,
    pub character_response: CharacterResponse,
    /// 1-100
    pub adherence_roll: u8,
    pub outcome: DecisionOutcome,
    pub judge_id: JudgeId,
    pub grade: JudgeGrade,
    pub ruling: String,
    pub delta: LedgerDelta,
    pub resolved_at: DateTime<Utc>,
}

/// A proposed financial choice by a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialDecision {
    pub id: DecisionId,
    pub character_id: CharacterId,
    pub category: DecisionCategory,
    pub subject: DecisionSubject,
    /// Whole currency units, always positive
    pub amount: i64,
    pub character_reasoning: String,
    pub is_risky: bool,
    pub created_at: DateTime<Utc>,
    /// `None` while PENDING
    pub resolution: Option<DecisionResolution>,
}

impl FinancialDecision {
    /// Create a PENDING decision.
    pub fn new_pending(
        character_id: CharacterId,
        category: DecisionCategory,
        subject: DecisionSubject,
        amount: i64,
        character_reasoning: impl Into<String>,
        is_risky: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation(format!(
                "Decision amount must be positive, got {}",
                amount
            )));
        }
        if category.is_purchase() == matches!(subject, DecisionSubject::DebtPayment) {
            return Err(DomainError::validation(format!(
                "Category {} does not match subject {}",
                category,
                subject.description()
            )));
        }

        Ok(Self {
            id: DecisionId::new(),
            character_id,
            category,
            subject,
            amount,
            character_reasoning: character_reasoning.into(),
            is_risky,
            created_at: now,
            resolution: None,
        })
    }

    pub fn with_id(mut self, id: DecisionId) -> Self {
        self.id = id;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.resolution.is_none()
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolution.as_ref().map(|r| r.resolved_at)
    }

    /// PENDING -> RESOLVED. Fails if the decision was already resolved.
    pub fn resolve(&mut self, resolution: DecisionResolution) -> Result<(), DomainError> {
        if self.resolution.is_some() {
            return Err(DomainError::invalid_state_transition(format!(
                "Decision {} already resolved",
                self.id
            )));
        }
        self.resolution = Some(resolution);
        Ok(())
    }
}
