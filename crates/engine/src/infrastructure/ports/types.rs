//! Data carried across port boundaries.

use blankwars_domain::finance::InventoryGrant;
use blankwars_domain::{
    CharacterId, CharacterResponse, CoachResponse, DecisionCategory, DecisionId,
    DecisionOutcome, DecisionResolution, FinancialPersonality, JudgeGrade,
};
use serde::{Deserialize, Serialize};

/// Everything the ledger writes for one resolution, committed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCommit {
    pub decision_id: DecisionId,
    pub character_id: CharacterId,
    pub resolution: DecisionResolution,
    pub grant: Option<InventoryGrant>,
}

/// Input for in-character reasoning text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningRequest {
    pub character_name: String,
    pub personality_traits: Vec<String>,
    pub money_beliefs: Vec<String>,
    pub subject_description: String,
    pub category: DecisionCategory,
}

/// Full episode context handed to the judge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeInput {
    pub character_id: CharacterId,
    pub character_name: String,
    pub personality_traits: Vec<String>,
    pub category: DecisionCategory,
    pub subject_description: String,
    pub amount: i64,
    pub character_reasoning: String,
    pub is_risky: bool,
    pub coach_response: CoachResponse,
    pub character_response: CharacterResponse,
    pub outcome: DecisionOutcome,
    pub wallet_before: i64,
    pub debt_before: i64,
    pub financial_stress: u8,
    pub personality: FinancialPersonality,
    /// What each grade would do to the character, best grade first
    pub grade_consequences: Vec<(JudgeGrade, String)>,
}

/// The judge's ruling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub grade: JudgeGrade,
    pub ruling: String,
}
