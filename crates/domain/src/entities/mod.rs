//! Entities - records with identity and a lifecycle

mod catalog;
mod character;
mod financial_decision;

pub use catalog::{CatalogSubject, PriceWindow, Rarity, SubjectKind, SubjectRef};
pub use character::{
    CharacterFinancialState, CharacterProfile, JudgeProfile, RawCharacterFinances,
    RawCharacterProfile, RawJudgeProfile,
};
pub use financial_decision::{
    CharacterResponse, CoachResponse, DecisionCategory, DecisionOutcome, DecisionResolution,
    DecisionSubject, FinancialDecision, LedgerDelta,
};
