//! Blank Wars domain: financial decision types, value objects and rules.
//!
//! No I/O and no randomness live here. Storage rows arrive as `Raw*` records
//! and are validated into typed records; dice are rolled by the engine and
//! passed in as plain numbers.

pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use entities::{
    CatalogSubject, CharacterFinancialState, CharacterProfile, CharacterResponse,
    CoachResponse, DecisionCategory, DecisionOutcome, DecisionResolution, DecisionSubject,
    FinancialDecision, JudgeProfile, LedgerDelta, PriceWindow, Rarity, RawCharacterFinances,
    RawCharacterProfile, RawJudgeProfile, SubjectKind, SubjectRef,
};

pub use error::DomainError;

pub use game_systems::finance;

pub use ids::{CharacterId, DecisionId, EquipmentId, ItemId, JudgeId};

pub use value_objects::{
    FinancialPersonality, GradeReward, JudgeGrade, RawFinancialPersonality, RewardDescriptor,
    SpendingStyle,
};
