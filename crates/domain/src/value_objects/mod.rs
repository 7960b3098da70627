//! Value objects - Immutable objects defined by their attributes

pub(crate) mod financial_personality;
mod grade_reward;

pub use financial_personality::{FinancialPersonality, RawFinancialPersonality, SpendingStyle};
pub use grade_reward::{GradeReward, JudgeGrade, RewardDescriptor};
