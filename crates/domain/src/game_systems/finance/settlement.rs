//! Outcome determination, base financial effects and the final ledger delta.

use serde::{Deserialize, Serialize};

use crate::{
    CharacterResponse, CoachResponse, DecisionCategory, DecisionOutcome, DecisionSubject,
    EquipmentId, ItemId, JudgeGrade, LedgerDelta,
};

/// Fixed comply/defy x endorse/advise_against table.
///
/// Defiance flips the coach's recommendation, which is how a purchase the coach
/// advised against can happen anyway.
pub fn determine_outcome(
    character_response: CharacterResponse,
    coach_response: CoachResponse,
) -> DecisionOutcome {
    match (character_response, coach_response) {
        (CharacterResponse::Comply, CoachResponse::Endorse) => DecisionOutcome::Executed,
        (CharacterResponse::Comply, CoachResponse::AdviseAgainst) => DecisionOutcome::Rejected,
        (CharacterResponse::Defy, CoachResponse::Endorse) => DecisionOutcome::Rejected,
        (CharacterResponse::Defy, CoachResponse::AdviseAgainst) => DecisionOutcome::Executed,
    }
}

/// Wallet and debt movement implied by the outcome alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialEffect {
    pub wallet_change: i64,
    pub debt_change: i64,
}

impl FinancialEffect {
    pub fn calculate(
        outcome: DecisionOutcome,
        category: DecisionCategory,
        amount: i64,
        wallet_before: i64,
    ) -> Self {
        match (outcome, category) {
            (DecisionOutcome::Rejected, _) => Self::default(),
            (DecisionOutcome::Executed, DecisionCategory::DebtPayment) => Self {
                wallet_change: -amount,
                debt_change: -amount,
            },
            (DecisionOutcome::Executed, _) if wallet_before >= amount => Self {
                wallet_change: -amount,
                debt_change: 0,
            },
            // Buy on credit: empty the wallet, borrow the shortfall
            (DecisionOutcome::Executed, _) => {
                let wallet_before = wallet_before.max(0);
                Self {
                    wallet_change: -wallet_before,
                    debt_change: amount - wallet_before,
                }
            }
        }
    }
}

/// Combine the base effect with the graded reward into the final ledger delta.
pub fn settle(effect: FinancialEffect, grade: JudgeGrade, amount: i64) -> LedgerDelta {
    let reward = grade.reward();
    LedgerDelta {
        trust_change: reward.trust,
        stress_change: reward.stress,
        wallet_change: effect.wallet_change + reward.wallet_bonus(amount),
        debt_change: effect.debt_change,
        xp_change: reward.xp,
    }
}

/// Inventory change for an executed purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryGrant {
    /// Add one to the consumable stack
    Stack { item_id: ItemId },
    /// Grant once; already owned is a no-op
    Unique { equipment_id: EquipmentId },
}

impl InventoryGrant {
    /// Only executed purchases grant anything.
    pub fn for_outcome(outcome: DecisionOutcome, subject: &DecisionSubject) -> Option<Self> {
        if outcome != DecisionOutcome::Executed {
            return None;
        }
        match subject {
            DecisionSubject::DebtPayment => None,
            DecisionSubject::Item { id, .. } => Some(InventoryGrant::Stack { item_id: *id }),
            DecisionSubject::Equipment { id, .. } => {
                Some(InventoryGrant::Unique { equipment_id: *id })
            }
        }
    }
}
