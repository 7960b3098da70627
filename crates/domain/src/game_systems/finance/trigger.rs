//! Decision trigger probability.
//!
//! Base 15%, adjusted by stress, luxury desire, spending style and the
//! wallet/debt balance, clamped to 5-60%.

use serde::{Deserialize, Serialize};

use crate::{CharacterFinancialState, SpendingStyle};

pub const BASE_TRIGGER_PROBABILITY: i32 = 15;
pub const MIN_TRIGGER_PROBABILITY: i32 = 5;
pub const MAX_TRIGGER_PROBABILITY: i32 = 60;

/// Percent chance (5-60) that a decision event starts this turn.
pub fn trigger_probability(state: &CharacterFinancialState) -> u8 {
    let fp = &state.personality;
    let mut probability = BASE_TRIGGER_PROBABILITY;

    if state.financial_stress > 70 {
        probability += 10;
    }
    if fp.luxury_desire > 70 {
        probability += 10;
    }
    match fp.spending_style {
        SpendingStyle::Impulsive => probability += 15,
        SpendingStyle::Conservative => probability -= 10,
        SpendingStyle::Moderate | SpendingStyle::Strategic => {}
    }
    if state.wallet > 1000 {
        probability += 5;
    }
    if state.debt > state.wallet.saturating_mul(2) {
        probability += 10;
    }

    // Clamped range fits in u8
    probability.clamp(MIN_TRIGGER_PROBABILITY, MAX_TRIGGER_PROBABILITY) as u8
}

/// Result of one trigger check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCheck {
    pub probability: u8,
    /// 1-100
    pub roll: u8,
    pub triggered: bool,
}

impl TriggerCheck {
    pub fn evaluate(state: &CharacterFinancialState, roll: u8) -> Self {
        let probability = trigger_probability(state);
        Self {
            probability,
            roll,
            triggered: roll <= probability,
        }
    }
}
