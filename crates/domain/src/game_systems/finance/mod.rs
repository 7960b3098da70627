//! Financial decision rules.
//!
//! Pure functions only: every random draw is made by the caller and passed in,
//! so each rule is reproducible from a fixed roll.
//!
//! - `trigger` - chance a decision event starts this turn
//! - `selection` - weighted category choice, price windows, debt payment sizing
//! - `adherence` - comply/defy roll against the coach's guidance
//! - `settlement` - outcome table, base effects, graded ledger delta, inventory grant

mod adherence;
mod selection;
mod settlement;
mod trigger;

pub use adherence::{advice_modifier, preference_modifier, AdherenceInput, AdherenceResult};
pub use selection::{
    category_weights, debt_payment_amount, is_risky_purchase, price_window, select_category,
    WeightedTable, ESSENTIALS_WEIGHT,
};
pub use settlement::{determine_outcome, settle, FinancialEffect, InventoryGrant};
pub use trigger::{
    trigger_probability, TriggerCheck, BASE_TRIGGER_PROBABILITY, MAX_TRIGGER_PROBABILITY,
    MIN_TRIGGER_PROBABILITY,
};
