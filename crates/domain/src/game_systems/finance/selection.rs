//! Decision category selection and subject sizing.
//!
//! Category weights come from the personality. The weights are normalised into a
//! cumulative table once, and a single uniform draw in `[0, 1)` picks the
//! category, so callers inject the randomness and tests can pin it.

use serde::{Deserialize, Serialize};

use crate::{DecisionCategory, FinancialPersonality, PriceWindow, SpendingStyle};

/// Weight of `essentials`, which is always eligible.
pub const ESSENTIALS_WEIGHT: u32 = 50;
pub const IMPULSIVE_IMPULSE_WEIGHT: u32 = 80;
pub const DEFAULT_IMPULSE_WEIGHT: u32 = 20;

/// Normalised cumulative-weight table over an ordered set of choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    /// `(choice, weight, upper cumulative bound in (0, 1])`
    entries: Vec<(T, u32, f64)>,
    total: u64,
}

impl<T: Copy> WeightedTable<T> {
    pub fn new(weights: impl IntoIterator<Item = (T, u32)>) -> Self {
        let weights: Vec<(T, u32)> = weights.into_iter().collect();
        let total: u64 = weights.iter().map(|(_, w)| u64::from(*w)).sum();

        let mut running = 0u64;
        let entries = weights
            .into_iter()
            .map(|(choice, weight)| {
                running += u64::from(weight);
                let bound = if total == 0 {
                    0.0
                } else {
                    running as f64 / total as f64
                };
                (choice, weight, bound)
            })
            .collect();

        Self { entries, total }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn weight_of(&self, choice: T) -> u32
    where
        T: PartialEq,
    {
        self.entries
            .iter()
            .find(|(c, _, _)| *c == choice)
            .map(|(_, w, _)| *w)
            .unwrap_or(0)
    }

    /// Pick with a uniform draw in `[0, 1)`.
    ///
    /// Returns `None` when every weight is zero. Zero-weight entries are never picked.
    pub fn pick(&self, draw: f64) -> Option<T> {
        if self.total == 0 {
            return None;
        }
        let draw = draw.clamp(0.0, 1.0);
        self.entries
            .iter()
            .find(|(_, weight, bound)| *weight > 0 && draw < *bound)
            .or_else(|| self.entries.iter().rev().find(|(_, weight, _)| *weight > 0))
            .map(|(choice, _, _)| *choice)
    }
}

/// Category weights in their fixed order.
pub fn category_weights(
    personality: &FinancialPersonality,
    debt: i64,
) -> WeightedTable<DecisionCategory> {
    let impulse = if personality.spending_style == SpendingStyle::Impulsive {
        IMPULSIVE_IMPULSE_WEIGHT
    } else {
        DEFAULT_IMPULSE_WEIGHT
    };
    let debt_payment = if debt > 0 {
        u32::from(personality.financial_wisdom)
    } else {
        0
    };

    WeightedTable::new([
        (
            DecisionCategory::Luxury,
            u32::from(personality.luxury_desire),
        ),
        (
            DecisionCategory::Investment,
            u32::from(personality.risk_tolerance),
        ),
        (DecisionCategory::Impulse, impulse),
        (
            DecisionCategory::Generosity,
            u32::from(personality.generosity),
        ),
        (DecisionCategory::Essentials, ESSENTIALS_WEIGHT),
        (DecisionCategory::DebtPayment, debt_payment),
    ])
}

/// Select a category; falls back to `essentials` when nothing is selectable.
pub fn select_category(
    personality: &FinancialPersonality,
    debt: i64,
    draw: f64,
) -> DecisionCategory {
    category_weights(personality, debt)
        .pick(draw)
        .unwrap_or(DecisionCategory::Essentials)
}

/// Catalog price window for a purchase category, `None` for debt payment.
///
/// Bounds are whole units: lower bounds round up, upper bounds round down.
pub fn price_window(category: DecisionCategory, wallet: i64) -> Option<PriceWindow> {
    let wallet = wallet.max(0);
    // Ceil without overflow: floor plus one unless the division is exact
    let thirty_pct_floor = wallet / 10 * 3 + (wallet % 10) * 3 / 10;
    let thirty_pct_ceil = thirty_pct_floor + i64::from((wallet % 10) * 3 % 10 != 0);
    let double = wallet.saturating_mul(2);

    match category {
        DecisionCategory::Luxury => Some(PriceWindow::new(thirty_pct_ceil, double)),
        DecisionCategory::Impulse => Some(PriceWindow::new(100, wallet / 2)),
        DecisionCategory::Essentials => Some(PriceWindow::new(50, thirty_pct_floor)),
        DecisionCategory::Investment | DecisionCategory::Generosity => {
            Some(PriceWindow::new(100, double))
        }
        DecisionCategory::DebtPayment => None,
    }
}

/// Half the wallet, never more than the outstanding debt.
pub fn debt_payment_amount(wallet: i64, debt: i64) -> i64 {
    debt.min(wallet.max(0) / 2).max(0)
}

/// A purchase is risky when it overdraws the wallet or the subject is exotic.
pub fn is_risky_purchase(price: i64, wallet: i64, rarity: crate::Rarity) -> bool {
    price > wallet || rarity.is_exotic()
}
