//! Adherence resolution: will the character follow the coach?
//!
//! `final_score = clamp(gameplan_adherence + preference + advice, 0, 100)` and the
//! character complies when a d100 roll lands at or under it.

use serde::{Deserialize, Serialize};

use crate::{CharacterResponse, CoachResponse, DecisionCategory, FinancialPersonality, SpendingStyle};

/// Inputs for one adherence roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdherenceInput {
    pub gameplan_adherence: u8,
    pub personality: FinancialPersonality,
    pub category: DecisionCategory,
    pub coach_response: CoachResponse,
    /// The character authored the proposal, so this is true in the normal flow
    pub character_wants_it: bool,
}

/// Outcome of one adherence roll with its breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdherenceResult {
    pub preference_modifier: i32,
    pub advice_modifier: i32,
    pub final_score: u8,
    /// 1-100
    pub roll: u8,
    pub response: CharacterResponse,
}

/// `floor((trait - 50) / 5)`, rounding toward negative infinity.
fn trait_pull(value: u8) -> i32 {
    (i32::from(value) - 50).div_euclid(5)
}

/// How strongly the character's own temperament pushes toward compliance.
pub fn preference_modifier(personality: &FinancialPersonality, category: DecisionCategory) -> i32 {
    match category {
        DecisionCategory::Luxury => -trait_pull(personality.luxury_desire),
        DecisionCategory::Investment => -trait_pull(personality.risk_tolerance),
        DecisionCategory::Impulse => match personality.spending_style {
            SpendingStyle::Impulsive => -15,
            SpendingStyle::Moderate => 0,
            SpendingStyle::Conservative => 10,
            SpendingStyle::Strategic => 5,
        },
        DecisionCategory::Generosity => -trait_pull(personality.generosity),
        DecisionCategory::Essentials => 0,
        DecisionCategory::DebtPayment => trait_pull(personality.financial_wisdom),
    }
}

pub fn advice_modifier(coach_response: CoachResponse, character_wants_it: bool) -> i32 {
    match (coach_response, character_wants_it) {
        (CoachResponse::Endorse, true) => 20,
        (CoachResponse::Endorse, false) => 10,
        (CoachResponse::AdviseAgainst, true) => -15,
        (CoachResponse::AdviseAgainst, false) => 15,
    }
}

impl AdherenceInput {
    /// Final compliance score, 0-100.
    pub fn final_score(&self) -> u8 {
        let raw = i32::from(self.gameplan_adherence)
            + preference_modifier(&self.personality, self.category)
            + advice_modifier(self.coach_response, self.character_wants_it);
        // Clamped range fits in u8
        raw.clamp(0, 100) as u8
    }

    /// Resolve against an already-drawn roll in 1-100.
    pub fn resolve(&self, roll: u8) -> AdherenceResult {
        let final_score = self.final_score();
        AdherenceResult {
            preference_modifier: preference_modifier(&self.personality, self.category),
            advice_modifier: advice_modifier(self.coach_response, self.character_wants_it),
            final_score,
            roll,
            response: if roll <= final_score {
                CharacterResponse::Comply
            } else {
                CharacterResponse::Defy
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personality() -> FinancialPersonality {
        FinancialPersonality {
            spending_style: SpendingStyle::Moderate,
            financial_wisdom: 50,
            risk_tolerance: 50,
            luxury_desire: 80,
            generosity: 50,
        }
    }

    fn input(category: DecisionCategory, coach: CoachResponse) -> AdherenceInput {
        AdherenceInput {
            gameplan_adherence: 50,
            personality: personality(),
            category,
            coach_response: coach,
            character_wants_it: true,
        }
    }

    #[test]
    fn test_luxury_endorse_example() {
        let result = input(DecisionCategory::Luxury, CoachResponse::Endorse).resolve(64);
        assert_eq!(result.preference_modifier, -6);
        assert_eq!(result.advice_modifier, 20);
        assert_eq!(result.final_score, 64);
        assert_eq!(result.response, CharacterResponse::Comply);

        let result = input(DecisionCategory::Luxury, CoachResponse::Endorse).resolve(65);
        assert_eq!(result.response, CharacterResponse::Defy);
    }

    #[test]
    fn test_trait_pull_floors_toward_negative_infinity() {
        let mut fp = personality();
        fp.luxury_desire = 43; // (43 - 50) / 5 = -1.4 -> -2, negated
        assert_eq!(preference_modifier(&fp, DecisionCategory::Luxury), 2);
        fp.financial_wisdom = 74; // 24 / 5 = 4.8 -> 4
        assert_eq!(preference_modifier(&fp, DecisionCategory::DebtPayment), 4);
        fp.financial_wisdom = 0; // -50 / 5 = -10
        assert_eq!(preference_modifier(&fp, DecisionCategory::DebtPayment), -10);
    }

    #[test]
    fn test_impulse_table() {
        let mut fp = personality();
        let cases = [
            (SpendingStyle::Impulsive, -15),
            (SpendingStyle::Moderate, 0),
            (SpendingStyle::Conservative, 10),
            (SpendingStyle::Strategic, 5),
        ];
        for (style, expected) in cases {
            fp.spending_style = style;
            assert_eq!(preference_modifier(&fp, DecisionCategory::Impulse), expected);
        }
        assert_eq!(preference_modifier(&fp, DecisionCategory::Essentials), 0);
    }

    #[test]
    fn test_advice_modifiers() {
        assert_eq!(advice_modifier(CoachResponse::Endorse, true), 20);
        assert_eq!(advice_modifier(CoachResponse::Endorse, false), 10);
        assert_eq!(advice_modifier(CoachResponse::AdviseAgainst, true), -15);
        assert_eq!(advice_modifier(CoachResponse::AdviseAgainst, false), 15);
    }

    #[test]
    fn test_final_score_clamped() {
        let mut high = input(DecisionCategory::Essentials, CoachResponse::Endorse);
        high.gameplan_adherence = 95;
        assert_eq!(high.final_score(), 100);

        let mut low = input(DecisionCategory::Luxury, CoachResponse::AdviseAgainst);
        low.gameplan_adherence = 5;
        low.personality.luxury_desire = 100;
        assert_eq!(low.final_score(), 0);
        // A score of zero can never comply
        assert_eq!(low.resolve(1).response, CharacterResponse::Defy);
    }

    #[test]
    fn test_final_score_always_within_bounds() {
        for adherence in [0u8, 25, 50, 75, 100] {
            for trait_value in [0u8, 49, 50, 51, 100] {
                for category in DecisionCategory::all() {
                    for coach in [CoachResponse::Endorse, CoachResponse::AdviseAgainst] {
                        for wants in [true, false] {
                            let fp = FinancialPersonality {
                                spending_style: SpendingStyle::Impulsive,
                                financial_wisdom: trait_value,
                                risk_tolerance: trait_value,
                                luxury_desire: trait_value,
                                generosity: trait_value,
                            };
                            let score = AdherenceInput {
                                gameplan_adherence: adherence,
                                personality: fp,
                                category: *category,
                                coach_response: coach,
                                character_wants_it: wants,
                            }
                            .final_score();
                            assert!(score <= 100);
                        }
                    }
                }
            }
        }
    }
}
