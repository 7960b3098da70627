//! Generate a PENDING financial decision for a character.

use std::sync::Arc;

use blankwars_domain::finance::{
    debt_payment_amount, is_risky_purchase, price_window, select_category,
};
use blankwars_domain::{
    CharacterFinancialState, CharacterId, CharacterProfile, DecisionCategory, DecisionId,
    DecisionSubject, FinancialDecision,
};

use crate::entities::{Catalog, Character, Decision};
use crate::infrastructure::ports::{ClockPort, NarrativePort, RandomPort, ReasoningRequest};

use super::FinancialDecisionError;

/// What the character proposes, before reasoning is attached
#[derive(Debug, Clone, PartialEq, Eq)]
struct Proposal {
    category: DecisionCategory,
    subject: DecisionSubject,
    amount: i64,
    is_risky: bool,
}

pub struct GenerateDecisionEvent {
    character: Arc<Character>,
    decision: Arc<Decision>,
    catalog: Arc<Catalog>,
    narrative: Arc<dyn NarrativePort>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl GenerateDecisionEvent {
    pub fn new(
        character: Arc<Character>,
        decision: Arc<Decision>,
        catalog: Arc<Catalog>,
        narrative: Arc<dyn NarrativePort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            character,
            decision,
            catalog,
            narrative,
            random,
            clock,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<FinancialDecision, FinancialDecisionError> {
        let state = self.character.financial_state(character_id).await?;
        let profile = self.character.profile(character_id).await?;

        if let Some(pending) = self.decision.pending_for(character_id).await? {
            return Err(FinancialDecisionError::Conflict(format!(
                "Character {} already has pending decision {}",
                character_id, pending.id
            )));
        }

        let proposal = self.propose(&state).await?;
        let reasoning = self.reasoning(&profile, &proposal).await;

        let decision = FinancialDecision::new_pending(
            character_id,
            proposal.category,
            proposal.subject,
            proposal.amount,
            reasoning,
            proposal.is_risky,
            self.clock.now(),
        )?
        .with_id(DecisionId::from_uuid(self.random.gen_uuid()));

        self.decision.insert_pending(&decision).await?;

        tracing::info!(
            character_id = %character_id,
            decision_id = %decision.id,
            category = %decision.category,
            amount = decision.amount,
            is_risky = decision.is_risky,
            "Financial decision generated"
        );

        Ok(decision)
    }

    async fn propose(
        &self,
        state: &CharacterFinancialState,
    ) -> Result<Proposal, FinancialDecisionError> {
        let mut category = select_category(&state.personality, state.debt, self.random.gen_unit());

        if category == DecisionCategory::DebtPayment {
            let amount = debt_payment_amount(state.wallet, state.debt);
            if amount > 0 {
                return Ok(Proposal {
                    category,
                    subject: DecisionSubject::DebtPayment,
                    amount,
                    is_risky: false,
                });
            }
            tracing::debug!(
                character_id = %state.character_id,
                wallet = state.wallet,
                "Wallet too small for a debt payment, proposing essentials"
            );
            category = DecisionCategory::Essentials;
        }

        let window = price_window(category, state.wallet).ok_or_else(|| {
            FinancialDecisionError::Validation(format!("No price window for {}", category))
        })?;
        let subject = self
            .catalog
            .find_subject(window)
            .await?
            .ok_or_else(|| FinancialDecisionError::not_found("Catalog subject", category))?;

        Ok(Proposal {
            category,
            is_risky: is_risky_purchase(subject.price, state.wallet, subject.rarity),
            amount: subject.price,
            subject: DecisionSubject::from_catalog(subject.reference, subject.name),
        })
    }

    /// LLM reasoning, or the templated line when the LLM is unavailable.
    async fn reasoning(&self, profile: &CharacterProfile, proposal: &Proposal) -> String {
        let request = ReasoningRequest {
            character_name: profile.name.clone(),
            personality_traits: profile.personality_traits.clone(),
            money_beliefs: profile.money_beliefs.clone(),
            subject_description: proposal.subject.description().to_string(),
            category: proposal.category,
        };

        match self.narrative.reasoning(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(
                    character_id = %profile.character_id,
                    "Empty reasoning from narrative service, using fallback"
                );
                fallback_reasoning(&request)
            }
            Err(e) => {
                tracing::warn!(
                    character_id = %profile.character_id,
                    error = %e,
                    "Narrative service failed, using fallback reasoning"
                );
                fallback_reasoning(&request)
            }
        }
    }
}

fn fallback_reasoning(request: &ReasoningRequest) -> String {
    format!(
        "This {} would serve {} well.",
        request.subject_description, request.character_name
    )
}
