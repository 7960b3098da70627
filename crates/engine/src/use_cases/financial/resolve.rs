//! Resolve a PENDING decision with the coach's response.
//!
//! Sequence: adherence roll, outcome, base financial effect, judge grade,
//! settlement, then one atomic ledger commit. Nothing is written before the
//! judge has ruled, so a judge failure leaves the decision PENDING.

use std::sync::Arc;

use blankwars_domain::finance::{
    determine_outcome, settle, AdherenceInput, AdherenceResult, FinancialEffect, InventoryGrant,
};
use blankwars_domain::{
    CharacterFinancialState, CharacterProfile, CoachResponse, DecisionId, DecisionOutcome,
    DecisionResolution, FinancialDecision, JudgeGrade,
};

use crate::entities::{Character, Decision};
use crate::infrastructure::ports::{ClockPort, JudgeInput, JudgePort, LedgerCommit, RandomPort};

use super::locks::ResolutionLocks;
use super::trigger::roll_d100;
use super::FinancialDecisionError;

pub struct ResolveDecision {
    character: Arc<Character>,
    decision: Arc<Decision>,
    judge: Arc<dyn JudgePort>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
    locks: ResolutionLocks,
}

impl ResolveDecision {
    pub fn new(
        character: Arc<Character>,
        decision: Arc<Decision>,
        judge: Arc<dyn JudgePort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            character,
            decision,
            judge,
            random,
            clock,
            locks: ResolutionLocks::new(),
        }
    }

    pub async fn execute(
        &self,
        decision_id: DecisionId,
        coach_response: CoachResponse,
    ) -> Result<FinancialDecision, FinancialDecisionError> {
        let _guard = self.locks.acquire(decision_id).await;

        let mut decision = self
            .decision
            .get(decision_id)
            .await?
            .ok_or_else(|| FinancialDecisionError::not_found("Financial decision", decision_id))?;
        if !decision.is_pending() {
            return Err(FinancialDecisionError::Conflict(format!(
                "Decision {} is already resolved",
                decision_id
            )));
        }

        let character_id = decision.character_id;
        let state = self.character.financial_state(character_id).await?;
        let profile = self.character.profile(character_id).await?;
        let judge = self.character.assigned_judge(character_id).await?;

        let adherence = AdherenceInput {
            gameplan_adherence: state.gameplan_adherence,
            personality: state.personality,
            category: decision.category,
            coach_response,
            character_wants_it: true,
        }
        .resolve(roll_d100(self.random.as_ref()));
        let outcome = determine_outcome(adherence.response, coach_response);
        let effect =
            FinancialEffect::calculate(outcome, decision.category, decision.amount, state.wallet);

        tracing::info!(
            character_id = %character_id,
            decision_id = %decision_id,
            coach_response = %coach_response,
            roll = adherence.roll,
            threshold = adherence.final_score,
            response = %adherence.response,
            outcome = %outcome,
            "Adherence resolved"
        );

        let input = judge_input(&decision, &state, &profile, coach_response, &adherence, outcome);
        let verdict = self.judge.adjudicate(&judge, &input).await.map_err(|e| {
            tracing::error!(
                character_id = %character_id,
                decision_id = %decision_id,
                judge_id = %judge.id,
                error = %e,
                "Judge adjudication failed, decision stays pending"
            );
            e
        })?;

        let resolution = DecisionResolution {
            coach_response,
            character_response: adherence.response,
            adherence_roll: adherence.roll,
            outcome,
            judge_id: judge.id,
            grade: verdict.grade,
            ruling: verdict.ruling,
            delta: settle(effect, verdict.grade, decision.amount),
            resolved_at: self.clock.now(),
        };

        self.decision
            .commit(&LedgerCommit {
                decision_id,
                character_id,
                resolution: resolution.clone(),
                grant: InventoryGrant::for_outcome(outcome, &decision.subject),
            })
            .await?;
        decision.resolve(resolution)?;

        tracing::info!(
            character_id = %character_id,
            decision_id = %decision_id,
            grade = %verdict.grade,
            wallet_change = decision.resolution.as_ref().map(|r| r.delta.wallet_change),
            "Financial decision resolved"
        );

        Ok(decision)
    }
}

fn judge_input(
    decision: &FinancialDecision,
    state: &CharacterFinancialState,
    profile: &CharacterProfile,
    coach_response: CoachResponse,
    adherence: &AdherenceResult,
    outcome: DecisionOutcome,
) -> JudgeInput {
    JudgeInput {
        character_id: decision.character_id,
        character_name: profile.name.clone(),
        personality_traits: profile.personality_traits.clone(),
        category: decision.category,
        subject_description: decision.subject.description().to_string(),
        amount: decision.amount,
        character_reasoning: decision.character_reasoning.clone(),
        is_risky: decision.is_risky,
        coach_response,
        character_response: adherence.response,
        outcome,
        wallet_before: state.wallet,
        debt_before: state.debt,
        financial_stress: state.financial_stress,
        personality: state.personality,
        grade_consequences: JudgeGrade::all()
            .iter()
            .map(|grade| (*grade, grade.reward().describe(decision.amount)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        JudgeError, JudgeVerdict, LlmError, MockCharacterRepo, MockDecisionRepo, MockJudgePort,
        MockRandomPort, RepoError,
    };
    use crate::use_cases::financial::test_support::{
        fixed_now, pending_decision, raw_finances, raw_judge, raw_profile,
    };
    use async_trait::async_trait;
    use blankwars_domain::{
        CharacterId, CharacterResponse, DecisionCategory, DecisionSubject, JudgeProfile,
        LedgerDelta,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn characters(wallet: i64, debt: i64) -> MockCharacterRepo {
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get_finances()
            .returning(move |_| Ok(Some(raw_finances(wallet, debt))));
        characters
            .expect_get_profile()
            .returning(|_| Ok(Some(raw_profile())));
        characters
            .expect_get_assigned_judge()
            .returning(|_| Ok(Some(raw_judge())));
        characters
    }

    fn rolling(roll: i32) -> MockRandomPort {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().returning(move |_, _| roll);
        random
    }

    fn verdict(grade: JudgeGrade) -> Result<JudgeVerdict, JudgeError> {
        Ok(JudgeVerdict {
            grade,
            ruling: "So ruled.".to_string(),
        })
    }

    fn use_case(
        characters: MockCharacterRepo,
        decisions: MockDecisionRepo,
        judge: Arc<dyn JudgePort>,
        random: MockRandomPort,
    ) -> ResolveDecision {
        ResolveDecision::new(
            Arc::new(Character::new(Arc::new(characters))),
            Arc::new(Decision::new(Arc::new(decisions))),
            judge,
            Arc::new(random),
            Arc::new(FixedClock(fixed_now())),
        )
    }

    /// Decision store backed by one shared decision, committing for real.
    fn shared_store(decision: FinancialDecision) -> (MockDecisionRepo, Arc<Mutex<FinancialDecision>>) {
        let shared = Arc::new(Mutex::new(decision));
        let mut decisions = MockDecisionRepo::new();
        let for_get = Arc::clone(&shared);
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(for_get.lock().unwrap().clone())));
        let for_commit = Arc::clone(&shared);
        decisions.expect_commit_resolution().returning(move |commit| {
            let mut stored = for_commit.lock().unwrap();
            if !stored.is_pending() {
                return Err(RepoError::conflict("not pending"));
            }
            stored.resolution = Some(commit.resolution.clone());
            Ok(())
        });
        (decisions, shared)
    }

    #[tokio::test]
    async fn test_endorsed_purchase_complies_and_settles() {
        // adherence 50, luxury_desire 80 (-6), endorse (+20): threshold 64
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;

        let mut decisions = MockDecisionRepo::new();
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(decision.clone())));
        decisions
            .expect_commit_resolution()
            .times(1)
            .withf(move |commit| {
                commit.decision_id == decision_id
                    && commit.resolution.outcome == DecisionOutcome::Executed
                    && commit.resolution.delta
                        == LedgerDelta {
                            trust_change: 2,
                            stress_change: -5,
                            wallet_change: -285,
                            debt_change: 0,
                            xp_change: 25,
                        }
                    && matches!(commit.grant, Some(InventoryGrant::Unique { .. }))
            })
            .returning(|_| Ok(()));

        let mut judge = MockJudgePort::new();
        judge
            .expect_adjudicate()
            .times(1)
            .withf(|_, input| {
                input.wallet_before == 500
                    && input.coach_response == CoachResponse::Endorse
                    && input.character_response == CharacterResponse::Comply
                    && input.grade_consequences.len() == 5
            })
            .returning(|_, _| verdict(JudgeGrade::B));

        let resolved = use_case(characters(500, 0), decisions, Arc::new(judge), rolling(64))
            .execute(decision_id, CoachResponse::Endorse)
            .await
            .unwrap();

        let resolution = resolved.resolution.unwrap();
        assert_eq!(resolution.adherence_roll, 64);
        assert_eq!(resolution.character_response, CharacterResponse::Comply);
        assert_eq!(resolution.grade, JudgeGrade::B);
        assert_eq!(resolution.resolved_at, fixed_now());
    }

    #[tokio::test]
    async fn test_defying_advice_executes_on_credit() {
        // advise_against with wants (-15): threshold 50 - 6 - 15 = 29
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;

        let mut decisions = MockDecisionRepo::new();
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(decision.clone())));
        decisions
            .expect_commit_resolution()
            .withf(|commit| {
                let delta = commit.resolution.delta;
                commit.resolution.character_response == CharacterResponse::Defy
                    && commit.resolution.outcome == DecisionOutcome::Executed
                    // wallet 100 pays what it can, 200 goes on debt, grade E takes 30
                    && delta.wallet_change == -130
                    && delta.debt_change == 200
                    && delta.xp_change == -25
            })
            .returning(|_| Ok(()));

        let mut judge = MockJudgePort::new();
        judge
            .expect_adjudicate()
            .returning(|_, _| verdict(JudgeGrade::E));

        let resolved = use_case(characters(100, 0), decisions, Arc::new(judge), rolling(30))
            .execute(decision_id, CoachResponse::AdviseAgainst)
            .await
            .unwrap();
        assert!(!resolved.is_pending());
    }

    #[tokio::test]
    async fn test_rejected_debt_payment_moves_no_money() {
        let character_id = CharacterId::new();
        let decision = FinancialDecision::new_pending(
            character_id,
            DecisionCategory::DebtPayment,
            DecisionSubject::DebtPayment,
            200,
            "Debts are chains.",
            false,
            fixed_now(),
        )
        .unwrap();
        let decision_id = decision.id;

        let mut decisions = MockDecisionRepo::new();
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(decision.clone())));
        decisions
            .expect_commit_resolution()
            .withf(|commit| {
                commit.resolution.outcome == DecisionOutcome::Rejected
                    && commit.resolution.delta.wallet_change == 0
                    && commit.resolution.delta.debt_change == 0
                    && commit.grant.is_none()
            })
            .returning(|_| Ok(()));

        let mut judge = MockJudgePort::new();
        judge
            .expect_adjudicate()
            .returning(|_, _| verdict(JudgeGrade::C));

        // Comply with advice against: rejected
        use_case(characters(400, 1000), decisions, Arc::new(judge), rolling(1))
            .execute(decision_id, CoachResponse::AdviseAgainst)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_judge_failure_writes_nothing() {
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;

        let mut decisions = MockDecisionRepo::new();
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(decision.clone())));
        decisions.expect_commit_resolution().never();

        let mut judge = MockJudgePort::new();
        judge.expect_adjudicate().returning(|_, _| {
            Err(JudgeError::Unavailable(LlmError::RequestFailed(
                "connection refused".into(),
            )))
        });

        let err = use_case(characters(500, 0), decisions, Arc::new(judge), rolling(10))
            .execute(decision_id, CoachResponse::Endorse)
            .await
            .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::ExternalService(_)));
    }

    #[tokio::test]
    async fn test_missing_decision_is_not_found() {
        let mut decisions = MockDecisionRepo::new();
        decisions.expect_get().returning(|_| Ok(None));

        let err = use_case(
            MockCharacterRepo::new(),
            decisions,
            Arc::new(MockJudgePort::new()),
            MockRandomPort::new(),
        )
        .execute(DecisionId::new(), CoachResponse::Endorse)
        .await
        .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolved_decision_conflicts_without_judging() {
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;
        let (decisions, shared) = shared_store(decision);

        let mut judge = MockJudgePort::new();
        judge
            .expect_adjudicate()
            .times(1)
            .returning(|_, _| verdict(JudgeGrade::A));

        let resolve = use_case(characters(500, 0), decisions, Arc::new(judge), rolling(50));
        resolve
            .execute(decision_id, CoachResponse::Endorse)
            .await
            .unwrap();

        let err = resolve
            .execute(decision_id, CoachResponse::Endorse)
            .await
            .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::Conflict(_)));
        assert!(!shared.lock().unwrap().is_pending());
    }

    #[tokio::test]
    async fn test_incomplete_character_is_validation_error() {
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;
        let mut decisions = MockDecisionRepo::new();
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(decision.clone())));
        decisions.expect_commit_resolution().never();

        let mut characters = MockCharacterRepo::new();
        characters.expect_get_finances().returning(|_| {
            let mut raw = raw_finances(500, 0);
            raw.coach_trust = None;
            Ok(Some(raw))
        });

        let err = use_case(
            characters,
            decisions,
            Arc::new(MockJudgePort::new()),
            rolling(50),
        )
        .execute(decision_id, CoachResponse::Endorse)
        .await
        .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unassigned_judge_is_not_found() {
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;
        let mut decisions = MockDecisionRepo::new();
        decisions
            .expect_get()
            .returning(move |_| Ok(Some(decision.clone())));
        decisions.expect_commit_resolution().never();

        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get_finances()
            .returning(|_| Ok(Some(raw_finances(500, 0))));
        characters
            .expect_get_profile()
            .returning(|_| Ok(Some(raw_profile())));
        characters.expect_get_assigned_judge().returning(|_| Ok(None));

        let mut judge = MockJudgePort::new();
        judge.expect_adjudicate().never();

        let err = use_case(characters, decisions, Arc::new(judge), rolling(50))
            .execute(decision_id, CoachResponse::Endorse)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FinancialDecisionError::NotFound {
                entity_type: "Judge for character",
                ..
            }
        ));
    }

    /// Judge that takes a while, so a concurrent call can queue up behind it.
    struct SlowJudge {
        calls: AtomicU32,
    }

    #[async_trait]
    impl JudgePort for SlowJudge {
        async fn adjudicate(
            &self,
            _judge: &JudgeProfile,
            _input: &JudgeInput,
        ) -> Result<JudgeVerdict, JudgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            verdict(JudgeGrade::C)
        }
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_judge_once() {
        let character_id = CharacterId::new();
        let decision = pending_decision(character_id);
        let decision_id = decision.id;
        let (decisions, _shared) = shared_store(decision);
        let judge = Arc::new(SlowJudge {
            calls: AtomicU32::new(0),
        });

        let resolve = use_case(characters(500, 0), decisions, judge.clone(), rolling(50));
        let (first, second) = tokio::join!(
            resolve.execute(decision_id, CoachResponse::Endorse),
            resolve.execute(decision_id, CoachResponse::AdviseAgainst),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(FinancialDecisionError::Conflict(_))));
        assert_eq!(judge.calls.load(Ordering::SeqCst), 1);
    }
}
