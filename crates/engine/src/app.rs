//! Application state and composition.

use std::sync::Arc;

use crate::entities::{Catalog, Character, Decision};
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    llm_client::ChatCompletionsClient,
    llm_judge::LlmJudge,
    llm_narrator::LlmNarrator,
    persistence::SqliteRepositories,
    ports::{
        CatalogRepo, CharacterRepo, ClockPort, DecisionRepo, JudgePort, LlmPort, NarrativePort,
        RandomPort, RepoError,
    },
    resilient_llm::{ResilientLlmClient, RetryConfig},
};
use crate::use_cases::financial::{
    DecisionHistory, FinancialUseCases, GenerateDecisionEvent, PollPendingDecision,
    ResolveDecision, ShouldTriggerDecision,
};

/// Main application state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Storage ports, injected directly.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub decision: Arc<dyn DecisionRepo>,
    pub catalog: Arc<dyn CatalogRepo>,
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            character: repos.characters,
            decision: repos.decisions,
            catalog: repos.catalog,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub financial: FinancialUseCases,
}

impl App {
    /// Wire every use case from its ports.
    ///
    /// `narrative_llm` should already carry any retry policy; the judge LLM is
    /// called exactly once per resolution.
    pub fn new(
        repositories: Repositories,
        narrative_llm: Arc<dyn LlmPort>,
        judge_llm: Arc<dyn LlmPort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let narrative: Arc<dyn NarrativePort> = Arc::new(LlmNarrator::new(narrative_llm));
        let judge: Arc<dyn JudgePort> = Arc::new(LlmJudge::new(judge_llm));

        let character = Arc::new(Character::new(repositories.character.clone()));
        let decision = Arc::new(Decision::new(repositories.decision.clone()));
        let catalog = Arc::new(Catalog::new(repositories.catalog.clone()));

        let should_trigger = Arc::new(ShouldTriggerDecision::new(
            character.clone(),
            decision.clone(),
            random.clone(),
        ));
        let generate = Arc::new(GenerateDecisionEvent::new(
            character.clone(),
            decision.clone(),
            catalog,
            narrative,
            random.clone(),
            clock.clone(),
        ));
        let resolve = Arc::new(ResolveDecision::new(
            character,
            decision.clone(),
            judge,
            random,
            clock,
        ));
        let poll = Arc::new(PollPendingDecision::new(
            decision.clone(),
            should_trigger.clone(),
            generate.clone(),
        ));
        let history = Arc::new(DecisionHistory::new(decision));

        let use_cases = UseCases {
            financial: FinancialUseCases::new(should_trigger, generate, resolve, poll, history),
        };

        Self {
            repositories,
            use_cases,
        }
    }

    /// Connect SQLite and both LLM clients from configuration.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, RepoError> {
        tracing::info!(database_path = %config.database_path, "Opening SQLite database");
        let repos = SqliteRepositories::connect(&config.database_path).await?;

        let narrative_client = Arc::new(
            ChatCompletionsClient::with_timeout(
                &config.llm_base_url,
                &config.llm_model,
                config.llm_timeout_secs,
            )
            .with_api_key(config.llm_api_key.clone()),
        );
        let narrative_llm: Arc<dyn LlmPort> = Arc::new(ResilientLlmClient::new(
            narrative_client,
            RetryConfig::with_max_retries(config.narrative_max_retries),
        ));
        let judge_llm: Arc<dyn LlmPort> = Arc::new(
            ChatCompletionsClient::with_timeout(
                &config.llm_base_url,
                &config.judge_model,
                config.llm_timeout_secs,
            )
            .with_api_key(config.llm_api_key.clone()),
        );

        tracing::info!(
            llm_base_url = %config.llm_base_url,
            narrative_model = %config.llm_model,
            judge_model = %config.judge_model,
            "LLM clients configured"
        );

        Ok(Self::new(
            repos.into(),
            narrative_llm,
            judge_llm,
            Arc::new(SystemRandom::new()),
            Arc::new(SystemClock::new()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, SequenceRandom};
    use crate::infrastructure::persistence::fixtures;
    use crate::infrastructure::ports::{FinishReason, LlmError, LlmResponse, MockLlmPort};
    use crate::use_cases::financial::FinancialDecisionError;
    use blankwars_domain::{
        CharacterResponse, CoachResponse, DecisionCategory, DecisionOutcome, JudgeGrade,
    };
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reply(content: &str) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: content.to_string(),
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    }

    /// Judge grades are replayed in order; the last one repeats.
    fn app(
        repos: SqliteRepositories,
        random: SequenceRandom,
        grades: &'static [&'static str],
    ) -> App {
        let mut narrative = MockLlmPort::new();
        narrative
            .expect_generate()
            .returning(|_| reply("Achilles deserves greaves fit for Troy."));
        let mut judge = MockLlmPort::new();
        let calls = AtomicUsize::new(0);
        judge.expect_generate().returning(move |_| {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            let grade = grades[call.min(grades.len() - 1)];
            reply(&format!(
                r#"{{"choice":"{}","ruling":"Armor for a warrior is money well spent."}}"#,
                grade
            ))
        });

        App::new(
            repos.into(),
            Arc::new(narrative),
            Arc::new(judge),
            Arc::new(random),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap(),
            )),
        )
    }

    #[tokio::test]
    async fn test_turn_then_resolution_updates_the_ledger() {
        let db = fixtures::open().await;
        let judge_id = fixtures::insert_judge(&db.pool).await;
        let character_id = fixtures::insert_character(&db.pool, 500, 0, Some(judge_id)).await;
        fixtures::insert_equipment(&db.pool, "Bronze Greaves", 300, "common").await;

        // Trigger roll 1, then adherence roll 64 against a threshold of 64
        let random = SequenceRandom::new([1, 64], [0.1]);
        let app = app(SqliteRepositories::from_pool(db.pool.clone()), random, &["B"]);
        let financial = &app.use_cases.financial;

        let pending = financial
            .poll
            .execute(character_id)
            .await
            .unwrap()
            .expect("trigger fires");
        assert_eq!(pending.category, DecisionCategory::Luxury);
        assert_eq!(pending.amount, 300);
        assert_eq!(
            pending.character_reasoning,
            "Achilles deserves greaves fit for Troy."
        );

        let again = financial.poll.execute(character_id).await.unwrap();
        assert_eq!(again.map(|d| d.id), Some(pending.id));

        let resolved = financial
            .resolve
            .execute(pending.id, CoachResponse::Endorse)
            .await
            .unwrap();
        let resolution = resolved.resolution.expect("resolved");
        assert_eq!(resolution.character_response, CharacterResponse::Comply);
        assert_eq!(resolution.outcome, DecisionOutcome::Executed);
        assert_eq!(resolution.grade, JudgeGrade::B);

        let finances = app
            .repositories
            .character
            .get_finances(character_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finances.wallet, Some(215));
        assert_eq!(finances.debt, Some(0));
        assert_eq!(finances.coach_trust, Some(62));
        assert_eq!(finances.financial_stress, Some(35));
        assert_eq!(finances.experience, Some(125));

        let err = financial
            .resolve
            .execute(pending.id, CoachResponse::Endorse)
            .await
            .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::Conflict(_)));

        let history = financial.history.execute(character_id, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_pending());
    }

    #[tokio::test]
    async fn test_retry_after_judge_failure_applies_rewards_once() {
        let db = fixtures::open().await;
        let judge_id = fixtures::insert_judge(&db.pool).await;
        let character_id = fixtures::insert_character(&db.pool, 500, 0, Some(judge_id)).await;
        fixtures::insert_equipment(&db.pool, "Bronze Greaves", 300, "common").await;

        let random = SequenceRandom::new([1, 64], [0.1]);
        let app = app(SqliteRepositories::from_pool(db.pool.clone()), random, &["F", "B"]);
        let financial = &app.use_cases.financial;

        let pending = financial.poll.execute(character_id).await.unwrap().unwrap();
        let err = financial
            .resolve
            .execute(pending.id, CoachResponse::Endorse)
            .await
            .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::ExternalService(_)));

        let still_pending = app
            .repositories
            .decision
            .get_pending_for_character(character_id)
            .await
            .unwrap();
        assert_eq!(still_pending.map(|d| d.id), Some(pending.id));
        let finances = app
            .repositories
            .character
            .get_finances(character_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finances.wallet, Some(500));

        // Same id and coach response once the judge recovers
        let resolved = financial
            .resolve
            .execute(pending.id, CoachResponse::Endorse)
            .await
            .unwrap();
        assert_eq!(resolved.resolution.map(|r| r.grade), Some(JudgeGrade::B));

        let finances = app
            .repositories
            .character
            .get_finances(character_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finances.wallet, Some(215));
        assert_eq!(finances.coach_trust, Some(62));
        assert_eq!(finances.experience, Some(125));

        let err = financial
            .resolve
            .execute(pending.id, CoachResponse::Endorse)
            .await
            .unwrap_err();
        assert!(matches!(err, FinancialDecisionError::Conflict(_)));

        let finances = app
            .repositories
            .character
            .get_finances(character_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finances.wallet, Some(215));
    }
}
