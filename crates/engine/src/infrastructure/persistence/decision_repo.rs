//! Financial decision storage and the atomic ledger commit.

use async_trait::async_trait;
use blankwars_domain::finance::InventoryGrant;
use blankwars_domain::{
    CharacterId, DecisionId, DecisionResolution, DecisionSubject, FinancialDecision, JudgeId,
    LedgerDelta,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::{is_unique_violation, parse_datetime, parse_uuid};
use crate::infrastructure::ports::{DecisionRepo, LedgerCommit, RepoError};

const COLUMNS: &str = "id, character_id, category, subject_json, amount, character_reasoning, \
    is_risky, created_at, coach_response, character_response, adherence_roll, outcome, judge_id, \
    judge_grade, judge_ruling, trust_change, stress_change, wallet_change, debt_change, xp_change, \
    resolved_at";

pub struct SqliteDecisionRepo {
    pool: SqlitePool,
}

impl SqliteDecisionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_decision(row: &SqliteRow) -> Result<FinancialDecision, RepoError> {
        let get_str = |name: &str| -> Result<String, RepoError> {
            row.try_get(name)
                .map_err(|e| RepoError::serialization(format!("Column {}: {}", name, e)))
        };
        let get_opt = |name: &str| -> Result<Option<String>, RepoError> {
            row.try_get(name)
                .map_err(|e| RepoError::serialization(format!("Column {}: {}", name, e)))
        };
        let get_int = |name: &str| -> Result<Option<i64>, RepoError> {
            row.try_get(name)
                .map_err(|e| RepoError::serialization(format!("Column {}: {}", name, e)))
        };

        let id = DecisionId::from_uuid(parse_uuid(&get_str("id")?)?);
        let subject: DecisionSubject = serde_json::from_str(&get_str("subject_json")?)
            .map_err(|e| RepoError::serialization(e.to_string()))?;
        let stored_int = |name: &'static str| -> Result<i64, RepoError> {
            get_int(name)?.ok_or_else(|| {
                RepoError::serialization(format!("Decision {} has no {}", id, name))
            })
        };
        let amount = match stored_int("amount")? {
            amount if amount > 0 => amount,
            other => {
                return Err(RepoError::serialization(format!(
                    "Decision {} has non-positive amount {}",
                    id, other
                )))
            }
        };
        let is_risky = match stored_int("is_risky")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::serialization(format!(
                    "Decision {} has is_risky {}, expected 0 or 1",
                    id, other
                )))
            }
        };

        let resolution = match get_opt("resolved_at")? {
            None => None,
            Some(resolved_at) => {
                let required = |name: &'static str| -> Result<String, RepoError> {
                    get_opt(name)?.ok_or_else(|| {
                        RepoError::serialization(format!(
                            "Resolved decision {} has no {}",
                            id, name
                        ))
                    })
                };
                let required_int = |name: &'static str| -> Result<i64, RepoError> {
                    get_int(name)?.ok_or_else(|| {
                        RepoError::serialization(format!(
                            "Resolved decision {} has no {}",
                            id, name
                        ))
                    })
                };
                let narrow = |name: &'static str| -> Result<i32, RepoError> {
                    i32::try_from(required_int(name)?)
                        .map_err(|e| RepoError::serialization(format!("{}: {}", name, e)))
                };

                Some(DecisionResolution {
                    coach_response: parse_enum(required("coach_response")?)?,
                    character_response: parse_enum(required("character_response")?)?,
                    adherence_roll: u8::try_from(required_int("adherence_roll")?)
                        .map_err(|e| RepoError::serialization(format!("adherence_roll: {}", e)))?,
                    outcome: parse_enum(required("outcome")?)?,
                    judge_id: JudgeId::from_uuid(parse_uuid(&required("judge_id")?)?),
                    grade: parse_enum(required("judge_grade")?)?,
                    ruling: required("judge_ruling")?,
                    delta: LedgerDelta {
                        trust_change: narrow("trust_change")?,
                        stress_change: narrow("stress_change")?,
                        wallet_change: required_int("wallet_change")?,
                        debt_change: required_int("debt_change")?,
                        xp_change: narrow("xp_change")?,
                    },
                    resolved_at: parse_datetime(&resolved_at)?,
                })
            }
        };

        Ok(FinancialDecision {
            id,
            character_id: CharacterId::from_uuid(parse_uuid(&get_str("character_id")?)?),
            category: parse_enum(get_str("category")?)?,
            subject,
            amount,
            character_reasoning: get_str("character_reasoning")?,
            is_risky,
            created_at: parse_datetime(&get_str("created_at")?)?,
            resolution,
        })
    }
}

fn parse_enum<T>(value: String) -> Result<T, RepoError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| RepoError::serialization(e.to_string()))
}

#[async_trait]
impl DecisionRepo for SqliteDecisionRepo {
    async fn get(&self, id: DecisionId) -> Result<Option<FinancialDecision>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM financial_decisions WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_decision", e))?;

        row.as_ref().map(Self::row_to_decision).transpose()
    }

    async fn get_pending_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<FinancialDecision>, RepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM financial_decisions \
             WHERE character_id = ? AND resolved_at IS NULL LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(character_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_pending_decision", e))?;

        row.as_ref().map(Self::row_to_decision).transpose()
    }

    async fn list_for_character(
        &self,
        character_id: CharacterId,
        limit: u32,
    ) -> Result<Vec<FinancialDecision>, RepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM financial_decisions \
             WHERE character_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?"
        );
        let rows = sqlx::query(&query)
            .bind(character_id.to_string())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_decisions", e))?;

        rows.iter().map(Self::row_to_decision).collect()
    }

    async fn insert_pending(&self, decision: &FinancialDecision) -> Result<(), RepoError> {
        let subject_json = serde_json::to_string(&decision.subject)
            .map_err(|e| RepoError::serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO financial_decisions
                (id, character_id, category, subject_json, amount, character_reasoning,
                 is_risky, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(decision.id.to_string())
        .bind(decision.character_id.to_string())
        .bind(decision.category.as_str())
        .bind(subject_json)
        .bind(decision.amount)
        .bind(&decision.character_reasoning)
        .bind(decision.is_risky)
        .bind(decision.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::conflict(format!(
                    "Character {} already has a pending decision",
                    decision.character_id
                ))
            } else {
                RepoError::database("insert_pending_decision", e)
            }
        })?;

        Ok(())
    }

    async fn commit_resolution(&self, commit: &LedgerCommit) -> Result<(), RepoError> {
        let resolution = &commit.resolution;
        let delta = &resolution.delta;

        // Dropping the transaction without commit rolls everything back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("begin_resolution", e))?;

        let result = sqlx::query(
            r#"
            UPDATE financial_decisions SET
                coach_response = ?, character_response = ?, adherence_roll = ?, outcome = ?,
                judge_id = ?, judge_grade = ?, judge_ruling = ?,
                trust_change = ?, stress_change = ?, wallet_change = ?, debt_change = ?,
                xp_change = ?, resolved_at = ?
            WHERE id = ? AND character_id = ? AND resolved_at IS NULL
            "#,
        )
        .bind(resolution.coach_response.as_str())
        .bind(resolution.character_response.as_str())
        .bind(i64::from(resolution.adherence_roll))
        .bind(resolution.outcome.as_str())
        .bind(resolution.judge_id.to_string())
        .bind(resolution.grade.as_str())
        .bind(&resolution.ruling)
        .bind(delta.trust_change)
        .bind(delta.stress_change)
        .bind(delta.wallet_change)
        .bind(delta.debt_change)
        .bind(delta.xp_change)
        .bind(resolution.resolved_at.to_rfc3339())
        .bind(commit.decision_id.to_string())
        .bind(commit.character_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("mark_decision_resolved", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::conflict(format!(
                "Decision {} is not pending",
                commit.decision_id
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE characters SET
                wallet = MAX(0, wallet + ?),
                debt = MAX(0, debt + ?),
                coach_trust = MIN(100, MAX(0, coach_trust + ?)),
                financial_stress = MIN(100, MAX(0, financial_stress + ?)),
                experience = experience + ?
            WHERE id = ?
            "#,
        )
        .bind(delta.wallet_change)
        .bind(delta.debt_change)
        .bind(delta.trust_change)
        .bind(delta.stress_change)
        .bind(delta.applied_xp())
        .bind(commit.character_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("apply_character_ledger", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", commit.character_id));
        }

        match commit.grant {
            Some(InventoryGrant::Unique { equipment_id }) => {
                sqlx::query(
                    r#"
                    INSERT INTO character_equipment (character_id, equipment_id, acquired_at)
                    VALUES (?, ?, ?)
                    ON CONFLICT(character_id, equipment_id) DO NOTHING
                    "#,
                )
                .bind(commit.character_id.to_string())
                .bind(equipment_id.to_string())
                .bind(resolution.resolved_at.to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("grant_equipment", e))?;
            }
            Some(InventoryGrant::Stack { item_id }) => {
                sqlx::query(
                    r#"
                    INSERT INTO character_items (character_id, item_id, quantity)
                    VALUES (?, ?, 1)
                    ON CONFLICT(character_id, item_id) DO UPDATE SET quantity = quantity + 1
                    "#,
                )
                .bind(commit.character_id.to_string())
                .bind(item_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("grant_item", e))?;
            }
            None => {}
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit_resolution", e))?;

        Ok(())
    }
}
