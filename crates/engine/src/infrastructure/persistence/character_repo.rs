//! Character, profile and judge reads.
//!
//! Rows come back raw: nullable columns map to `None` and validation is left
//! to the caller.

use async_trait::async_trait;
use blankwars_domain::{
    CharacterId, JudgeId, RawCharacterFinances, RawCharacterProfile, RawFinancialPersonality,
    RawJudgeProfile,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::parse_uuid;
use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::serialization(format!("Column {}: {}", name, e)))
}

/// Nullable JSON string array column.
fn string_list(row: &SqliteRow, name: &str) -> Result<Option<Vec<String>>, RepoError> {
    column::<Option<String>>(row, name)?
        .map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| RepoError::serialization(format!("Column {}: {}", name, e)))
        })
        .transpose()
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn list_ids(&self) -> Result<Vec<CharacterId>, RepoError> {
        let rows = sqlx::query("SELECT id FROM characters ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_character_ids", e))?;

        rows.iter()
            .map(|row| {
                let id: String = column(row, "id")?;
                Ok(CharacterId::from_uuid(parse_uuid(&id)?))
            })
            .collect()
    }

    async fn get_finances(
        &self,
        id: CharacterId,
    ) -> Result<Option<RawCharacterFinances>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT wallet, debt, financial_stress, gameplan_adherence, coach_trust, experience,
                   spending_style, financial_wisdom, risk_tolerance, luxury_desire, generosity
            FROM characters WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_character_finances", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(RawCharacterFinances {
            wallet: column(&row, "wallet")?,
            debt: column(&row, "debt")?,
            financial_stress: column(&row, "financial_stress")?,
            gameplan_adherence: column(&row, "gameplan_adherence")?,
            coach_trust: column(&row, "coach_trust")?,
            experience: column(&row, "experience")?,
            personality: Some(RawFinancialPersonality {
                spending_style: column(&row, "spending_style")?,
                financial_wisdom: column(&row, "financial_wisdom")?,
                risk_tolerance: column(&row, "risk_tolerance")?,
                luxury_desire: column(&row, "luxury_desire")?,
                generosity: column(&row, "generosity")?,
            }),
        }))
    }

    async fn get_profile(&self, id: CharacterId) -> Result<Option<RawCharacterProfile>, RepoError> {
        let row = sqlx::query(
            "SELECT name, personality_traits_json, money_beliefs_json FROM characters WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_character_profile", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(RawCharacterProfile {
            name: column(&row, "name")?,
            personality_traits: string_list(&row, "personality_traits_json")?,
            money_beliefs: string_list(&row, "money_beliefs_json")?,
        }))
    }

    async fn get_assigned_judge(
        &self,
        id: CharacterId,
    ) -> Result<Option<RawJudgeProfile>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT j.id, j.name, j.personality_traits_json, j.backstory
            FROM characters c
            JOIN judges j ON j.id = c.judge_id
            WHERE c.id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_assigned_judge", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let judge_id: String = column(&row, "id")?;
        Ok(Some(RawJudgeProfile {
            id: JudgeId::from_uuid(parse_uuid(&judge_id)?),
            name: column(&row, "name")?,
            personality_traits: string_list(&row, "personality_traits_json")?,
            backstory: column(&row, "backstory")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[tokio::test]
    async fn test_complete_character_validates() {
        let db = fixtures::open().await;
        let judge_id = fixtures::insert_judge(&db.pool).await;
        let id = fixtures::insert_character(&db.pool, 500, 0, Some(judge_id)).await;

        let finances = db.repos.characters.get_finances(id).await.unwrap().unwrap();
        let state = finances.validate(id).unwrap();
        assert_eq!(state.wallet, 500);
        assert_eq!(state.personality.luxury_desire, 80);

        let profile = db.repos.characters.get_profile(id).await.unwrap().unwrap();
        let profile = profile.validate(id).unwrap();
        assert_eq!(profile.name, "Achilles");
        assert_eq!(profile.personality_traits, vec!["proud", "brave"]);

        let judge = db.repos.characters.get_assigned_judge(id).await.unwrap().unwrap();
        assert_eq!(judge.validate().unwrap().id, judge_id);

        assert_eq!(db.repos.characters.list_ids().await.unwrap(), vec![id]);
    }

    #[tokio::test]
    async fn test_null_columns_come_back_missing() {
        let db = fixtures::open().await;
        let id = fixtures::insert_character(&db.pool, 500, 0, None).await;
        sqlx::query("UPDATE characters SET coach_trust = NULL WHERE id = ?")
            .bind(id.to_string())
            .execute(&db.pool)
            .await
            .unwrap();

        let finances = db.repos.characters.get_finances(id).await.unwrap().unwrap();
        assert_eq!(finances.coach_trust, None);
        assert!(finances.validate(id).is_err());
        assert!(db.repos.characters.get_assigned_judge(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_character_is_none() {
        let db = fixtures::open().await;
        let id = CharacterId::new();
        assert!(db.repos.characters.get_finances(id).await.unwrap().is_none());
        assert!(db.repos.characters.get_profile(id).await.unwrap().is_none());
    }
}
