//! SQLite persistence for characters, the catalog and financial decisions.
//!
//! One pool is shared by every repository so a ledger commit can touch the
//! decision, the character and the inventory tables in a single transaction.

mod catalog_repo;
mod character_repo;
mod decision_repo;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::infrastructure::ports::RepoError;

pub use catalog_repo::SqliteCatalogRepo;
pub use character_repo::SqliteCharacterRepo;
pub use decision_repo::SqliteDecisionRepo;

/// All SQLite-backed repositories over one pool.
pub struct SqliteRepositories {
    pub characters: Arc<SqliteCharacterRepo>,
    pub decisions: Arc<SqliteDecisionRepo>,
    pub catalog: Arc<SqliteCatalogRepo>,
}

impl SqliteRepositories {
    /// Open (creating if needed) the database at `db_path` and ensure the schema.
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        ensure_schema(&pool).await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            characters: Arc::new(SqliteCharacterRepo::new(pool.clone())),
            decisions: Arc::new(SqliteDecisionRepo::new(pool.clone())),
            catalog: Arc::new(SqliteCatalogRepo::new(pool)),
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS judges (
        id TEXT PRIMARY KEY,
        name TEXT,
        personality_traits_json TEXT,
        backstory TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        name TEXT,
        personality_traits_json TEXT,
        money_beliefs_json TEXT,
        wallet INTEGER,
        debt INTEGER,
        financial_stress INTEGER,
        gameplan_adherence INTEGER,
        coach_trust INTEGER,
        experience INTEGER,
        spending_style TEXT,
        financial_wisdom INTEGER,
        risk_tolerance INTEGER,
        luxury_desire INTEGER,
        generosity INTEGER,
        judge_id TEXT REFERENCES judges(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS equipment (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        price INTEGER NOT NULL,
        rarity TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        price INTEGER NOT NULL,
        rarity TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_equipment (
        character_id TEXT NOT NULL REFERENCES characters(id),
        equipment_id TEXT NOT NULL,
        acquired_at TEXT NOT NULL,
        PRIMARY KEY (character_id, equipment_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_items (
        character_id TEXT NOT NULL REFERENCES characters(id),
        item_id TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (character_id, item_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS financial_decisions (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES characters(id),
        category TEXT NOT NULL,
        subject_json TEXT NOT NULL,
        amount INTEGER NOT NULL,
        character_reasoning TEXT NOT NULL,
        is_risky INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        coach_response TEXT,
        character_response TEXT,
        adherence_roll INTEGER,
        outcome TEXT,
        judge_id TEXT,
        judge_grade TEXT,
        judge_ruling TEXT,
        trust_change INTEGER,
        stress_change INTEGER,
        wallet_change INTEGER,
        debt_change INTEGER,
        xp_change INTEGER,
        resolved_at TEXT
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_financial_decisions_one_pending
    ON financial_decisions(character_id) WHERE resolved_at IS NULL
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_financial_decisions_history
    ON financial_decisions(character_id, created_at DESC)
    "#,
];

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("Invalid datetime {:?}: {}", value, e)))
}

pub(crate) fn parse_uuid(value: &str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| RepoError::serialization(format!("Invalid UUID {:?}: {}", value, e)))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
