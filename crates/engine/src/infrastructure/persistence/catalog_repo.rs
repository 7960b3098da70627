//! Equipment and item catalog lookups.

use async_trait::async_trait;
use blankwars_domain::{
    CatalogSubject, EquipmentId, ItemId, PriceWindow, Rarity, SubjectKind, SubjectRef,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::parse_uuid;
use crate::infrastructure::ports::{CatalogRepo, RepoError};

pub struct SqliteCatalogRepo {
    pool: SqlitePool,
}

impl SqliteCatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn table(kind: SubjectKind) -> &'static str {
    match kind {
        SubjectKind::Equipment => "equipment",
        SubjectKind::Item => "items",
    }
}

fn row_to_subject(row: &SqliteRow) -> Result<CatalogSubject, RepoError> {
    let map = |e: sqlx::Error| RepoError::serialization(e.to_string());

    let kind: String = row.try_get("kind").map_err(map)?;
    let id = parse_uuid(&row.try_get::<String, _>("id").map_err(map)?)?;
    let reference = match kind.as_str() {
        "equipment" => SubjectRef::Equipment(EquipmentId::from_uuid(id)),
        "item" => SubjectRef::Item(ItemId::from_uuid(id)),
        other => {
            return Err(RepoError::serialization(format!(
                "Unknown catalog kind: {}",
                other
            )))
        }
    };
    let rarity: String = row.try_get("rarity").map_err(map)?;

    Ok(CatalogSubject {
        reference,
        name: row.try_get("name").map_err(map)?,
        price: row.try_get("price").map_err(map)?,
        rarity: rarity
            .parse::<Rarity>()
            .map_err(|e| RepoError::serialization(e.to_string()))?,
    })
}

#[async_trait]
impl CatalogRepo for SqliteCatalogRepo {
    async fn random_in_price_range(
        &self,
        kind: SubjectKind,
        window: PriceWindow,
    ) -> Result<Option<CatalogSubject>, RepoError> {
        if window.is_empty() {
            return Ok(None);
        }

        let query = format!(
            "SELECT '{kind}' AS kind, id, name, price, rarity FROM {table} \
             WHERE price > 0 AND price BETWEEN ? AND ? ORDER BY RANDOM() LIMIT 1",
            kind = kind.as_str(),
            table = table(kind),
        );
        let row = sqlx::query(&query)
            .bind(window.min)
            .bind(window.max)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("random_catalog_subject", e))?;

        row.as_ref().map(row_to_subject).transpose()
    }

    async fn cheapest(&self) -> Result<Option<CatalogSubject>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT kind, id, name, price, rarity FROM (
                SELECT 'equipment' AS kind, id, name, price, rarity FROM equipment WHERE price > 0
                UNION ALL
                SELECT 'item' AS kind, id, name, price, rarity FROM items WHERE price > 0
            )
            ORDER BY price ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("cheapest_catalog_subject", e))?;

        row.as_ref().map(row_to_subject).transpose()
    }
}
