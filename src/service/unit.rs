use serde::Deserialize;

use crate::db::Store;
use crate::db::models::{UnitRow, now_rfc3339};
use crate::error::CatalogError;
use crate::service::validate::validate_name;

const NAME_MAX: usize = 100;

#[derive(Debug, Deserialize)]
pub struct UnitInput {
    pub name: String,
}

pub async fn create(store: &Store, input: UnitInput) -> Result<UnitRow, CatalogError> {
    let name = input.name.trim().to_string();
    validate_name(&name, NAME_MAX, "unit name")?;

    let dup: Option<i64> =
        sqlx::query_scalar("SELECT id FROM units WHERE name = ? AND deleted_at IS NULL LIMIT 1")
            .bind(&name)
            .fetch_optional(store.pool())
            .await?;
    if dup.is_some() {
        return Err(CatalogError::AlreadyExists("unit".to_string()));
    }

    let now = now_rfc3339();
    let res = sqlx::query("INSERT INTO units (name, created_at, updated_at) VALUES (?, ?, ?)")
        .bind(&name)
        .bind(&now)
        .bind(&now)
        .execute(store.pool())
        .await?;
    Ok(UnitRow {
        id: res.last_insert_rowid(),
        name,
    })
}

pub async fn list(store: &Store) -> Result<Vec<UnitRow>, CatalogError> {
    let rows = sqlx::query_as::<_, UnitRow>(
        "SELECT id, name FROM units WHERE deleted_at IS NULL ORDER BY id",
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}
