use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use crate::db::Store;
use crate::db::models::{AssetTypeRow, IdName, ManagementType, Status, now_rfc3339};
use crate::error::CatalogError;
use crate::service::validate::{validate_code, validate_name};
use crate::types::paginate::{Page, direction, filter, window};

pub const CODE_PREFIX: &str = "LTS";
pub const CODE_WIDTH: usize = 3;
const CODE_MAX: usize = 10;
const NAME_MAX: usize = 50;

const JOINED: &str = "t.id, t.type_code, t.type_name, t.group_id, g.group_name, \
                      t.management_type, t.status, t.note";
const FROM: &str = "asset_types t JOIN asset_groups g ON g.id = t.group_id";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTypeInput {
    pub type_code: Option<String>,
    pub type_name: String,
    pub group_id: i64,
    pub management_type: Option<ManagementType>,
    pub status: Option<Status>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetTypePageRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_type_code: Option<String>,
    pub search_type_name: Option<String>,
    pub search_group_name: Option<String>,
    pub search_management_type: Option<String>,
    pub search_status: Option<String>,
    pub search_note: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

pub async fn suggest_code(store: &Store) -> Result<String, CatalogError> {
    store
        .next_code("asset_types", "type_code", CODE_PREFIX, CODE_WIDTH)
        .await
}

pub async fn create(store: &Store, mut input: AssetTypeInput) -> Result<AssetTypeRow, CatalogError> {
    let code = match input.type_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "asset type code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.type_name, NAME_MAX, "asset type name")?;
    ensure_unique(store, &code, &input.type_name, None).await?;
    ensure_group_exists(store, input.group_id).await?;

    let now = now_rfc3339();
    let res = sqlx::query(
        "INSERT INTO asset_types \
         (type_code, type_name, group_id, management_type, status, note, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&code)
    .bind(&input.type_name)
    .bind(input.group_id)
    .bind(input.management_type.unwrap_or(ManagementType::Quantity))
    .bind(input.status.unwrap_or(Status::Active))
    .bind(&input.note)
    .bind(&now)
    .bind(&now)
    .execute(store.pool())
    .await?;

    info!(code = %code, "asset type created");
    get(store, res.last_insert_rowid()).await
}

pub async fn get(store: &Store, id: i64) -> Result<AssetTypeRow, CatalogError> {
    let sql = format!("SELECT {JOINED} FROM {FROM} WHERE t.id = ? AND t.deleted_at IS NULL");
    sqlx::query_as::<_, AssetTypeRow>(&sql)
        .bind(id)
        .fetch_optional(store.pool())
        .await?
        .ok_or_else(|| CatalogError::NotFound("asset type".to_string()))
}

pub async fn update(
    store: &Store,
    id: i64,
    mut input: AssetTypeInput,
) -> Result<AssetTypeRow, CatalogError> {
    let existing = get(store, id).await?;

    let code = match input.type_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "asset type code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.type_name, NAME_MAX, "asset type name")?;
    ensure_unique(store, &code, &input.type_name, Some(id)).await?;
    ensure_group_exists(store, input.group_id).await?;

    sqlx::query(
        "UPDATE asset_types SET type_code = ?, type_name = ?, group_id = ?, \
         management_type = ?, status = ?, note = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&code)
    .bind(&input.type_name)
    .bind(input.group_id)
    .bind(input.management_type.unwrap_or(existing.management_type))
    .bind(input.status.unwrap_or(existing.status))
    .bind(input.note.or(existing.note))
    .bind(now_rfc3339())
    .bind(id)
    .execute(store.pool())
    .await?;

    get(store, id).await
}

/// Asset types are the one entity that is hard-deleted; a live product
/// referencing the type still blocks removal.
pub async fn delete(store: &Store, id: i64) -> Result<(), CatalogError> {
    let ty = get(store, id).await?;

    let in_use: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM products WHERE asset_type_id = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(id)
    .fetch_optional(store.pool())
    .await?;
    if in_use.is_some() {
        return Err(CatalogError::CannotDelete(format!(
            "asset type {}",
            ty.type_code
        )));
    }

    sqlx::query("DELETE FROM asset_types WHERE id = ?")
        .bind(id)
        .execute(store.pool())
        .await?;
    info!(code = %ty.type_code, "asset type hard-deleted");
    Ok(())
}

pub async fn paginate(
    store: &Store,
    req: AssetTypePageRequest,
) -> Result<Page<AssetTypeRow>, CatalogError> {
    let (page, page_size, limit, offset) = window(req.page, req.page_size);

    let push_filters = |qb: &mut QueryBuilder<Sqlite>| {
        if let Some(v) = filter(&req.search_type_code) {
            qb.push(" AND t.type_code LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_type_name) {
            qb.push(" AND t.type_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_group_name) {
            qb.push(" AND g.group_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_management_type) {
            qb.push(" AND t.management_type = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_status) {
            qb.push(" AND t.status = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_note) {
            qb.push(" AND t.note LIKE ").push_bind(format!("%{v}%"));
        }
    };

    let mut count_qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT COUNT(*) FROM {FROM} WHERE t.deleted_at IS NULL"
    ));
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(store.pool()).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {JOINED} FROM {FROM} WHERE t.deleted_at IS NULL"
    ));
    push_filters(&mut qb);
    let col = sort_column(req.order_by.as_deref());
    let dir = direction(req.order_direction.as_deref());
    qb.push(format!(" ORDER BY {col} {dir} LIMIT "));
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    let data = qb
        .build_query_as::<AssetTypeRow>()
        .fetch_all(store.pool())
        .await?;

    Ok(Page {
        data,
        total,
        page,
        page_size,
    })
}

fn sort_column(name: Option<&str>) -> &'static str {
    match name {
        Some("typeCode" | "type_code") => "t.type_code",
        Some("typeName" | "type_name") => "t.type_name",
        Some("groupName" | "group_name") => "g.group_name",
        Some("managementType" | "management_type") => "t.management_type",
        Some("status") => "t.status",
        Some("note") => "t.note",
        _ => "t.id",
    }
}

pub async fn active(store: &Store) -> Result<Vec<IdName>, CatalogError> {
    let rows = sqlx::query_as::<_, IdName>(
        "SELECT id, type_name AS name FROM asset_types \
         WHERE status = 'active' AND deleted_at IS NULL ORDER BY type_name",
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}

async fn ensure_group_exists(store: &Store, group_id: i64) -> Result<(), CatalogError> {
    let row: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_groups WHERE id = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(group_id)
    .fetch_optional(store.pool())
    .await?;
    if row.is_none() {
        return Err(CatalogError::NotFound("asset group".to_string()));
    }
    Ok(())
}

async fn ensure_unique(
    store: &Store,
    code: &str,
    name: &str,
    exclude: Option<i64>,
) -> Result<(), CatalogError> {
    let exclude = exclude.unwrap_or(-1);
    let dup_code: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_types \
         WHERE type_code = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(code)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_code.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "asset type with code {code}"
        )));
    }
    let dup_name: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_types \
         WHERE type_name = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(name)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_name.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "asset type with name {name}"
        )));
    }
    Ok(())
}
