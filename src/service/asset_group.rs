use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use sqlx::Sqlite;
use tracing::info;

use crate::db::Store;
use crate::db::models::{AssetGroupRow, IdName, Status, now_rfc3339};
use crate::error::CatalogError;
use crate::excel;
use crate::service::validate::{validate_code, validate_name};
use crate::types::paginate::{Page, direction, filter, window};

const TABLE: &str = "asset_groups";
pub const CODE_PREFIX: &str = "NTS";
pub const CODE_WIDTH: usize = 3;
const CODE_MAX: usize = 6;
const NAME_MAX: usize = 50;

const COLUMNS: &str = "id, group_code, group_name, status, note, \
                       created_at, updated_at, deleted_at";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupInput {
    pub group_code: Option<String>,
    pub group_name: String,
    pub status: Option<Status>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetGroupPageRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_group_code: Option<String>,
    pub search_group_name: Option<String>,
    pub search_status: Option<String>,
    pub search_note: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RowError {
    pub row: u32,
    pub message: String,
}

/// Bulk import outcome: valid rows are inserted, invalid ones reported,
/// the batch never aborts as a whole.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub success: u32,
    pub errors: Vec<RowError>,
}

pub async fn suggest_code(store: &Store) -> Result<String, CatalogError> {
    store
        .next_code(TABLE, "group_code", CODE_PREFIX, CODE_WIDTH)
        .await
}

pub async fn create(store: &Store, mut input: AssetGroupInput) -> Result<AssetGroupRow, CatalogError> {
    let code = match input.group_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "group code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.group_name, NAME_MAX, "group name")?;
    ensure_unique(store, &code, &input.group_name, None).await?;

    let now = now_rfc3339();
    let res = sqlx::query(
        "INSERT INTO asset_groups (group_code, group_name, status, note, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&code)
    .bind(&input.group_name)
    .bind(input.status.unwrap_or(Status::Active))
    .bind(&input.note)
    .bind(&now)
    .bind(&now)
    .execute(store.pool())
    .await?;

    info!(code = %code, "asset group created");
    get(store, res.last_insert_rowid()).await
}

pub async fn get(store: &Store, id: i64) -> Result<AssetGroupRow, CatalogError> {
    let sql = format!("SELECT {COLUMNS} FROM asset_groups WHERE id = ? AND deleted_at IS NULL");
    sqlx::query_as::<_, AssetGroupRow>(&sql)
        .bind(id)
        .fetch_optional(store.pool())
        .await?
        .ok_or_else(|| CatalogError::NotFound("asset group".to_string()))
}

pub async fn update(
    store: &Store,
    id: i64,
    mut input: AssetGroupInput,
) -> Result<AssetGroupRow, CatalogError> {
    let existing = get(store, id).await?;

    let code = match input.group_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "group code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.group_name, NAME_MAX, "group name")?;
    ensure_unique(store, &code, &input.group_name, Some(id)).await?;

    sqlx::query(
        "UPDATE asset_groups SET group_code = ?, group_name = ?, status = ?, note = ?, \
         updated_at = ? WHERE id = ?",
    )
    .bind(&code)
    .bind(&input.group_name)
    .bind(input.status.unwrap_or(existing.status))
    .bind(input.note.or(existing.note))
    .bind(now_rfc3339())
    .bind(id)
    .execute(store.pool())
    .await?;

    get(store, id).await
}

/// Refuses while any live asset type still references the group, then
/// soft-deletes.
pub async fn delete(store: &Store, id: i64) -> Result<(), CatalogError> {
    let group = get(store, id).await?;

    let in_use: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_types WHERE group_id = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(id)
    .fetch_optional(store.pool())
    .await?;
    if in_use.is_some() {
        return Err(CatalogError::CannotDelete(format!(
            "asset group {}",
            group.group_code
        )));
    }

    store.soft_delete(TABLE, id).await?;
    info!(code = %group.group_code, "asset group soft-deleted");
    Ok(())
}

pub async fn paginate(
    store: &Store,
    req: AssetGroupPageRequest,
) -> Result<Page<AssetGroupRow>, CatalogError> {
    let (page, page_size, limit, offset) = window(req.page, req.page_size);

    let push_filters = |qb: &mut QueryBuilder<Sqlite>| {
        if let Some(v) = filter(&req.search_group_code) {
            qb.push(" AND group_code LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_group_name) {
            qb.push(" AND group_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_status) {
            qb.push(" AND status = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_note) {
            qb.push(" AND note LIKE ").push_bind(format!("%{v}%"));
        }
    };

    let mut count_qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) FROM asset_groups WHERE deleted_at IS NULL",
    );
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(store.pool()).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM asset_groups WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb);
    let col = sort_column(req.order_by.as_deref());
    let dir = direction(req.order_direction.as_deref());
    qb.push(format!(" ORDER BY {col} {dir} LIMIT "));
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    let data = qb
        .build_query_as::<AssetGroupRow>()
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
        Some("groupCode" | "group_code") => "group_code",
        Some("groupName" | "group_name") => "group_name",
        Some("status") => "status",
        Some("note") => "note",
        _ => "id",
    }
}

pub async fn active(store: &Store) -> Result<Vec<IdName>, CatalogError> {
    let rows = sqlx::query_as::<_, IdName>(
        "SELECT id, group_name AS name FROM asset_groups \
         WHERE status = 'active' AND deleted_at IS NULL ORDER BY group_name",
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}

pub async fn export_rows(store: &Store) -> Result<Vec<AssetGroupRow>, CatalogError> {
    let sql = format!("SELECT {COLUMNS} FROM asset_groups WHERE deleted_at IS NULL ORDER BY id");
    let rows = sqlx::query_as::<_, AssetGroupRow>(&sql)
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

/// Bulk import from an uploaded workbook. Mirrors create-validation per row
/// but accumulates errors instead of failing the batch.
pub async fn import(store: &Store, bytes: &[u8]) -> Result<ImportReport, CatalogError> {
    let rows = excel::asset_group::parse_import(bytes)?;

    let mut success = 0u32;
    let mut errors = Vec::new();
    for row in rows {
        let code = if row.code.is_empty() {
            suggest_code(store).await?
        } else {
            row.code.clone()
        };
        if validate_code(&code, CODE_MAX, "group code").is_err() {
            errors.push(RowError {
                row: row.row,
                message: "invalid group code".to_string(),
            });
            continue;
        }
        if row.name.is_empty() {
            errors.push(RowError {
                row: row.row,
                message: "group name must not be empty".to_string(),
            });
            continue;
        }
        if validate_name(&row.name, NAME_MAX, "group name").is_err() {
            errors.push(RowError {
                row: row.row,
                message: "group name exceeds 50 characters".to_string(),
            });
            continue;
        }
        let Some(status) = Status::parse(&row.status.to_lowercase()) else {
            errors.push(RowError {
                row: row.row,
                message: "status must be active or inactive".to_string(),
            });
            continue;
        };
        if code_exists(store, &code).await? {
            errors.push(RowError {
                row: row.row,
                message: format!("group code '{code}' already exists"),
            });
            continue;
        }
        if name_exists(store, &row.name).await? {
            errors.push(RowError {
                row: row.row,
                message: format!("group name '{}' already exists", row.name),
            });
            continue;
        }

        let now = now_rfc3339();
        sqlx::query(
            "INSERT INTO asset_groups \
             (group_code, group_name, status, note, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&code)
        .bind(&row.name)
        .bind(status)
        .bind((!row.note.is_empty()).then(|| row.note.clone()))
        .bind(&now)
        .bind(&now)
        .execute(store.pool())
        .await?;
        success += 1;
    }

    info!(success, failed = errors.len(), "asset group import finished");
    Ok(ImportReport { success, errors })
}

async fn code_exists(store: &Store, code: &str) -> Result<bool, CatalogError> {
    let row: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_groups WHERE group_code = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(code)
    .fetch_optional(store.pool())
    .await?;
    Ok(row.is_some())
}

async fn name_exists(store: &Store, name: &str) -> Result<bool, CatalogError> {
    let row: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_groups WHERE group_name = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(name)
    .fetch_optional(store.pool())
    .await?;
    Ok(row.is_some())
}

async fn ensure_unique(
    store: &Store,
    code: &str,
    name: &str,
    exclude: Option<i64>,
) -> Result<(), CatalogError> {
    let exclude = exclude.unwrap_or(-1);
    let dup_code: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_groups \
         WHERE group_code = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(code)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_code.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "asset group with code {code}"
        )));
    }
    let dup_name: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_groups \
         WHERE group_name = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(name)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_name.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "asset group with name {name}"
        )));
    }
    Ok(())
}
