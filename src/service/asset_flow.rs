use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use crate::db::Store;
use crate::db::models::{AssetFlowRow, IdName, Status, now_rfc3339};
use crate::error::CatalogError;
use crate::service::validate::{validate_code, validate_name};
use crate::types::paginate::{Page, direction, filter, window};

const TABLE: &str = "asset_flows";
pub const CODE_PREFIX: &str = "DTS";
pub const CODE_WIDTH: usize = 3;
const CODE_MAX: usize = 6;
const NAME_MAX: usize = 50;

const COLUMNS: &str = "id, flow_code, flow_name, status, note, \
                       created_at, updated_at, deleted_at";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFlowInput {
    pub flow_code: Option<String>,
    pub flow_name: String,
    pub status: Option<Status>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetFlowPageRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_flow_code: Option<String>,
    pub search_flow_name: Option<String>,
    pub search_status: Option<String>,
    pub search_note: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

pub async fn suggest_code(store: &Store) -> Result<String, CatalogError> {
    store
        .next_code(TABLE, "flow_code", CODE_PREFIX, CODE_WIDTH)
        .await
}

pub async fn create(store: &Store, mut input: AssetFlowInput) -> Result<AssetFlowRow, CatalogError> {
    let code = match input.flow_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "flow code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.flow_name, NAME_MAX, "flow name")?;
    ensure_unique(store, &code, &input.flow_name, None).await?;

    let now = now_rfc3339();
    let res = sqlx::query(
        "INSERT INTO asset_flows (flow_code, flow_name, status, note, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&code)
    .bind(&input.flow_name)
    .bind(input.status.unwrap_or(Status::Active))
    .bind(&input.note)
    .bind(&now)
    .bind(&now)
    .execute(store.pool())
    .await?;

    info!(code = %code, "asset flow created");
    get(store, res.last_insert_rowid()).await
}

pub async fn get(store: &Store, id: i64) -> Result<AssetFlowRow, CatalogError> {
    let sql = format!("SELECT {COLUMNS} FROM asset_flows WHERE id = ? AND deleted_at IS NULL");
    sqlx::query_as::<_, AssetFlowRow>(&sql)
        .bind(id)
        .fetch_optional(store.pool())
        .await?
        .ok_or_else(|| CatalogError::NotFound("asset flow".to_string()))
}

pub async fn update(
    store: &Store,
    id: i64,
    mut input: AssetFlowInput,
) -> Result<AssetFlowRow, CatalogError> {
    let existing = get(store, id).await?;

    let code = match input.flow_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "flow code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.flow_name, NAME_MAX, "flow name")?;
    ensure_unique(store, &code, &input.flow_name, Some(id)).await?;

    sqlx::query(
        "UPDATE asset_flows SET flow_code = ?, flow_name = ?, status = ?, note = ?, \
         updated_at = ? WHERE id = ?",
    )
    .bind(&code)
    .bind(&input.flow_name)
    .bind(input.status.unwrap_or(existing.status))
    .bind(input.note.or(existing.note))
    .bind(now_rfc3339())
    .bind(id)
    .execute(store.pool())
    .await?;

    get(store, id).await
}

/// Refuses while any live product still references the flow, then soft-deletes.
pub async fn delete(store: &Store, id: i64) -> Result<(), CatalogError> {
    let flow = get(store, id).await?;

    let in_use: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM products WHERE asset_flow_id = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(id)
    .fetch_optional(store.pool())
    .await?;
    if in_use.is_some() {
        return Err(CatalogError::CannotDelete(format!(
            "asset flow {}",
            flow.flow_code
        )));
    }

    store.soft_delete(TABLE, id).await?;
    info!(code = %flow.flow_code, "asset flow soft-deleted");
    Ok(())
}

pub async fn paginate(
    store: &Store,
    req: AssetFlowPageRequest,
) -> Result<Page<AssetFlowRow>, CatalogError> {
    let (page, page_size, limit, offset) = window(req.page, req.page_size);

    let push_filters = |qb: &mut QueryBuilder<Sqlite>| {
        if let Some(v) = filter(&req.search_flow_code) {
            qb.push(" AND flow_code LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_flow_name) {
            qb.push(" AND flow_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_status) {
            qb.push(" AND status = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_note) {
            qb.push(" AND note LIKE ").push_bind(format!("%{v}%"));
        }
    };

    let mut count_qb =
        QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM asset_flows WHERE deleted_at IS NULL");
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(store.pool()).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM asset_flows WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb);
    let col = sort_column(req.order_by.as_deref());
    let dir = direction(req.order_direction.as_deref());
    qb.push(format!(" ORDER BY {col} {dir} LIMIT "));
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    let data = qb
        .build_query_as::<AssetFlowRow>()
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
        Some("flowCode" | "flow_code") => "flow_code",
        Some("flowName" | "flow_name") => "flow_name",
        Some("status") => "status",
        Some("note") => "note",
        _ => "id",
    }
}

pub async fn active(store: &Store) -> Result<Vec<IdName>, CatalogError> {
    let rows = sqlx::query_as::<_, IdName>(
        "SELECT id, flow_name AS name FROM asset_flows \
         WHERE status = 'active' AND deleted_at IS NULL ORDER BY flow_name",
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}

async fn ensure_unique(
    store: &Store,
    code: &str,
    name: &str,
    exclude: Option<i64>,
) -> Result<(), CatalogError> {
    let exclude = exclude.unwrap_or(-1);
    let dup_code: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_flows \
         WHERE flow_code = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(code)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_code.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "asset flow with code {code}"
        )));
    }
    let dup_name: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_flows \
         WHERE flow_name = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(name)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_name.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "asset flow with name {name}"
        )));
    }
    Ok(())
}
