use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use crate::db::Store;
use crate::db::models::{IdName, PartnerRow, Status, now_rfc3339};
use crate::error::CatalogError;
use crate::service::validate::{validate_code, validate_name};
use crate::types::paginate::{Page, direction, filter, window};

const TABLE: &str = "partners";
const CODE_MAX: usize = 10;
const NAME_MAX: usize = 50;

const COLUMNS: &str = "id, code, name, status, note, created_at, updated_at, deleted_at";

/// Unlike the asset entities, partner codes are always entered manually;
/// there is no generated sequence for them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInput {
    pub code: String,
    pub name: String,
    pub status: Option<Status>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerPageRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_code: Option<String>,
    pub search_name: Option<String>,
    pub search_status: Option<String>,
    pub search_note: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

pub async fn create(store: &Store, input: PartnerInput) -> Result<PartnerRow, CatalogError> {
    let code = input.code.trim().to_string();
    validate_code(&code, CODE_MAX, "partner code")?;
    validate_name(&input.name, NAME_MAX, "partner name")?;
    ensure_unique(store, &code, &input.name, None).await?;

    let now = now_rfc3339();
    let res = sqlx::query(
        "INSERT INTO partners (code, name, status, note, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&code)
    .bind(&input.name)
    .bind(input.status.unwrap_or(Status::Active))
    .bind(&input.note)
    .bind(&now)
    .bind(&now)
    .execute(store.pool())
    .await?;

    info!(code = %code, "partner created");
    get(store, res.last_insert_rowid()).await
}

pub async fn get(store: &Store, id: i64) -> Result<PartnerRow, CatalogError> {
    let sql = format!("SELECT {COLUMNS} FROM partners WHERE id = ? AND deleted_at IS NULL");
    sqlx::query_as::<_, PartnerRow>(&sql)
        .bind(id)
        .fetch_optional(store.pool())
        .await?
        .ok_or_else(|| CatalogError::NotFound("partner".to_string()))
}

pub async fn update(
    store: &Store,
    id: i64,
    input: PartnerInput,
) -> Result<PartnerRow, CatalogError> {
    let existing = get(store, id).await?;

    let code = input.code.trim().to_string();
    validate_code(&code, CODE_MAX, "partner code")?;
    validate_name(&input.name, NAME_MAX, "partner name")?;
    ensure_unique(store, &code, &input.name, Some(id)).await?;

    sqlx::query(
        "UPDATE partners SET code = ?, name = ?, status = ?, note = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&code)
    .bind(&input.name)
    .bind(input.status.unwrap_or(existing.status))
    .bind(input.note.or(existing.note))
    .bind(now_rfc3339())
    .bind(id)
    .execute(store.pool())
    .await?;

    get(store, id).await
}

/// Refuses while any live product is linked to the partner, then soft-deletes.
pub async fn delete(store: &Store, id: i64) -> Result<(), CatalogError> {
    let partner = get(store, id).await?;

    let linked: Option<i64> = sqlx::query_scalar(
        "SELECT pp.product_id FROM product_partners pp \
         JOIN products p ON p.id = pp.product_id \
         WHERE pp.partner_id = ? AND p.deleted_at IS NULL LIMIT 1",
    )
    .bind(id)
    .fetch_optional(store.pool())
    .await?;
    if linked.is_some() {
        return Err(CatalogError::CannotDelete(format!(
            "partner {}",
            partner.code
        )));
    }

    store.soft_delete(TABLE, id).await?;
    info!(code = %partner.code, "partner soft-deleted");
    Ok(())
}

pub async fn paginate(
    store: &Store,
    req: PartnerPageRequest,
) -> Result<Page<PartnerRow>, CatalogError> {
    let (page, page_size, limit, offset) = window(req.page, req.page_size);

    let push_filters = |qb: &mut QueryBuilder<Sqlite>| {
        if let Some(v) = filter(&req.search_code) {
            qb.push(" AND code LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_name) {
            qb.push(" AND name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_status) {
            qb.push(" AND status = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_note) {
            qb.push(" AND note LIKE ").push_bind(format!("%{v}%"));
        }
    };

    let mut count_qb =
        QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM partners WHERE deleted_at IS NULL");
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(store.pool()).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM partners WHERE deleted_at IS NULL"
    ));
    push_filters(&mut qb);
    let col = sort_column(req.order_by.as_deref());
    let dir = direction(req.order_direction.as_deref());
    qb.push(format!(" ORDER BY {col} {dir} LIMIT "));
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    let data = qb
        .build_query_as::<PartnerRow>()
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
        Some("code") => "code",
        Some("name") => "name",
        Some("status") => "status",
        Some("note") => "note",
        _ => "id",
    }
}

pub async fn active(store: &Store) -> Result<Vec<IdName>, CatalogError> {
    let rows = sqlx::query_as::<_, IdName>(
        "SELECT id, name FROM partners \
         WHERE status = 'active' AND deleted_at IS NULL ORDER BY name",
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
        "SELECT id FROM partners WHERE code = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(code)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_code.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "partner with code {code}"
        )));
    }
    let dup_name: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM partners WHERE name = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(name)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_name.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "partner with name {name}"
        )));
    }
    Ok(())
}
