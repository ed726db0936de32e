use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::HashMap;
use tracing::info;

use crate::db::Store;
use crate::db::models::{IdName, ProductGroup, ProductRow, ProductType, Status, now_rfc3339};
use crate::error::CatalogError;
use crate::service::validate::{validate_code, validate_name};
use crate::types::paginate::{Page, direction, filter, window};

pub const CODE_PREFIX: &str = "HHDV";
pub const CODE_WIDTH: usize = 6;
const CODE_MAX: usize = 10;
const NAME_MAX: usize = 255;

const JOINED: &str = "p.id, p.product_code, p.product_name, p.product_type, p.product_group, \
                      p.asset_type_id, t.type_name, p.asset_flow_id, f.flow_name, \
                      p.unit_id, u.name AS unit_name, p.status, p.note";
const FROM: &str = "products p \
                    JOIN asset_types t ON t.id = p.asset_type_id \
                    JOIN asset_flows f ON f.id = p.asset_flow_id \
                    JOIN units u ON u.id = p.unit_id";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub product_code: Option<String>,
    pub product_name: String,
    pub product_type: Option<ProductType>,
    pub product_group: Option<ProductGroup>,
    pub asset_type_id: i64,
    pub asset_flow_id: i64,
    pub unit_id: i64,
    pub status: Option<Status>,
    pub note: Option<String>,
    #[serde(default)]
    pub partner_ids: Vec<i64>,
}

/// Product row plus its linked partners, as served to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(flatten)]
    pub product: ProductRow,
    pub partners: Vec<IdName>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPageRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_product_code: Option<String>,
    pub search_product_name: Option<String>,
    pub search_product_type: Option<String>,
    pub search_product_group: Option<String>,
    pub search_asset_type: Option<String>,
    pub search_asset_flow: Option<String>,
    pub search_unit: Option<String>,
    pub search_partner: Option<Vec<i64>>,
    pub search_status: Option<String>,
    pub search_note: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

pub async fn suggest_code(store: &Store) -> Result<String, CatalogError> {
    store
        .next_code("products", "product_code", CODE_PREFIX, CODE_WIDTH)
        .await
}

pub async fn create(store: &Store, mut input: ProductInput) -> Result<ProductDto, CatalogError> {
    let code = match input.product_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "product code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.product_name, NAME_MAX, "product name")?;
    ensure_unique(store, &code, &input.product_name, None).await?;
    ensure_references_exist(store, &input).await?;
    ensure_partners_exist(store, &input.partner_ids).await?;

    let now = now_rfc3339();
    let res = sqlx::query(
        "INSERT INTO products \
         (product_code, product_name, product_type, product_group, asset_type_id, \
          asset_flow_id, unit_id, status, note, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&code)
    .bind(&input.product_name)
    .bind(input.product_type.unwrap_or(ProductType::Product))
    .bind(input.product_group.unwrap_or(ProductGroup::Other))
    .bind(input.asset_type_id)
    .bind(input.asset_flow_id)
    .bind(input.unit_id)
    .bind(input.status.unwrap_or(Status::Active))
    .bind(&input.note)
    .bind(&now)
    .bind(&now)
    .execute(store.pool())
    .await?;

    let id = res.last_insert_rowid();
    replace_partner_links(store, id, &input.partner_ids).await?;
    info!(code = %code, "product created");
    get(store, id).await
}

pub async fn get(store: &Store, id: i64) -> Result<ProductDto, CatalogError> {
    let sql = format!("SELECT {JOINED} FROM {FROM} WHERE p.id = ? AND p.deleted_at IS NULL");
    let product = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(store.pool())
        .await?
        .ok_or_else(|| CatalogError::NotFound("product".to_string()))?;
    let partners = partners_for(store, &[id]).await?.remove(&id).unwrap_or_default();
    Ok(ProductDto { product, partners })
}

pub async fn update(
    store: &Store,
    id: i64,
    mut input: ProductInput,
) -> Result<ProductDto, CatalogError> {
    let existing = get(store, id).await?;

    let code = match input.product_code.take() {
        Some(code) if !code.trim().is_empty() => {
            let code = code.trim().to_string();
            validate_code(&code, CODE_MAX, "product code")?;
            code
        }
        _ => suggest_code(store).await?,
    };
    validate_name(&input.product_name, NAME_MAX, "product name")?;
    ensure_unique(store, &code, &input.product_name, Some(id)).await?;
    ensure_references_exist(store, &input).await?;
    ensure_partners_exist(store, &input.partner_ids).await?;

    sqlx::query(
        "UPDATE products SET product_code = ?, product_name = ?, product_type = ?, \
         product_group = ?, asset_type_id = ?, asset_flow_id = ?, unit_id = ?, \
         status = ?, note = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&code)
    .bind(&input.product_name)
    .bind(input.product_type.unwrap_or(existing.product.product_type))
    .bind(input.product_group.unwrap_or(existing.product.product_group))
    .bind(input.asset_type_id)
    .bind(input.asset_flow_id)
    .bind(input.unit_id)
    .bind(input.status.unwrap_or(existing.product.status))
    .bind(input.note.or(existing.product.note))
    .bind(now_rfc3339())
    .bind(id)
    .execute(store.pool())
    .await?;

    // Partner set is replaced wholesale on every update.
    replace_partner_links(store, id, &input.partner_ids).await?;
    get(store, id).await
}

pub async fn delete(store: &Store, id: i64) -> Result<(), CatalogError> {
    let product = get(store, id).await?;
    store.soft_delete("products", id).await?;
    info!(code = %product.product.product_code, "product soft-deleted");
    Ok(())
}

pub async fn paginate(
    store: &Store,
    req: ProductPageRequest,
) -> Result<Page<ProductDto>, CatalogError> {
    let (page, page_size, limit, offset) = window(req.page, req.page_size);

    let partner_ids = req.search_partner.clone().unwrap_or_default();
    let push_filters = |qb: &mut QueryBuilder<Sqlite>| {
        if let Some(v) = filter(&req.search_product_code) {
            qb.push(" AND p.product_code LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_product_name) {
            qb.push(" AND p.product_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_product_type) {
            qb.push(" AND p.product_type = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_product_group) {
            qb.push(" AND p.product_group = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_asset_type) {
            qb.push(" AND t.type_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_asset_flow) {
            qb.push(" AND f.flow_name LIKE ").push_bind(format!("%{v}%"));
        }
        if let Some(v) = filter(&req.search_unit) {
            qb.push(" AND u.name LIKE ").push_bind(format!("%{v}%"));
        }
        if !partner_ids.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM product_partners pp \
                 WHERE pp.product_id = p.id AND pp.partner_id IN (",
            );
            let mut sep = qb.separated(", ");
            for pid in &partner_ids {
                sep.push_bind(*pid);
            }
            qb.push("))");
        }
        if let Some(v) = filter(&req.search_status) {
            qb.push(" AND p.status = ").push_bind(v.to_string());
        }
        if let Some(v) = filter(&req.search_note) {
            qb.push(" AND p.note LIKE ").push_bind(format!("%{v}%"));
        }
    };

    let mut count_qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT COUNT(*) FROM {FROM} WHERE p.deleted_at IS NULL"
    ));
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(store.pool()).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {JOINED} FROM {FROM} WHERE p.deleted_at IS NULL"
    ));
    push_filters(&mut qb);
    let col = sort_column(req.order_by.as_deref());
    let dir = direction(req.order_direction.as_deref());
    qb.push(format!(" ORDER BY {col} {dir} LIMIT "));
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    let rows = qb
        .build_query_as::<ProductRow>()
        .fetch_all(store.pool())
        .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut partner_map = partners_for(store, &ids).await?;
    let data = rows
        .into_iter()
        .map(|product| {
            let partners = partner_map.remove(&product.id).unwrap_or_default();
            ProductDto { product, partners }
        })
        .collect();

    Ok(Page {
        data,
        total,
        page,
        page_size,
    })
}

fn sort_column(name: Option<&str>) -> &'static str {
    match name {
        Some("productCode" | "product_code") => "p.product_code",
        Some("productName" | "product_name") => "p.product_name",
        Some("productType" | "product_type") => "p.product_type",
        Some("productGroup" | "product_group") => "p.product_group",
        Some("assetType" | "asset_type") => "t.type_name",
        Some("assetFlow" | "asset_flow") => "f.flow_name",
        Some("unit") => "u.name",
        Some("status") => "p.status",
        Some("note") => "p.note",
        _ => "p.id",
    }
}

#[derive(FromRow)]
struct PartnerLink {
    product_id: i64,
    id: i64,
    name: String,
}

/// Partner lists for a set of products, one query for the whole page.
async fn partners_for(
    store: &Store,
    product_ids: &[i64],
) -> Result<HashMap<i64, Vec<IdName>>, CatalogError> {
    let mut map: HashMap<i64, Vec<IdName>> = HashMap::new();
    if product_ids.is_empty() {
        return Ok(map);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT pp.product_id, pa.id, pa.name FROM product_partners pp \
         JOIN partners pa ON pa.id = pp.partner_id WHERE pp.product_id IN (",
    );
    let mut sep = qb.separated(", ");
    for id in product_ids {
        sep.push_bind(*id);
    }
    qb.push(") ORDER BY pa.name");

    let links = qb
        .build_query_as::<PartnerLink>()
        .fetch_all(store.pool())
        .await?;
    for link in links {
        map.entry(link.product_id).or_default().push(IdName {
            id: link.id,
            name: link.name,
        });
    }
    Ok(map)
}

async fn replace_partner_links(
    store: &Store,
    product_id: i64,
    partner_ids: &[i64],
) -> Result<(), CatalogError> {
    let mut tx = store.pool().begin().await?;
    sqlx::query("DELETE FROM product_partners WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    for pid in partner_ids {
        sqlx::query("INSERT INTO product_partners (product_id, partner_id) VALUES (?, ?)")
            .bind(product_id)
            .bind(pid)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Every product must name at least one partner, and all of them must exist.
async fn ensure_partners_exist(store: &Store, partner_ids: &[i64]) -> Result<(), CatalogError> {
    if partner_ids.is_empty() {
        return Err(CatalogError::Validation("partner".to_string()));
    }
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) FROM partners WHERE deleted_at IS NULL AND id IN (",
    );
    let mut sep = qb.separated(", ");
    for pid in partner_ids {
        sep.push_bind(*pid);
    }
    qb.push(")");
    let found: i64 = qb.build_query_scalar().fetch_one(store.pool()).await?;
    if found as usize != partner_ids.len() {
        return Err(CatalogError::NotFound("some partners".to_string()));
    }
    Ok(())
}

async fn ensure_references_exist(store: &Store, input: &ProductInput) -> Result<(), CatalogError> {
    let ty: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_types WHERE id = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(input.asset_type_id)
    .fetch_optional(store.pool())
    .await?;
    if ty.is_none() {
        return Err(CatalogError::NotFound("asset type".to_string()));
    }
    let flow: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM asset_flows WHERE id = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(input.asset_flow_id)
    .fetch_optional(store.pool())
    .await?;
    if flow.is_none() {
        return Err(CatalogError::NotFound("asset flow".to_string()));
    }
    let unit: Option<i64> =
        sqlx::query_scalar("SELECT id FROM units WHERE id = ? AND deleted_at IS NULL LIMIT 1")
            .bind(input.unit_id)
            .fetch_optional(store.pool())
            .await?;
    if unit.is_none() {
        return Err(CatalogError::NotFound("unit".to_string()));
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
        "SELECT id FROM products \
         WHERE product_code = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(code)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_code.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "product with code {code}"
        )));
    }
    let dup_name: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM products \
         WHERE product_name = ? AND deleted_at IS NULL AND id != ? LIMIT 1",
    )
    .bind(name)
    .bind(exclude)
    .fetch_optional(store.pool())
    .await?;
    if dup_name.is_some() {
        return Err(CatalogError::AlreadyExists(format!(
            "product with name {name}"
        )));
    }
    Ok(())
}
