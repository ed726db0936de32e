use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;

use crate::db::models::{AssetGroupRow, IdName};
use crate::error::CatalogError;
use crate::excel;
use crate::handlers::{EDITORS, READERS, xlsx_headers};
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::asset_group::{
    self, AssetGroupInput, AssetGroupPageRequest, ImportReport,
};
use crate::types::Page;

pub async fn paginate(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(req): Json<AssetGroupPageRequest>,
) -> Result<Json<Page<AssetGroupRow>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_group::paginate(&state.store, req).await?))
}

pub async fn get(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<AssetGroupRow>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_group::get(&state.store, id).await?))
}

pub async fn create(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(input): Json<AssetGroupInput>,
) -> Result<Json<AssetGroupRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(asset_group::create(&state.store, input).await?))
}

pub async fn update(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<AssetGroupInput>,
) -> Result<Json<AssetGroupRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(asset_group::update(&state.store, id, input).await?))
}

pub async fn delete(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    asset_group::delete(&state.store, id).await?;
    Ok(Json(serde_json::json!({ "message": "deleted" })))
}

pub async fn suggest_code(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    let code = asset_group::suggest_code(&state.store).await?;
    Ok(Json(serde_json::json!({ "code": code })))
}

pub async fn active(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<IdName>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_group::active(&state.store).await?))
}

pub async fn export_template(user: CurrentUser) -> Result<impl IntoResponse, CatalogError> {
    user.require(READERS)?;
    let bytes = excel::asset_group::template()?;
    Ok((xlsx_headers("asset-group-template.xlsx"), bytes))
}

pub async fn export_groups(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, CatalogError> {
    user.require(READERS)?;
    let rows = asset_group::export_rows(&state.store).await?;
    let bytes = excel::asset_group::export(&rows)?;
    Ok((xlsx_headers("asset-groups.xlsx"), bytes))
}

/// Accepts a multipart upload with a single `file` field holding the
/// workbook, inserts valid rows and reports the rest per row.
pub async fn import(
    State(state): State<CatalogState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ImportReport>, CatalogError> {
    user.require(EDITORS)?;

    let mut bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CatalogError::Validation(format!("bad multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            bytes = Some(field.bytes().await.map_err(|e| {
                CatalogError::Validation(format!("cannot read uploaded file: {e}"))
            })?);
            break;
        }
    }
    let bytes = bytes.ok_or_else(|| {
        CatalogError::Validation("multipart field 'file' is required".to_string())
    })?;

    Ok(Json(asset_group::import(&state.store, &bytes).await?))
}
