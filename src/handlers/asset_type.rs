use axum::Json;
use axum::extract::{Path, State};

use crate::db::models::{AssetTypeRow, IdName};
use crate::error::CatalogError;
use crate::handlers::{EDITORS, READERS};
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::asset_type::{self, AssetTypeInput, AssetTypePageRequest};
use crate::types::Page;

pub async fn paginate(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(req): Json<AssetTypePageRequest>,
) -> Result<Json<Page<AssetTypeRow>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_type::paginate(&state.store, req).await?))
}

pub async fn get(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<AssetTypeRow>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_type::get(&state.store, id).await?))
}

pub async fn create(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(input): Json<AssetTypeInput>,
) -> Result<Json<AssetTypeRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(asset_type::create(&state.store, input).await?))
}

pub async fn update(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<AssetTypeInput>,
) -> Result<Json<AssetTypeRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(asset_type::update(&state.store, id, input).await?))
}

pub async fn delete(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    asset_type::delete(&state.store, id).await?;
    Ok(Json(serde_json::json!({ "message": "deleted" })))
}

pub async fn suggest_code(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    let code = asset_type::suggest_code(&state.store).await?;
    Ok(Json(serde_json::json!({ "code": code })))
}

pub async fn active(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<IdName>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_type::active(&state.store).await?))
}
