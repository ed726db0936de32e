use axum::Json;
use axum::extract::{Path, State};

use crate::db::models::{AssetFlowRow, IdName};
use crate::error::CatalogError;
use crate::handlers::{EDITORS, READERS};
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::asset_flow::{self, AssetFlowInput, AssetFlowPageRequest};
use crate::types::Page;

pub async fn paginate(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(req): Json<AssetFlowPageRequest>,
) -> Result<Json<Page<AssetFlowRow>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_flow::paginate(&state.store, req).await?))
}

pub async fn get(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<AssetFlowRow>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_flow::get(&state.store, id).await?))
}

pub async fn create(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(input): Json<AssetFlowInput>,
) -> Result<Json<AssetFlowRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(asset_flow::create(&state.store, input).await?))
}

pub async fn update(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<AssetFlowInput>,
) -> Result<Json<AssetFlowRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(asset_flow::update(&state.store, id, input).await?))
}

pub async fn delete(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    asset_flow::delete(&state.store, id).await?;
    Ok(Json(serde_json::json!({ "message": "deleted" })))
}

pub async fn suggest_code(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    let code = asset_flow::suggest_code(&state.store).await?;
    Ok(Json(serde_json::json!({ "code": code })))
}

pub async fn active(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<IdName>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(asset_flow::active(&state.store).await?))
}
