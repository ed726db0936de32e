use axum::Json;
use axum::extract::{Path, State};

use crate::db::models::{IdName, PartnerRow};
use crate::error::CatalogError;
use crate::handlers::{EDITORS, READERS};
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::partner::{self, PartnerInput, PartnerPageRequest};
use crate::types::Page;

pub async fn paginate(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(req): Json<PartnerPageRequest>,
) -> Result<Json<Page<PartnerRow>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(partner::paginate(&state.store, req).await?))
}

pub async fn get(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<PartnerRow>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(partner::get(&state.store, id).await?))
}

pub async fn create(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(input): Json<PartnerInput>,
) -> Result<Json<PartnerRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(partner::create(&state.store, input).await?))
}

pub async fn update(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<PartnerInput>,
) -> Result<Json<PartnerRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(partner::update(&state.store, id, input).await?))
}

pub async fn delete(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    partner::delete(&state.store, id).await?;
    Ok(Json(serde_json::json!({ "message": "deleted" })))
}

pub async fn active(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<IdName>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(partner::active(&state.store).await?))
}
