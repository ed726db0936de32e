use axum::Json;
use axum::extract::{Path, State};

use crate::error::CatalogError;
use crate::handlers::{EDITORS, READERS};
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::product::{self, ProductDto, ProductInput, ProductPageRequest};
use crate::types::Page;

pub async fn paginate(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(req): Json<ProductPageRequest>,
) -> Result<Json<Page<ProductDto>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(product::paginate(&state.store, req).await?))
}

pub async fn get(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ProductDto>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(product::get(&state.store, id).await?))
}

pub async fn create(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductDto>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(product::create(&state.store, input).await?))
}

pub async fn update(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductDto>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(product::update(&state.store, id, input).await?))
}

pub async fn delete(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    product::delete(&state.store, id).await?;
    Ok(Json(serde_json::json!({ "message": "deleted" })))
}

pub async fn suggest_code(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, CatalogError> {
    user.require(EDITORS)?;
    let code = product::suggest_code(&state.store).await?;
    Ok(Json(serde_json::json!({ "code": code })))
}
