use axum::Json;
use axum::extract::State;

use crate::db::models::UnitRow;
use crate::error::CatalogError;
use crate::handlers::{EDITORS, READERS};
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::unit::{self, UnitInput};

pub async fn list(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<UnitRow>>, CatalogError> {
    user.require(READERS)?;
    Ok(Json(unit::list(&state.store).await?))
}

pub async fn create(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Json(input): Json<UnitInput>,
) -> Result<Json<UnitRow>, CatalogError> {
    user.require(EDITORS)?;
    Ok(Json(unit::create(&state.store, input).await?))
}
