use axum::Json;
use axum::extract::{Query, State};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::error::CatalogError;
use crate::handlers::DASHBOARD_VIEWERS;
use crate::middleware::auth::CurrentUser;
use crate::router::CatalogState;
use crate::service::dashboard::{self, ChartCounts, MonthCount, PartnerProductCount};

#[derive(Debug, Default, Deserialize)]
pub struct LineChartQuery {
    pub year: Option<i32>,
}

pub async fn barchart(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<ChartCounts>, CatalogError> {
    user.require(DASHBOARD_VIEWERS)?;
    Ok(Json(dashboard::chart_counts(&state.store).await?))
}

pub async fn linechart(
    State(state): State<CatalogState>,
    user: CurrentUser,
    Query(query): Query<LineChartQuery>,
) -> Result<Json<Vec<MonthCount>>, CatalogError> {
    user.require(DASHBOARD_VIEWERS)?;
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    Ok(Json(dashboard::monthly_counts(&state.store, year).await?))
}

pub async fn product_partner(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<PartnerProductCount>>, CatalogError> {
    user.require(DASHBOARD_VIEWERS)?;
    Ok(Json(dashboard::partner_counts(&state.store).await?))
}
