use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::Store;
use crate::error::CatalogError;

#[derive(Debug, Serialize, FromRow)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Product counts for the bar/pie charts: by product group, by asset type
/// name and by asset flow name. Soft-deleted products are excluded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCounts {
    pub by_group: Vec<LabelCount>,
    pub by_type: Vec<LabelCount>,
    pub by_flow: Vec<LabelCount>,
}

#[derive(Debug, Serialize)]
pub struct MonthCount {
    pub month: u32,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProductCount {
    pub partner_code: String,
    pub partner_name: String,
    pub count: i64,
}

pub async fn chart_counts(store: &Store) -> Result<ChartCounts, CatalogError> {
    let by_group = sqlx::query_as::<_, LabelCount>(
        "SELECT product_group AS label, COUNT(*) AS count FROM products \
         WHERE deleted_at IS NULL GROUP BY product_group",
    )
    .fetch_all(store.pool())
    .await?;

    let by_type = sqlx::query_as::<_, LabelCount>(
        "SELECT t.type_name AS label, COUNT(*) AS count FROM products p \
         LEFT JOIN asset_types t ON t.id = p.asset_type_id \
         WHERE p.deleted_at IS NULL GROUP BY p.asset_type_id",
    )
    .fetch_all(store.pool())
    .await?;

    let by_flow = sqlx::query_as::<_, LabelCount>(
        "SELECT f.flow_name AS label, COUNT(*) AS count FROM products p \
         LEFT JOIN asset_flows f ON f.id = p.asset_flow_id \
         WHERE p.deleted_at IS NULL GROUP BY p.asset_flow_id",
    )
    .fetch_all(store.pool())
    .await?;

    Ok(ChartCounts {
        by_group,
        by_type,
        by_flow,
    })
}

/// Month-by-month product stock for the line chart: how many products
/// existed at each month end of `year`. A product counts for a month when it
/// was created on or before the month end and not yet deleted by then, so
/// soft-deleted rows still appear in the months they were alive. Months that
/// have not ended yet are omitted.
pub async fn monthly_counts(store: &Store, year: i32) -> Result<Vec<MonthCount>, CatalogError> {
    let now = Utc::now();
    let mut result = Vec::new();
    for month in 1..=12 {
        let Some(end) = month_end(year, month) else {
            break;
        };
        if end > now {
            break;
        }
        let bound = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products \
             WHERE created_at <= ? AND (deleted_at IS NULL OR deleted_at > ?)",
        )
        .bind(&bound)
        .bind(&bound)
        .fetch_one(store.pool())
        .await?;
        result.push(MonthCount { month, count });
    }
    Ok(result)
}

/// Per-partner count of live products; links to soft-deleted products do
/// not count.
pub async fn partner_counts(store: &Store) -> Result<Vec<PartnerProductCount>, CatalogError> {
    let rows = sqlx::query_as::<_, PartnerProductCount>(
        "SELECT pa.code AS partner_code, pa.name AS partner_name, COUNT(p.id) AS count \
         FROM partners pa \
         LEFT JOIN product_partners pp ON pp.partner_id = pa.id \
         LEFT JOIN products p ON p.id = pp.product_id AND p.deleted_at IS NULL \
         WHERE pa.deleted_at IS NULL \
         GROUP BY pa.id, pa.name",
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}

/// Last second of the given month, UTC.
fn month_end(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    let last_day = first_of_next.pred_opt()?;
    let end = last_day.and_hms_opt(23, 59, 59)?;
    Some(Utc.from_utc_datetime(&end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_end_handles_year_boundary_and_leap_years() {
        let dec = month_end(2025, 12).unwrap();
        assert_eq!(
            dec.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2025-12-31T23:59:59Z"
        );
        let feb = month_end(2024, 2).unwrap();
        assert_eq!(
            feb.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2024-02-29T23:59:59Z"
        );
    }

    #[test]
    fn month_end_rejects_invalid_month() {
        assert!(month_end(2025, 13).is_none());
    }
}
