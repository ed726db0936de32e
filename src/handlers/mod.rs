//! HTTP request handlers. Each handler checks the caller's role, delegates
//! to the service layer and serializes the result; no SQL lives here.

pub mod asset_flow;
pub mod asset_group;
pub mod asset_type;
pub mod auth;
pub mod dashboard;
pub mod partner;
pub mod product;
pub mod unit;

use axum::http::{HeaderMap, HeaderValue, header};

use crate::db::models::Role;

/// Roles allowed to read catalog data.
pub const READERS: &[Role] = &[Role::Admin, Role::Staff, Role::User];
/// Roles allowed to create, update and delete catalog data.
pub const EDITORS: &[Role] = &[Role::Admin, Role::Staff];
/// Roles allowed to view the dashboard.
pub const DASHBOARD_VIEWERS: &[Role] = &[Role::Admin, Role::Bul, Role::User];

pub(crate) fn xlsx_headers(filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
    );
    if let Ok(value) = format!("attachment; filename=\"{filename}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}
