use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;

use crate::db::models::{Role, UserRow};
use crate::error::CatalogError;
use crate::middleware::auth::{
    ACCESS_COOKIE, CurrentUser, REFRESH_COOKIE, access_cookie, clear_cookie, refresh_cookie,
};
use crate::router::CatalogState;
use crate::service::auth_ops::{self, LoginRequest, RegisterRequest, UserInfo};

pub async fn register(
    State(state): State<CatalogState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, CatalogError> {
    auth_ops::register(&state.store, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "registered" })),
    ))
}

/// Issues both session cookies and returns the user's profile.
pub async fn login(
    State(state): State<CatalogState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, CatalogError> {
    let outcome = auth_ops::login(&state.store, req).await?;
    let jar = jar
        .add(access_cookie(outcome.access_token))
        .add(refresh_cookie(outcome.refresh_token));
    Ok((jar, Json(outcome.user)))
}

/// Revokes the refresh token's database record and expires both cookies.
/// Callable without a valid access token so a stale session can still end.
pub async fn logout(
    State(state): State<CatalogState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CatalogError> {
    let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_owned());
    auth_ops::logout(&state.store, refresh.as_deref()).await?;
    let jar = jar
        .remove(clear_cookie(ACCESS_COOKIE))
        .remove(clear_cookie(REFRESH_COOKIE));
    Ok((jar, Json(serde_json::json!({ "message": "logged out" }))))
}

pub async fn me(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<UserInfo>, CatalogError> {
    let info = auth_ops::current_user(&state.store, user.email()).await?;
    Ok(Json(info))
}

pub async fn list_users(
    State(state): State<CatalogState>,
    user: CurrentUser,
) -> Result<Json<Vec<UserRow>>, CatalogError> {
    user.require(&[Role::Admin])?;
    let users = auth_ops::list_users(&state.store).await?;
    Ok(Json(users))
}
