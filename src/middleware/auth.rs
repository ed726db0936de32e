use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CONFIG;
use crate::db::models::Role;
use crate::error::CatalogError;
use crate::router::CatalogState;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

fn mint(email: &str, role: Role, secret: &str, ttl: i64) -> Result<String, CatalogError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: email.to_string(),
        role,
        iat: now,
        exp: now + ttl,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CatalogError::Internal(format!("JWT encode failed: {e}")))
}

pub fn mint_access_token(email: &str, role: Role) -> Result<String, CatalogError> {
    mint(
        email,
        role,
        &CONFIG.access_token_secret,
        CONFIG.access_token_ttl,
    )
}

pub fn mint_refresh_token(email: &str, role: Role) -> Result<String, CatalogError> {
    mint(
        email,
        role,
        &CONFIG.refresh_token_secret,
        CONFIG.refresh_token_ttl,
    )
}

fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Cookie-based session middleware.
///
/// State machine: no access cookie -> reject; valid access token ->
/// authenticated; expired access token + refresh token with a live DB record
/// -> reissue the access cookie on the response and proceed; anything else ->
/// reject. The refresh token itself is never rotated on use; revocation is
/// the deletion of its DB record (see logout).
pub async fn authenticate(
    State(state): State<CatalogState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, CatalogError> {
    let access = jar
        .get(ACCESS_COOKIE)
        .ok_or(CatalogError::MissingAccessToken)?
        .value()
        .to_owned();

    match verify(&access, &CONFIG.access_token_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser(claims));
            Ok(next.run(req).await)
        }
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            let refresh = jar
                .get(REFRESH_COOKIE)
                .ok_or(CatalogError::InvalidToken)?
                .value()
                .to_owned();
            let claims = verify(&refresh, &CONFIG.refresh_token_secret)
                .map_err(|_| CatalogError::InvalidToken)?;
            if !state.store.refresh_token_exists(&refresh).await? {
                return Err(CatalogError::InvalidToken);
            }

            let new_access = mint_access_token(&claims.sub, claims.role)?;
            debug!(email = %claims.sub, "reissued access token from refresh token");
            req.extensions_mut().insert(CurrentUser(claims));
            let resp = next.run(req).await;
            let jar = CookieJar::new().add(access_cookie(new_access));
            Ok((jar, resp).into_response())
        }
        Err(_) => Err(CatalogError::InvalidToken),
    }
}

/// Authenticated user claims, attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl CurrentUser {
    pub fn email(&self) -> &str {
        &self.0.sub
    }

    pub fn require(&self, allowed: &[Role]) -> Result<(), CatalogError> {
        if allowed.contains(&self.0.role) {
            Ok(())
        } else {
            Err(CatalogError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(CatalogError::MissingAccessToken)
    }
}

pub fn access_cookie(token: String) -> Cookie<'static> {
    session_cookie(ACCESS_COOKIE, token, CONFIG.access_token_ttl)
}

pub fn refresh_cookie(token: String) -> Cookie<'static> {
    session_cookie(REFRESH_COOKIE, token, CONFIG.refresh_token_ttl)
}

fn session_cookie(name: &str, value: String, ttl_secs: i64) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(CONFIG.secure_cookies)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(ttl_secs))
        .build()
}

pub fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_and_verify_round_trip() {
        let token = mint("a@b.co", Role::Staff, "secret", 60).unwrap();
        let claims = verify(&token, "secret").unwrap();
        assert_eq!(claims.sub, "a@b.co");
        assert_eq!(claims.role, Role::Staff);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint("a@b.co", Role::Admin, "secret", 60).unwrap();
        assert!(verify(&token, "other").is_err());
    }

    #[test]
    fn expired_token_reports_expired_kind() {
        // Well past the default 60s leeway.
        let token = mint("a@b.co", Role::User, "secret", -3600).unwrap();
        let err = verify(&token, "secret").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn require_enforces_role_allow_list() {
        let user = CurrentUser(Claims {
            sub: "a@b.co".into(),
            role: Role::User,
            iat: 0,
            exp: 0,
        });
        assert!(user.require(&[Role::Admin, Role::Staff]).is_err());
        assert!(user.require(&[Role::User]).is_ok());
    }
}
