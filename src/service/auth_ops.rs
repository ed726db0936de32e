use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Store;
use crate::db::models::{Role, UserRow, now_rfc3339};
use crate::error::CatalogError;
use crate::middleware::auth::{mint_access_token, mint_refresh_token};
use crate::service::validate::validate_email;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Outcome of a successful login: signed token pair plus the user's profile.
/// The handler turns the tokens into cookies.
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

pub fn hash_password(password: &str) -> Result<String, CatalogError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CatalogError::Internal(format!("password hash failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn register(store: &Store, req: RegisterRequest) -> Result<(), CatalogError> {
    validate_email(&req.email)?;
    if req.name.trim().is_empty() {
        return Err(CatalogError::Validation("name".to_string()));
    }
    if req.password.is_empty() {
        return Err(CatalogError::Validation("password".to_string()));
    }
    if req.password != req.confirm_password {
        return Err(CatalogError::PasswordMismatch);
    }

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ? LIMIT 1")
        .bind(&req.email)
        .fetch_optional(store.pool())
        .await?;
    if existing.is_some() {
        return Err(CatalogError::AlreadyExists(req.email));
    }

    let hash = hash_password(&req.password)?;
    sqlx::query(
        "INSERT INTO users (full_name, email, password_hash, role, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(req.name.trim())
    .bind(&req.email)
    .bind(&hash)
    .bind(req.role.unwrap_or(Role::User))
    .bind(now_rfc3339())
    .execute(store.pool())
    .await?;

    info!(email = %req.email, "user registered");
    Ok(())
}

pub async fn login(store: &Store, req: LoginRequest) -> Result<LoginOutcome, CatalogError> {
    let user = find_by_email(store, &req.email)
        .await?
        .ok_or_else(|| CatalogError::NotFound("user".to_string()))?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(CatalogError::WrongCredentials);
    }

    let access_token = mint_access_token(&user.email, user.role)?;
    let refresh_token = mint_refresh_token(&user.email, user.role)?;
    store.insert_refresh_token(&refresh_token, user.id).await?;

    info!(email = %user.email, role = user.role.as_str(), "user logged in");
    Ok(LoginOutcome {
        access_token,
        refresh_token,
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.full_name,
            role: user.role,
        },
    })
}

pub async fn logout(store: &Store, refresh_token: Option<&str>) -> Result<(), CatalogError> {
    if let Some(token) = refresh_token {
        store.delete_refresh_token(token).await?;
    }
    Ok(())
}

pub async fn current_user(store: &Store, email: &str) -> Result<UserInfo, CatalogError> {
    let user = find_by_email(store, email)
        .await?
        .ok_or_else(|| CatalogError::NotFound("user".to_string()))?;
    Ok(UserInfo {
        id: user.id,
        email: user.email,
        name: user.full_name,
        role: user.role,
    })
}

pub async fn list_users(store: &Store) -> Result<Vec<UserRow>, CatalogError> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, full_name, email, password_hash, role, created_at FROM users ORDER BY id",
    )
    .fetch_all(store.pool())
    .await?;
    Ok(rows)
}

async fn find_by_email(store: &Store, email: &str) -> Result<Option<UserRow>, CatalogError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, full_name, email, password_hash, role, created_at \
         FROM users WHERE email = ? LIMIT 1",
    )
    .bind(email)
    .fetch_optional(store.pool())
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }
}
