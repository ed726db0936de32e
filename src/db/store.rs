use crate::db::models::now_rfc3339;
use crate::db::schema::SQLITE_INIT;
use crate::error::CatalogError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Shared handle to the catalog database.
///
/// Entity-specific queries live in the service modules; this type owns the
/// pool plus the cross-entity helpers (schema init, code generation,
/// soft delete, refresh-token bookkeeping).
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(database_url: &str) -> Result<Self, CatalogError> {
        let connect_opts =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CatalogError> {
        // execute statement by statement (sqlx::query rejects multi-commands)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Next unused code in a fixed-prefix, zero-padded sequence.
    ///
    /// Looks up the lexicographically maximal live code starting with
    /// `prefix`, parses its decimal suffix and increments it; starts at 1 when
    /// no row matches. Lexicographic ordering is only correct because the
    /// generated suffix width is fixed; a manually entered code of a different
    /// width can make the lookup pick the wrong row and yield a colliding or
    /// retrograde suggestion. That collision is caught by the UNIQUE
    /// constraint at insert time.
    ///
    /// `table` and `column` are compile-time identifiers supplied by the
    /// entity services, never user input.
    pub async fn next_code(
        &self,
        table: &str,
        column: &str,
        prefix: &str,
        width: usize,
    ) -> Result<String, CatalogError> {
        let sql = format!(
            "SELECT {column} FROM {table} \
             WHERE {column} LIKE ? AND deleted_at IS NULL \
             ORDER BY {column} DESC LIMIT 1"
        );
        let last: Option<String> = sqlx::query_scalar(&sql)
            .bind(format!("{prefix}%"))
            .fetch_optional(&self.pool)
            .await?;

        let mut next = 1u64;
        if let Some(last) = last
            && let Some(digits) = last.strip_prefix(prefix)
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = digits.parse::<u64>()
        {
            next = n + 1;
        }
        Ok(format!("{prefix}{next:0width$}"))
    }

    /// Mark a row deleted by timestamp. Returns false when no live row matched.
    pub async fn soft_delete(&self, table: &str, id: i64) -> Result<bool, CatalogError> {
        let now = now_rfc3339();
        let sql = format!(
            "UPDATE {table} SET deleted_at = ?, updated_at = ? \
             WHERE id = ? AND deleted_at IS NULL"
        );
        let res = sqlx::query(&sql)
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn insert_refresh_token(
        &self,
        token: &str,
        user_id: i64,
    ) -> Result<(), CatalogError> {
        sqlx::query("INSERT INTO refresh_tokens (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(now_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn refresh_token_exists(&self, token: &str) -> Result<bool, CatalogError> {
        let row: Option<i64> =
            sqlx::query_scalar("SELECT id FROM refresh_tokens WHERE token = ? LIMIT 1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Revocation is modeled by deleting the persisted token record.
    pub async fn delete_refresh_token(&self, token: &str) -> Result<(), CatalogError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
