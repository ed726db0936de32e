//! Database module: models, schema and the shared store handle.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows plus the status/role enums
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `store.rs`: pool handle and cross-entity helpers (code generation,
//!   soft delete, refresh tokens)

pub mod models;
pub mod schema;
pub mod store;

pub use models::now_rfc3339;
pub use schema::SQLITE_INIT;
pub use store::{SqlitePool, Store};
