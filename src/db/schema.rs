//! SQL DDL for initializing the catalog database.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema for the whole catalog:
/// - Integer surrogate primary keys everywhere
/// - Human-readable `*_code` columns UNIQUE per table
/// - Display names UNIQUE per table
/// - `status` stored as TEXT (`active` / `inactive`)
/// - Timestamps stored as RFC3339 TEXT; `deleted_at` drives soft deletion
///
/// The UNIQUE constraints are the backstop for the unguarded read-then-write
/// race in code generation: the second concurrent writer surfaces a conflict.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS asset_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_code TEXT NOT NULL UNIQUE,
    group_name TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL DEFAULT 'active',
    note TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS asset_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type_code TEXT NOT NULL UNIQUE,
    type_name TEXT NOT NULL UNIQUE,
    group_id INTEGER NOT NULL REFERENCES asset_groups(id),
    management_type TEXT NOT NULL DEFAULT 'quantity',
    status TEXT NOT NULL DEFAULT 'active',
    note TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS asset_flows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flow_code TEXT NOT NULL UNIQUE,
    flow_name TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL DEFAULT 'active',
    note TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS partners (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL DEFAULT 'active',
    note TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_code TEXT NOT NULL UNIQUE,
    product_name TEXT NOT NULL UNIQUE,
    product_type TEXT NOT NULL DEFAULT 'product',
    product_group TEXT NOT NULL DEFAULT 'other',
    asset_type_id INTEGER NOT NULL REFERENCES asset_types(id),
    asset_flow_id INTEGER NOT NULL REFERENCES asset_flows(id),
    unit_id INTEGER NOT NULL REFERENCES units(id),
    status TEXT NOT NULL DEFAULT 'active',
    note TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS product_partners (
    product_id INTEGER NOT NULL REFERENCES products(id),
    partner_id INTEGER NOT NULL REFERENCES partners(id),
    PRIMARY KEY (product_id, partner_id)
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS refresh_tokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    token TEXT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_asset_types_group_id ON asset_types(group_id);
CREATE INDEX IF NOT EXISTS idx_products_asset_type_id ON products(asset_type_id);
CREATE INDEX IF NOT EXISTS idx_products_asset_flow_id ON products(asset_flow_id);
CREATE INDEX IF NOT EXISTS idx_products_unit_id ON products(unit_id);
CREATE INDEX IF NOT EXISTS idx_refresh_tokens_token ON refresh_tokens(token);
"#;
