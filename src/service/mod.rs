//! Business rules per entity: validation, code generation, uniqueness and
//! referential checks, pagination. SQL lives here, next to the rules it
//! serves; the shared [`crate::db::Store`] only carries cross-entity helpers.

pub mod asset_flow;
pub mod asset_group;
pub mod asset_type;
pub mod auth_ops;
pub mod dashboard;
pub mod partner;
pub mod product;
pub mod unit;
pub mod validate;
