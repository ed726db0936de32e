use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Current instant as RFC3339 UTC with whole seconds ("2026-08-27T09:00:00Z").
/// The fixed width keeps lexicographic ordering equal to chronological
/// ordering, which the dashboard history queries rely on.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Status::Active),
            "inactive" => Some(Status::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ManagementType {
    Quantity,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProductType {
    Product,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ProductGroup {
    #[serde(rename = "telecommunications")]
    #[sqlx(rename = "telecommunications")]
    Telecommunications,
    #[serde(rename = "IT")]
    #[sqlx(rename = "IT")]
    It,
    #[serde(rename = "RD")]
    #[sqlx(rename = "RD")]
    Rd,
    #[serde(rename = "fixedasset")]
    #[sqlx(rename = "fixedasset")]
    FixedAsset,
    #[serde(rename = "buildingindorinfras")]
    #[sqlx(rename = "buildingindorinfras")]
    BuildingInfrastructure,
    #[serde(rename = "other")]
    #[sqlx(rename = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Bul,
    Staff,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Bul => "bul",
            Role::Staff => "staff",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupRow {
    pub id: i64,
    pub group_code: String,
    pub group_name: String,
    pub status: Status,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Asset type row joined with its group's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssetTypeRow {
    pub id: i64,
    pub type_code: String,
    pub type_name: String,
    pub group_id: i64,
    pub group_name: String,
    pub management_type: ManagementType,
    pub status: Status,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssetFlowRow {
    pub id: i64,
    pub flow_code: String,
    pub flow_name: String,
    pub status: Status,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub status: Status,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UnitRow {
    pub id: i64,
    pub name: String,
}

/// Product row joined with type/flow/unit display names.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: i64,
    pub product_code: String,
    pub product_name: String,
    pub product_type: ProductType,
    pub product_group: ProductGroup,
    pub asset_type_id: i64,
    pub type_name: String,
    pub asset_flow_id: i64,
    pub flow_name: String,
    pub unit_id: i64,
    pub unit_name: String,
    pub status: Status,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

/// `(id, name)` projection used by the active-list endpoints.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IdName {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!(Status::parse("active"), Some(Status::Active));
        assert_eq!(Status::parse("inactive"), Some(Status::Inactive));
        assert_eq!(Status::parse("ACTIVE"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn product_group_serializes_original_wire_names() {
        let json = serde_json::to_string(&ProductGroup::It).unwrap();
        assert_eq!(json, r#""IT""#);
        let json = serde_json::to_string(&ProductGroup::BuildingInfrastructure).unwrap();
        assert_eq!(json, r#""buildingindorinfras""#);
    }

    #[test]
    fn now_rfc3339_is_fixed_width_utc() {
        let s = now_rfc3339();
        assert!(s.ends_with('Z'));
        assert_eq!(s.len(), 20);
    }
}
