#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use catalog::db::Store;
use catalog::service::asset_group::{self, AssetGroupInput};
use catalog::service::{asset_flow, asset_type, partner, product, unit};

/// Fresh on-disk database per test; remove the returned path when done.
pub async fn temp_store(tag: &str) -> (Store, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "catalog-{}-{}-{}.sqlite",
        tag,
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let store = Store::connect(&database_url)
        .await
        .expect("failed to open test database");
    (store, temp_path)
}

pub async fn seed_group(store: &Store, code: Option<&str>, name: &str) -> i64 {
    let row = asset_group::create(
        store,
        AssetGroupInput {
            group_code: code.map(str::to_string),
            group_name: name.to_string(),
            status: None,
            note: None,
        },
    )
    .await
    .expect("failed to seed asset group");
    row.id
}

pub async fn seed_type(store: &Store, group_id: i64, name: &str) -> i64 {
    asset_type::create(
        store,
        asset_type::AssetTypeInput {
            type_code: None,
            type_name: name.to_string(),
            group_id,
            management_type: None,
            status: None,
            note: None,
        },
    )
    .await
    .expect("failed to seed asset type")
    .id
}

pub async fn seed_flow(store: &Store, name: &str) -> i64 {
    asset_flow::create(
        store,
        asset_flow::AssetFlowInput {
            flow_code: None,
            flow_name: name.to_string(),
            status: None,
            note: None,
        },
    )
    .await
    .expect("failed to seed asset flow")
    .id
}

pub async fn seed_partner(store: &Store, code: &str, name: &str) -> i64 {
    partner::create(
        store,
        partner::PartnerInput {
            code: code.to_string(),
            name: name.to_string(),
            status: None,
            note: None,
        },
    )
    .await
    .expect("failed to seed partner")
    .id
}

pub async fn seed_unit(store: &Store, name: &str) -> i64 {
    unit::create(
        store,
        unit::UnitInput {
            name: name.to_string(),
        },
    )
    .await
    .expect("failed to seed unit")
    .id
}

pub async fn seed_product(
    store: &Store,
    asset_type_id: i64,
    asset_flow_id: i64,
    unit_id: i64,
    partner_ids: Vec<i64>,
    name: &str,
) -> i64 {
    product::create(
        store,
        product::ProductInput {
            product_code: None,
            product_name: name.to_string(),
            product_type: None,
            product_group: None,
            asset_type_id,
            asset_flow_id,
            unit_id,
            status: None,
            note: None,
            partner_ids,
        },
    )
    .await
    .expect("failed to seed product")
    .product
    .id
}
