mod common;

use std::fs;

use catalog::CatalogError;
use catalog::service::{asset_flow, asset_group, asset_type, partner, product};

#[tokio::test]
async fn group_with_live_types_cannot_be_deleted() {
    let (store, path) = common::temp_store("delete-group").await;

    let group_id = common::seed_group(&store, None, "Nhóm thiết bị").await;
    let type_id = common::seed_type(&store, group_id, "Loại máy chủ").await;

    let err = asset_group::delete(&store, group_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::CannotDelete(_)));

    // Once the referencing type is gone the group can go too.
    asset_type::delete(&store, type_id).await.unwrap();
    asset_group::delete(&store, group_id).await.unwrap();
    let err = asset_group::get(&store, group_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn flow_and_partner_with_live_products_cannot_be_deleted() {
    let (store, path) = common::temp_store("delete-flow-partner").await;

    let group_id = common::seed_group(&store, None, "Nhóm thiết bị").await;
    let type_id = common::seed_type(&store, group_id, "Loại máy chủ").await;
    let flow_id = common::seed_flow(&store, "Dòng nhập khẩu").await;
    let partner_id = common::seed_partner(&store, "DT001", "Đối tác A").await;
    let unit_id = common::seed_unit(&store, "Chiếc").await;

    let product_id = common::seed_product(
        &store,
        type_id,
        flow_id,
        unit_id,
        vec![partner_id],
        "Máy chủ Dell",
    )
    .await;

    let err = asset_flow::delete(&store, flow_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::CannotDelete(_)));
    let err = partner::delete(&store, partner_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::CannotDelete(_)));
    let err = asset_type::delete(&store, type_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::CannotDelete(_)));

    // Soft-deleting the product releases the soft-deleted references. The
    // asset type stays blocked at the database level: its removal is a hard
    // DELETE and the product row, though soft-deleted, still points at it.
    product::delete(&store, product_id).await.unwrap();
    asset_flow::delete(&store, flow_id).await.unwrap();
    partner::delete(&store, partner_id).await.unwrap();

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn duplicate_codes_are_conflicts() {
    let (store, path) = common::temp_store("dup-codes").await;

    common::seed_group(&store, Some("NTS010"), "Nhóm gốc").await;
    let err = asset_group::create(
        &store,
        catalog::service::asset_group::AssetGroupInput {
            group_code: Some("NTS010".to_string()),
            group_name: "Nhóm khác".to_string(),
            status: None,
            note: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyExists(_)));

    let _ = fs::remove_file(&path);
}
