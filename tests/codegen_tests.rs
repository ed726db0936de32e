mod common;

use std::fs;

use catalog::service::{asset_group, product};

#[tokio::test]
async fn group_codes_start_at_one_and_increment() {
    let (store, path) = common::temp_store("codegen-groups").await;

    assert_eq!(asset_group::suggest_code(&store).await.unwrap(), "NTS001");

    common::seed_group(&store, Some("NTS005"), "Nhóm mẫu").await;
    assert_eq!(asset_group::suggest_code(&store).await.unwrap(), "NTS006");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn generated_code_skips_soft_deleted_rows() {
    let (store, path) = common::temp_store("codegen-deleted").await;

    let id = common::seed_group(&store, Some("NTS009"), "Nhóm sắp xóa").await;
    asset_group::delete(&store, id).await.unwrap();

    // Deleted rows no longer participate in the sequence lookup.
    assert_eq!(asset_group::suggest_code(&store).await.unwrap(), "NTS001");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn product_codes_use_six_digit_suffix() {
    let (store, path) = common::temp_store("codegen-products").await;

    assert_eq!(product::suggest_code(&store).await.unwrap(), "HHDV000001");

    let _ = fs::remove_file(&path);
}
