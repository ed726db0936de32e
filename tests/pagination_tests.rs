mod common;

use std::fs;

use catalog::service::asset_group::{self, AssetGroupPageRequest};

#[tokio::test]
async fn second_page_holds_the_remainder() {
    let (store, path) = common::temp_store("page-window").await;

    for i in 1..=15 {
        common::seed_group(&store, None, &format!("Nhóm {i:02}")).await;
    }

    let page = asset_group::paginate(
        &store,
        AssetGroupPageRequest {
            page: Some(2),
            page_size: Some(10),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.total, 15);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.data.len(), 5);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn blank_filters_match_everything() {
    let (store, path) = common::temp_store("page-blank-filters").await;

    common::seed_group(&store, None, "Nhóm A").await;
    common::seed_group(&store, None, "Nhóm B").await;

    let page = asset_group::paginate(
        &store,
        AssetGroupPageRequest {
            search_group_code: Some("".to_string()),
            search_group_name: Some("   ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.total, 2);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn filters_narrow_and_sort_orders() {
    let (store, path) = common::temp_store("page-filter-sort").await;

    common::seed_group(&store, Some("NTS001"), "Máy chủ").await;
    common::seed_group(&store, Some("NTS002"), "Máy in").await;
    common::seed_group(&store, Some("NTS003"), "Bàn ghế").await;

    let page = asset_group::paginate(
        &store,
        AssetGroupPageRequest {
            search_group_name: Some("Máy".to_string()),
            order_by: Some("groupCode".to_string()),
            order_direction: Some("desc".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.data[0].group_code, "NTS002");
    assert_eq!(page.data[1].group_code, "NTS001");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn soft_deleted_rows_never_appear() {
    let (store, path) = common::temp_store("page-soft-delete").await;

    common::seed_group(&store, None, "Nhóm còn").await;
    let gone = common::seed_group(&store, None, "Nhóm xóa").await;
    asset_group::delete(&store, gone).await.unwrap();

    let page = asset_group::paginate(&store, AssetGroupPageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].group_name, "Nhóm còn");

    let _ = fs::remove_file(&path);
}
