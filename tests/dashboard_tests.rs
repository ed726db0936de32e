mod common;

use std::fs;

use catalog::db::Store;
use catalog::service::{dashboard, product};

async fn seed_linked_product(store: &Store, partner_id: i64, name: &str) -> i64 {
    let group_id = common::seed_group(store, None, &format!("Nhóm {name}")).await;
    let type_id = common::seed_type(store, group_id, &format!("Loại {name}")).await;
    let flow_id = common::seed_flow(store, &format!("Dòng {name}")).await;
    let unit_id = common::seed_unit(store, &format!("ĐVT {name}")).await;
    common::seed_product(store, type_id, flow_id, unit_id, vec![partner_id], name).await
}

#[tokio::test]
async fn partner_counts_ignore_soft_deleted_products() {
    let (store, path) = common::temp_store("dashboard-partner-counts").await;

    let partner_id = common::seed_partner(&store, "DT001", "Đối tác A").await;
    let product_id = seed_linked_product(&store, partner_id, "Máy chủ Dell").await;

    let counts = dashboard::partner_counts(&store).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].partner_code, "DT001");
    assert_eq!(counts[0].count, 1);

    // The link row survives the soft delete but must stop counting.
    product::delete(&store, product_id).await.unwrap();
    let counts = dashboard::partner_counts(&store).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].count, 0);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn chart_counts_ignore_soft_deleted_products() {
    let (store, path) = common::temp_store("dashboard-chart-counts").await;

    let partner_id = common::seed_partner(&store, "DT001", "Đối tác A").await;
    seed_linked_product(&store, partner_id, "Máy chủ Dell").await;
    let gone = seed_linked_product(&store, partner_id, "Máy in HP").await;
    product::delete(&store, gone).await.unwrap();

    let charts = dashboard::chart_counts(&store).await.unwrap();
    let total: i64 = charts.by_group.iter().map(|c| c.count).sum();
    assert_eq!(total, 1);
    assert_eq!(charts.by_type.len(), 1);
    assert_eq!(charts.by_flow.len(), 1);

    let _ = fs::remove_file(&path);
}
