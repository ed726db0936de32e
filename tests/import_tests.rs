mod common;

use std::fs;

use catalog::service::asset_group;
use rust_xlsxwriter::Workbook;

/// Workbook in the published template layout: title, header, then data rows.
fn import_workbook(rows: &[[&str; 4]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "NHÓM TÀI SẢN").unwrap();
    for (col, text) in ["Mã nhóm", "Tên nhóm", "Trạng thái", "Ghi chú"]
        .iter()
        .enumerate()
    {
        worksheet.write_string(1, col as u16, *text).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(2 + i as u32, col as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn import_inserts_valid_rows_and_reports_the_rest() {
    let (store, path) = common::temp_store("import-mixed").await;

    let bytes = import_workbook(&[
        ["", "Nhóm nhập khẩu", "active", "ghi chú"],
        ["NTS!", "Nhóm xấu", "active", ""],
        ["", "Nhóm nhập khẩu", "active", ""],
        ["", "Nhóm khác", "maybe", ""],
    ]);

    let report = asset_group::import(&store, &bytes).await.unwrap();
    assert_eq!(report.success, 1);
    assert_eq!(report.errors.len(), 3);

    // Row numbers are 1-based sheet rows; data starts on sheet row 3.
    let rows: Vec<u32> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![4, 5, 6]);

    let inserted = asset_group::export_rows(&store).await.unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].group_name, "Nhóm nhập khẩu");
    assert_eq!(inserted[0].group_code, "NTS001");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn import_skips_fully_blank_rows() {
    let (store, path) = common::temp_store("import-blank").await;

    let bytes = import_workbook(&[
        ["", "Nhóm một", "active", ""],
        ["", "", "", ""],
        ["", "Nhóm hai", "inactive", ""],
    ]);

    let report = asset_group::import(&store, &bytes).await.unwrap();
    assert_eq!(report.success, 2);
    assert!(report.errors.is_empty());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn template_and_export_round_trip_through_the_parser() {
    let (store, path) = common::temp_store("import-round-trip").await;

    // The published template's example rows parse back as two data rows.
    let template = catalog::excel::asset_group::template().unwrap();
    let parsed = catalog::excel::asset_group::parse_import(&template).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].code, "NTS001");
    assert_eq!(parsed[0].status, "active");

    common::seed_group(&store, Some("NTS777"), "Nhóm xuất").await;
    let exported = catalog::excel::asset_group::export(
        &asset_group::export_rows(&store).await.unwrap(),
    )
    .unwrap();
    let parsed = catalog::excel::asset_group::parse_import(&exported).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].code, "NTS777");
    assert_eq!(parsed[0].name, "Nhóm xuất");

    let _ = fs::remove_file(&path);
}
