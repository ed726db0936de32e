use calamine::{Reader, Xlsx};
use rust_xlsxwriter::{
    Color, DataValidation, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::io::Cursor;

use crate::db::models::{AssetGroupRow, Status};
use crate::error::CatalogError;

/// Sheet layout shared by template and export: row 1 title, row 2 header,
/// data from row 3 on. The import parser assumes the same layout.
pub const SHEET_NAME: &str = "NHÓM TÀI SẢN";
const HEADERS: [&str; 4] = ["Mã nhóm", "Tên nhóm", "Trạng thái", "Ghi chú"];
const COLUMN_WIDTHS: [f64; 4] = [15.0, 25.0, 15.0, 30.0];
const DATA_START: u32 = 2; // zero-based; sheet row 3

/// Empty template with two example rows and a status dropdown.
pub fn template() -> Result<Vec<u8>, CatalogError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    scaffold(worksheet)?;

    let example = data_format();
    let rows: [[&str; 4]; 2] = [
        ["NTS001", "Nhóm tài sản mẫu", "active", "Ví dụ ghi chú"],
        ["NTS002", "Nhóm 2", "inactive", ""],
    ];
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string_with_format(
                DATA_START + i as u32,
                col as u16,
                *value,
                &example,
            )?;
        }
    }
    add_status_dropdown(worksheet, DATA_START + rows.len() as u32 - 1)?;

    Ok(workbook.save_to_buffer()?)
}

/// Current asset groups rendered in the template layout.
pub fn export(rows: &[AssetGroupRow]) -> Result<Vec<u8>, CatalogError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    scaffold(worksheet)?;

    let data = data_format();
    for (i, group) in rows.iter().enumerate() {
        let r = DATA_START + i as u32;
        worksheet.write_string_with_format(r, 0, &group.group_code, &data)?;
        worksheet.write_string_with_format(r, 1, &group.group_name, &data)?;
        let status = match group.status {
            Status::Active => "active",
            Status::Inactive => "inactive",
        };
        worksheet.write_string_with_format(r, 2, status, &data)?;
        worksheet.write_string_with_format(
            r,
            3,
            group.note.as_deref().unwrap_or(""),
            &data,
        )?;
    }
    if !rows.is_empty() {
        add_status_dropdown(worksheet, DATA_START + rows.len() as u32 - 1)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// One raw data row from an uploaded workbook; `row` is the 1-based sheet
/// row for error reporting. Fully blank rows are dropped.
#[derive(Debug, Clone)]
pub struct ImportRow {
    pub row: u32,
    pub code: String,
    pub name: String,
    pub status: String,
    pub note: String,
}

pub fn parse_import(bytes: &[u8]) -> Result<Vec<ImportRow>, CatalogError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| CatalogError::Excel(format!("cannot open workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Excel("workbook has no sheets".to_string()))?
        .map_err(|e| CatalogError::Excel(format!("cannot read sheet: {e}")))?;

    let (start_row, _) = range.start().unwrap_or((0, 0));
    let mut rows = Vec::new();
    for (i, cells) in range.rows().enumerate() {
        let sheet_row = start_row + i as u32;
        if sheet_row < DATA_START {
            // title and header rows
            continue;
        }
        let cell = |col: usize| {
            cells
                .get(col)
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default()
        };
        let row = ImportRow {
            row: sheet_row + 1,
            code: cell(0),
            name: cell(1),
            status: cell(2),
            note: cell(3),
        };
        if row.code.is_empty() && row.name.is_empty() && row.status.is_empty() && row.note.is_empty()
        {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

fn scaffold(worksheet: &mut Worksheet) -> Result<(), CatalogError> {
    worksheet.set_name(SHEET_NAME)?;

    let title = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    worksheet.merge_range(0, 0, 0, 3, SHEET_NAME, &title)?;

    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_background_color(Color::RGB(0xDDEEFF));
    for (col, text) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *text, &header)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

fn data_format() -> Format {
    Format::new()
        .set_border_left(FormatBorder::Thin)
        .set_border_right(FormatBorder::Thin)
        .set_border_top(FormatBorder::Dotted)
        .set_border_bottom(FormatBorder::Dotted)
        .set_border_color(Color::RGB(0xAAAAAA))
}

fn add_status_dropdown(worksheet: &mut Worksheet, last_row: u32) -> Result<(), CatalogError> {
    let validation = DataValidation::new().allow_list_strings(&["active", "inactive"])?;
    worksheet.add_data_validation(DATA_START, 2, last_row, 2, &validation)?;
    Ok(())
}
