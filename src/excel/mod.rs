//! Excel (.xlsx) workbook building and parsing.
//!
//! Writing goes through `rust_xlsxwriter`, reading through `calamine`; the
//! row validation that accompanies a bulk import stays in the service layer.

pub mod asset_group;

use crate::error::CatalogError;

impl From<rust_xlsxwriter::XlsxError> for CatalogError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CatalogError::Excel(e.to_string())
    }
}
