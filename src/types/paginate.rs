use serde::Serialize;

/// One page of a filtered listing. `total` counts every row matching the
/// predicate, not just the returned window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Normalize the page window. Page numbers are 1-based; offset is
/// `(page - 1) * page_size`, saturating so absurd page numbers select an
/// empty window instead of overflowing. No upper bound is enforced on
/// `page_size`.
pub fn window(page: Option<u32>, page_size: Option<u32>) -> (u32, u32, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(10).max(1);
    let limit = page_size as i64;
    let offset = (page as i64 - 1).saturating_mul(limit);
    (page, page_size, limit, offset)
}

/// Treat unspecified or blank filter fields as absent (no implicit
/// equality-to-empty matching).
pub fn filter(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn direction(dir: Option<&str>) -> &'static str {
    match dir {
        Some(d) if d.eq_ignore_ascii_case("desc") => "DESC",
        _ => "ASC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_and_offsets() {
        assert_eq!(window(None, None), (1, 10, 10, 0));
        assert_eq!(window(Some(2), Some(10)), (2, 10, 10, 10));
        assert_eq!(window(Some(0), Some(5)), (1, 5, 5, 0));
    }

    #[test]
    fn window_saturates_instead_of_overflowing() {
        let (page, page_size, limit, offset) = window(Some(u32::MAX), Some(u32::MAX));
        assert_eq!(page, u32::MAX);
        assert_eq!(page_size, u32::MAX);
        assert_eq!(limit, u32::MAX as i64);
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn blank_filters_are_absent() {
        assert_eq!(filter(&None), None);
        assert_eq!(filter(&Some("".into())), None);
        assert_eq!(filter(&Some("  ".into())), None);
        assert_eq!(filter(&Some(" NTS ".into())), Some("NTS"));
    }

    #[test]
    fn direction_defaults_to_ascending() {
        assert_eq!(direction(None), "ASC");
        assert_eq!(direction(Some("desc")), "DESC");
        assert_eq!(direction(Some("DESC")), "DESC");
        assert_eq!(direction(Some("sideways")), "ASC");
    }
}
