//! Pagination of raw rows from a filtered view.

use bikeshare_core::models::TripRecord;

use crate::filter::FilteredView;

/// Rows shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One slice of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'v, 'a> {
    pub rows: &'v [&'a TripRecord],
    /// Zero-based index of the first row within the view.
    pub offset: usize,
    /// Whether records remain after this page.
    pub has_more: bool,
}

impl Page<'_, '_> {
    /// 1-based number of the first row, for display.
    pub fn first_row_number(&self) -> usize {
        self.offset + 1
    }

    /// 1-based number of the last row, for display.
    pub fn last_row_number(&self) -> usize {
        self.offset + self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Slice `page_size` rows of `view` starting at `offset`.
///
/// Pure and repeatable. An offset past the end yields an empty page; a zero
/// `page_size` yields an empty page whose `has_more` tells whether records
/// remain at `offset`.
pub fn page<'v, 'a>(view: &'v FilteredView<'a>, offset: usize, page_size: usize) -> Page<'v, 'a> {
    let records = view.records();
    let start = offset.min(records.len());
    let end = offset.saturating_add(page_size).min(records.len());

    Page {
        rows: &records[start..end],
        offset,
        has_more: end < records.len(),
    }
}

/// Iterator over consecutive pages of a view, ending after the last row.
pub struct Pages<'v, 'a> {
    view: &'v FilteredView<'a>,
    page_size: usize,
    offset: usize,
    done: bool,
}

/// Walk `view` page by page. A zero `page_size` yields nothing.
pub fn pages<'v, 'a>(view: &'v FilteredView<'a>, page_size: usize) -> Pages<'v, 'a> {
    Pages {
        view,
        page_size,
        offset: 0,
        done: page_size == 0 || view.is_empty(),
    }
}

impl<'v, 'a> Iterator for Pages<'v, 'a> {
    type Item = Page<'v, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = page(self.view, self.offset, self.page_size);
        self.offset += self.page_size;
        self.done = !current.has_more;
        Some(current)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CityDataset;
    use bikeshare_core::models::City;
    use chrono::NaiveDate;

    fn dataset(n: usize) -> CityDataset {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = (0..n)
            .map(|i| {
                TripRecord::new(start)
                    .with_stations(format!("S{i}"), "E")
                    .with_duration(i as f64)
            })
            .collect();
        CityDataset::new(City::Washington, records, &[])
    }

    #[test]
    fn test_first_page() {
        let ds = dataset(12);
        let view = ds.view();
        let p = page(&view, 0, DEFAULT_PAGE_SIZE);
        assert_eq!(p.rows.len(), 5);
        assert!(p.has_more);
        assert_eq!(p.first_row_number(), 1);
        assert_eq!(p.last_row_number(), 5);
        assert_eq!(p.rows[0].start_station, "S0");
    }

    #[test]
    fn test_last_partial_page() {
        let ds = dataset(12);
        let view = ds.view();
        let p = page(&view, 10, 5);
        assert_eq!(p.rows.len(), 2);
        assert!(!p.has_more);
        assert_eq!(p.last_row_number(), 12);
    }

    #[test]
    fn test_exact_fit_has_no_more() {
        let ds = dataset(10);
        let view = ds.view();
        assert!(!page(&view, 5, 5).has_more);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let ds = dataset(3);
        let view = ds.view();
        let p = page(&view, 10, 5);
        assert!(p.is_empty());
        assert!(!p.has_more);
    }

    #[test]
    fn test_zero_page_size() {
        let ds = dataset(3);
        let view = ds.view();
        let p = page(&view, 1, 0);
        assert!(p.is_empty());
        assert!(p.has_more);
        assert_eq!(pages(&view, 0).count(), 0);
    }

    #[test]
    fn test_page_is_repeatable() {
        let ds = dataset(7);
        let view = ds.view();
        assert_eq!(page(&view, 5, 5), page(&view, 5, 5));
    }

    #[test]
    fn test_pages_cover_every_row_exactly_once_in_order() {
        let ds = dataset(23);
        let view = ds.view();
        for size in [1, 4, 5, 23, 50] {
            let seen: Vec<String> = pages(&view, size)
                .flat_map(|p| p.rows.iter().map(|r| r.start_station.clone()).collect::<Vec<_>>())
                .collect();
            let expected: Vec<String> = (0..23).map(|i| format!("S{i}")).collect();
            assert_eq!(seen, expected, "page size {size}");
        }
    }

    #[test]
    fn test_pages_of_empty_view() {
        let ds = dataset(0);
        let view = ds.view();
        assert_eq!(pages(&view, 5).count(), 0);
        assert!(!page(&view, 0, 5).has_more);
    }
}
