//! Month / weekday narrowing of a city dataset.

use bikeshare_core::models::{Month, OptionalField, Selection, Selector, TripRecord};
use chrono::Weekday;
use tracing::debug;

use crate::reader::CityDataset;

/// Read-only, order-preserving subsequence of a [`CityDataset`].
///
/// Borrows the dataset's records; building a new view never touches the
/// dataset or any other view.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a CityDataset,
    records: Vec<&'a TripRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over every record of `dataset`.
    pub fn all(dataset: &'a CityDataset) -> Self {
        Self {
            dataset,
            records: dataset.records().iter().collect(),
        }
    }

    pub fn dataset(&self) -> &'a CityDataset {
        self.dataset
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Capability check forwarded to the underlying dataset.
    pub fn has_field(&self, field: OptionalField) -> bool {
        self.dataset.has_field(field)
    }

    /// Narrow this view further. Applying the same selection twice is a no-op.
    pub fn refine(&self, selection: &Selection) -> FilteredView<'a> {
        FilteredView {
            dataset: self.dataset,
            records: self
                .records
                .iter()
                .copied()
                .filter(|r| record_matches(r, selection))
                .collect(),
        }
    }
}

/// Apply month and weekday selectors to `dataset`.
///
/// `Selector::All` disables that dimension. A selection matching nothing
/// yields an empty view, not an error.
pub fn filter<'a>(
    dataset: &'a CityDataset,
    month: Selector<Month>,
    day: Selector<Weekday>,
) -> FilteredView<'a> {
    apply_selection(dataset, &Selection::new(month, day))
}

/// [`filter`] taking both selectors as one [`Selection`].
pub fn apply_selection<'a>(dataset: &'a CityDataset, selection: &Selection) -> FilteredView<'a> {
    let view = dataset.view().refine(selection);
    debug!(
        "Filtered {} of {} {} trips (month: {}, day: {})",
        view.len(),
        dataset.len(),
        dataset.city(),
        selection.month_label(),
        selection.day_label(),
    );
    view
}

fn record_matches(record: &TripRecord, selection: &Selection) -> bool {
    let month_ok = match selection.month {
        Selector::All => true,
        Selector::Only(m) => record.month() == m.number(),
    };
    month_ok && selection.day.matches(&record.weekday())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
