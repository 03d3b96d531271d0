//! Exploration pipeline: load → filter → statistics.
//!
//! [`explore`] loads one city and pairs it with a selection; the resulting
//! [`Exploration`] hands out the filtered view and computes an
//! [`ExplorationReport`] over it.

use std::time::Instant;

use bikeshare_core::error::{Result, StatError};
use bikeshare_core::models::{City, Selection};
use bikeshare_core::time_utils::{month_name, weekday_name};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::aggregator::{DurationStats, StationStats, TimeStats, TripAggregator, UserStats};
use crate::filter::{apply_selection, FilteredView};
use crate::reader::{CityDataset, RecordStore};

// ── Public types ──────────────────────────────────────────────────────────────

/// Wall-clock seconds spent in each stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageTimings {
    pub load_seconds: f64,
    pub time_seconds: f64,
    pub station_seconds: f64,
    pub duration_seconds: f64,
    pub user_seconds: f64,
}

/// Every statistic group for one city and selection.
#[derive(Debug, Clone)]
pub struct ExplorationReport {
    pub city: City,
    pub selection: Selection,
    /// Records in the full city dataset.
    pub dataset_records: usize,
    /// Records left after filtering.
    pub view_records: usize,
    pub time: std::result::Result<TimeStats, StatError>,
    pub stations: std::result::Result<StationStats, StatError>,
    pub durations: std::result::Result<DurationStats, StatError>,
    pub users: std::result::Result<UserStats, StatError>,
    pub timings: StageTimings,
}

/// A loaded city dataset paired with the active selection.
///
/// Owns its dataset; nothing is shared with other explorations.
#[derive(Debug, Clone)]
pub struct Exploration {
    dataset: CityDataset,
    selection: Selection,
    load_seconds: f64,
}

impl Exploration {
    pub fn new(dataset: CityDataset, selection: Selection) -> Self {
        Self {
            dataset,
            selection,
            load_seconds: 0.0,
        }
    }

    pub fn dataset(&self) -> &CityDataset {
        &self.dataset
    }

    /// Records matching the selection, in source order.
    pub fn view(&self) -> FilteredView<'_> {
        apply_selection(&self.dataset, &self.selection)
    }

    /// Compute all four statistic groups over `view`.
    pub fn report(&self, view: &FilteredView<'_>) -> ExplorationReport {
        let mut timings = StageTimings {
            load_seconds: self.load_seconds,
            ..Default::default()
        };

        let (time, secs) = timed(|| TripAggregator::time_stats(view));
        timings.time_seconds = secs;
        let (stations, secs) = timed(|| TripAggregator::station_stats(view));
        timings.station_seconds = secs;
        let (durations, secs) = timed(|| TripAggregator::duration_stats(view));
        timings.duration_seconds = secs;
        let (users, secs) = timed(|| TripAggregator::user_stats(view));
        timings.user_seconds = secs;

        debug!(
            "Report for {}: {} of {} trips, stats took {:.4}s",
            self.dataset.city(),
            view.len(),
            self.dataset.len(),
            timings.time_seconds
                + timings.station_seconds
                + timings.duration_seconds
                + timings.user_seconds,
        );

        ExplorationReport {
            city: self.dataset.city(),
            selection: self.selection,
            dataset_records: self.dataset.len(),
            view_records: view.len(),
            time,
            stations,
            durations,
            users,
            timings,
        }
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Load `city_id` through `store` and pair it with `selection`.
///
/// Load failures (unknown city, unreadable source, malformed rows) are
/// returned as errors; statistic-level conditions never are.
pub fn explore(store: &RecordStore, city_id: &str, selection: Selection) -> Result<Exploration> {
    let (dataset, load_seconds) = timed(|| store.load(city_id));
    Ok(Exploration {
        dataset: dataset?,
        selection,
        load_seconds,
    })
}

// ── JSON rendering ────────────────────────────────────────────────────────────

impl ExplorationReport {
    /// Machine-readable form of the report.
    pub fn to_json(&self) -> Value {
        json!({
            "city": self.city.display_name(),
            "month": self.selection.month_label(),
            "day": self.selection.day_label(),
            "dataset_records": self.dataset_records,
            "view_records": self.view_records,
            "time": outcome_json(&self.time, |t| json!({
                "month": { "value": month_name(t.month.value), "count": t.month.count },
                "weekday": { "value": weekday_name(t.weekday.value), "count": t.weekday.count },
                "hour": t.hour,
            })),
            "stations": outcome_json(&self.stations, |s| json!(s)),
            "durations": outcome_json(&self.durations, |d| json!(d)),
            "users": outcome_json(&self.users, |u| json!({
                "user_types": table_json(&u.user_types),
                "gender": outcome_json(&u.gender, |g| table_json(g)),
                "birth_year": outcome_json(&u.birth_year, |b| json!(b)),
            })),
            "timings": self.timings,
        })
    }
}

/// `{"status": "ok", "data": ..}` or `{"status": "no_data" | "not_available", "message": ..}`.
fn outcome_json<T>(
    outcome: &std::result::Result<T, StatError>,
    render: impl FnOnce(&T) -> Value,
) -> Value {
    match outcome {
        Ok(value) => json!({ "status": "ok", "data": render(value) }),
        Err(e @ StatError::NoData) => json!({ "status": "no_data", "message": e.to_string() }),
        Err(e @ StatError::FieldNotAvailable(_)) => {
            json!({ "status": "not_available", "message": e.to_string() })
        }
    }
}

fn table_json(table: &[(String, usize)]) -> Value {
    Value::Array(
        table
            .iter()
            .map(|(value, count)| json!({ "value": value, "count": count }))
            .collect(),
    )
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed().as_secs_f64())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::error::BikeshareError;
    use bikeshare_core::models::{CityCatalog, Month, Selector};
    use tempfile::TempDir;

    const CSV: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-03 08:00:00,2017-03-03 08:01:00,60,A,B,Subscriber
2017-03-04 08:00:00,2017-03-04 08:02:00,120,A,C,Customer
2017-03-05 09:00:00,2017-03-05 09:03:00,180,B,C,Subscriber
2017-05-01 10:00:00,2017-05-01 10:10:00,600,C,A,Subscriber
";

    fn store_with(csv: &str) -> (TempDir, RecordStore) {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("washington.csv"), csv).unwrap();
        let store = RecordStore::new(CityCatalog::new(tmp.path()));
        (tmp, store)
    }

    #[test]
    fn test_explore_march_report() {
        let (_tmp, store) = store_with(CSV);
        let sel = Selection::new(Selector::Only(Month::March), Selector::All);
        let exploration = explore(&store, "washington", sel).unwrap();
        let view = exploration.view();
        let report = exploration.report(&view);

        assert_eq!(report.city, City::Washington);
        assert_eq!(report.dataset_records, 4);
        assert_eq!(report.view_records, 3);

        let durations = report.durations.unwrap();
        assert_eq!(durations.total_seconds, 360.0);
        assert_eq!(durations.mean_seconds, 120.0);
        assert_eq!(report.time.unwrap().month.value, 3);
        assert!(matches!(
            report.users.unwrap().gender,
            Err(StatError::FieldNotAvailable(_))
        ));
    }

    #[test]
    fn test_explore_empty_selection_reports_no_data() {
        let (_tmp, store) = store_with(CSV);
        let sel = Selection::new(Selector::Only(Month::June), Selector::All);
        let exploration = explore(&store, "washington", sel).unwrap();
        let view = exploration.view();
        let report = exploration.report(&view);

        assert_eq!(report.view_records, 0);
        assert_eq!(report.time.unwrap_err(), StatError::NoData);
        assert_eq!(report.stations.unwrap_err(), StatError::NoData);
        assert_eq!(report.durations.unwrap_err(), StatError::NoData);
        assert_eq!(report.users.unwrap_err(), StatError::NoData);
    }

    #[test]
    fn test_explore_propagates_load_errors() {
        let (_tmp, store) = store_with(CSV);
        let err = explore(&store, "chicago", Selection::default()).unwrap_err();
        assert!(matches!(err, BikeshareError::SourceUnavailable { .. }));

        let err = explore(&store, "paris", Selection::default()).unwrap_err();
        assert!(matches!(err, BikeshareError::UnknownCity(_)));
    }

    #[test]
    fn test_report_json_shape() {
        let (_tmp, store) = store_with(CSV);
        let exploration = explore(&store, "washington", Selection::default()).unwrap();
        let view = exploration.view();
        let json = exploration.report(&view).to_json();

        assert_eq!(json["city"], "Washington");
        assert_eq!(json["month"], "all");
        assert_eq!(json["view_records"], 4);
        assert_eq!(json["time"]["status"], "ok");
        assert_eq!(json["time"]["data"]["month"]["value"], "March");
        assert_eq!(json["durations"]["data"]["total_seconds"], 960.0);
        assert_eq!(json["stations"]["data"]["start_station"]["value"], "A");
        assert_eq!(json["users"]["data"]["gender"]["status"], "not_available");
        assert_eq!(
            json["users"]["data"]["user_types"][0],
            serde_json::json!({ "value": "Subscriber", "count": 3 })
        );
    }

    #[test]
    fn test_report_json_no_data() {
        let (_tmp, store) = store_with(CSV);
        let sel = Selection::new(Selector::Only(Month::January), Selector::All);
        let exploration = explore(&store, "washington", sel).unwrap();
        let view = exploration.view();
        let json = exploration.report(&view).to_json();
        assert_eq!(json["durations"]["status"], "no_data");
        assert_eq!(json["durations"]["message"], "No data for this selection");
    }
}
