//! Descriptive statistics over a filtered view.
//!
//! Four independent groups: time of travel, stations, trip duration and
//! users. Each is a pure function of the view. An empty view yields
//! [`StatError::NoData`]; a missing optional column yields
//! [`StatError::FieldNotAvailable`] for that part only.
//!
//! Every "most popular" value is a [`mode`]: ties go to the lowest value
//! (weekdays by English name, stations and station pairs lexicographically).

use std::fmt;

use bikeshare_core::error::StatError;
use bikeshare_core::models::OptionalField;
use bikeshare_core::stats::{frequency_table, mode, CompensatedSum, Popular};
use bikeshare_core::time_utils::{parse_weekday, weekday_name};
use chrono::Weekday;
use serde::Serialize;

use crate::filter::FilteredView;

// ── Result types ──────────────────────────────────────────────────────────────

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStats {
    /// Calendar month number (1–12).
    pub month: Popular<u32>,
    pub weekday: Popular<Weekday>,
    /// Start hour (0–23).
    pub hour: Popular<u32>,
}

/// A start → end station combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

impl fmt::Display for StationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub start_station: Popular<String>,
    pub end_station: Popular<String>,
    pub trip: Popular<StationPair>,
}

/// Total and average travel time, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    pub shortest_seconds: f64,
    pub longest_seconds: f64,
}

/// Earliest, most recent and most common year of birth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Popular<i32>,
}

/// Rider breakdowns. Demographic parts carry their own availability.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Count per user type, most frequent first.
    pub user_types: Vec<(String, usize)>,
    pub gender: Result<Vec<(String, usize)>, StatError>,
    pub birth_year: Result<BirthYearStats, StatError>,
}

// ── TripAggregator ────────────────────────────────────────────────────────────

/// Stateless helper computing the statistic groups.
pub struct TripAggregator;

impl TripAggregator {
    /// Most common month, weekday and start hour.
    pub fn time_stats(view: &FilteredView) -> Result<TimeStats, StatError> {
        let month = mode(view.iter().map(|r| r.month())).ok_or(StatError::NoData)?;
        let by_name =
            mode(view.iter().map(|r| weekday_name(r.weekday()))).ok_or(StatError::NoData)?;
        let weekday = Popular {
            value: parse_weekday(by_name.value).ok_or(StatError::NoData)?,
            count: by_name.count,
        };
        let hour = mode(view.iter().map(|r| r.hour())).ok_or(StatError::NoData)?;

        Ok(TimeStats {
            month,
            weekday,
            hour,
        })
    }

    /// Most common start station, end station and start/end combination.
    pub fn station_stats(view: &FilteredView) -> Result<StationStats, StatError> {
        let start_station = mode(view.iter().map(|r| r.start_station.as_str()))
            .ok_or(StatError::NoData)?
            .map(str::to_string);
        let end_station = mode(view.iter().map(|r| r.end_station.as_str()))
            .ok_or(StatError::NoData)?
            .map(str::to_string);
        let trip = mode(
            view.iter()
                .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
        )
        .ok_or(StatError::NoData)?
        .map(|(start, end)| StationPair {
            start: start.to_string(),
            end: end.to_string(),
        });

        Ok(StationStats {
            start_station,
            end_station,
            trip,
        })
    }

    /// Total, mean, shortest and longest trip duration.
    pub fn duration_stats(view: &FilteredView) -> Result<DurationStats, StatError> {
        let sum: CompensatedSum = view.iter().map(|r| r.trip_duration).collect();
        let mean_seconds = sum.mean().ok_or(StatError::NoData)?;

        let (shortest_seconds, longest_seconds) = view.iter().map(|r| r.trip_duration).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), d| (lo.min(d), hi.max(d)),
        );

        Ok(DurationStats {
            trips: sum.count(),
            total_seconds: sum.total(),
            mean_seconds,
            shortest_seconds,
            longest_seconds,
        })
    }

    /// User-type counts plus gender and birth-year breakdowns when the
    /// dataset carries those columns.
    pub fn user_stats(view: &FilteredView) -> Result<UserStats, StatError> {
        if view.is_empty() {
            return Err(StatError::NoData);
        }

        let user_types = frequency_table(
            view.iter()
                .map(|r| r.user_type.as_str())
                .filter(|t| !t.is_empty()),
        )
        .into_iter()
        .map(|(t, n)| (t.to_string(), n))
        .collect();

        Ok(UserStats {
            user_types,
            gender: Self::gender_counts(view),
            birth_year: Self::birth_year_stats(view),
        })
    }

    fn gender_counts(view: &FilteredView) -> Result<Vec<(String, usize)>, StatError> {
        if !view.has_field(OptionalField::Gender) {
            return Err(StatError::FieldNotAvailable(OptionalField::Gender));
        }
        let table: Vec<(String, usize)> =
            frequency_table(view.iter().filter_map(|r| r.gender.as_deref()))
                .into_iter()
                .map(|(g, n)| (g.to_string(), n))
                .collect();
        if table.is_empty() {
            return Err(StatError::NoData);
        }
        Ok(table)
    }

    fn birth_year_stats(view: &FilteredView) -> Result<BirthYearStats, StatError> {
        if !view.has_field(OptionalField::BirthYear) {
            return Err(StatError::FieldNotAvailable(OptionalField::BirthYear));
        }
        let years: Vec<i32> = view.iter().filter_map(|r| r.birth_year).collect();
        let most_common = mode(years.iter().copied()).ok_or(StatError::NoData)?;

        Ok(BirthYearStats {
            earliest: years.iter().copied().min().unwrap_or(most_common.value),
            most_recent: years.iter().copied().max().unwrap_or(most_common.value),
            most_common,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
