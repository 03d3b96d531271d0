use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{BikeshareError, Result};
use crate::selection::normalize_input;

/// Exact, case-sensitive column headers of a city source file.
pub mod columns {
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    /// Columns every city source must carry.
    pub const REQUIRED: [&str; 6] = [
        START_TIME,
        END_TIME,
        TRIP_DURATION,
        START_STATION,
        END_STATION,
        USER_TYPE,
    ];
}

// ── City ──────────────────────────────────────────────────────────────────────

/// A supported bike-share city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Every supported city, in prompt order.
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Normalised identifier accepted from user input.
    pub fn id(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// File name of the city's source inside the data directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── CityCatalog ───────────────────────────────────────────────────────────────

/// One city → source file mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub city: City,
    pub file_name: String,
}

/// Immutable mapping of supported cities to their source files.
///
/// Built once at startup and handed to the record store; nothing in the
/// catalog changes at runtime.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl CityCatalog {
    /// Catalog of all three cities with their default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let entries = City::ALL
            .iter()
            .map(|&city| CatalogEntry {
                city,
                file_name: city.default_file_name().to_string(),
            })
            .collect();
        Self::with_entries(data_dir, entries)
    }

    /// Catalog with an explicit set of entries.
    pub fn with_entries(data_dir: impl Into<PathBuf>, entries: Vec<CatalogEntry>) -> Self {
        Self {
            data_dir: data_dir.into(),
            entries,
        }
    }

    /// Cities present in this catalog.
    pub fn cities(&self) -> impl Iterator<Item = City> + '_ {
        self.entries.iter().map(|e| e.city)
    }

    /// Resolve a free-text city identifier (case and spacing insensitive).
    pub fn resolve(&self, city_id: &str) -> Result<City> {
        let wanted = normalize_input(city_id);
        self.cities()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| BikeshareError::UnknownCity(city_id.trim().to_string()))
    }

    /// Path of the source file for `city`.
    pub fn source_path(&self, city: City) -> Result<PathBuf> {
        self.entries
            .iter()
            .find(|e| e.city == city)
            .map(|e| self.data_dir.join(&e.file_name))
            .ok_or_else(|| BikeshareError::UnknownCity(city.id().to_string()))
    }
}

// ── Month ─────────────────────────────────────────────────────────────────────

/// Months covered by the source data. The published files only span the
/// first half of the year, so only January–June can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// Calendar month number (1-based).
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Selector / Selection ──────────────────────────────────────────────────────

/// A filter value for one dimension: everything, or one enumerated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: PartialEq> Selector<T> {
    /// `true` when `value` passes this selector.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

/// Month and weekday selectors of one exploration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub month: Selector<Month>,
    pub day: Selector<Weekday>,
}

impl Selection {
    pub fn new(month: Selector<Month>, day: Selector<Weekday>) -> Self {
        Self { month, day }
    }

    /// Label for the month selector, e.g. `"March"` or `"all"`.
    pub fn month_label(&self) -> String {
        match self.month {
            Selector::All => "all".to_string(),
            Selector::Only(m) => m.name().to_string(),
        }
    }

    /// Label for the weekday selector, e.g. `"Friday"` or `"all"`.
    pub fn day_label(&self) -> String {
        match self.day {
            Selector::All => "all".to_string(),
            Selector::Only(d) => crate::time_utils::weekday_name(d).to_string(),
        }
    }
}

// ── OptionalField ─────────────────────────────────────────────────────────────

/// Demographic columns that only some cities publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalField {
    Gender,
    BirthYear,
}

impl OptionalField {
    pub fn column_name(&self) -> &'static str {
        match self {
            OptionalField::Gender => columns::GENDER,
            OptionalField::BirthYear => columns::BIRTH_YEAR,
        }
    }
}

impl fmt::Display for OptionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionalField::Gender => f.write_str("gender"),
            OptionalField::BirthYear => f.write_str("year of birth"),
        }
    }
}

// ── TripRecord ────────────────────────────────────────────────────────────────

/// One ride read from a city source.
///
/// `month` and `weekday` are derived from `start_time` on construction and
/// are read-only, so they can never disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    month: u32,
    weekday: Weekday,
    /// Trip end timestamp, kept as the source text.
    pub end_time: String,
    /// Trip duration in seconds.
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    /// Rider category, e.g. `"Subscriber"`; empty when the source cell was blank.
    pub user_type: String,
    /// `None` when the cell is blank or the city has no gender column.
    pub gender: Option<String>,
    /// `None` when the cell is blank or the city has no birth-year column.
    pub birth_year: Option<i32>,
}

impl TripRecord {
    /// Create a record starting at `start_time` with empty remaining fields.
    pub fn new(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            month: start_time.month(),
            weekday: start_time.weekday(),
            end_time: String::new(),
            trip_duration: 0.0,
            start_station: String::new(),
            end_station: String::new(),
            user_type: String::new(),
            gender: None,
            birth_year: None,
        }
    }

    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = end_time.into();
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.trip_duration = seconds;
        self
    }

    pub fn with_stations(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_station = start.into();
        self.end_station = end.into();
        self
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = user_type.into();
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Calendar month (1–12) of the trip start.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of day (0–23) of the trip start, computed on demand.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}
