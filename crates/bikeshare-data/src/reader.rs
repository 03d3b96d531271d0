//! CSV loading for city trip sources.
//!
//! Reads one city's source file into a [`CityDataset`]. Loading is
//! all-or-nothing: the first row that cannot be interpreted aborts the load.

use std::io::Read;
use std::path::{Path, PathBuf};

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{columns, City, CityCatalog, OptionalField, TripRecord};
use bikeshare_core::time_utils::parse_timestamp;
use csv::StringRecord;
use tracing::{debug, info};

use crate::filter::FilteredView;

// ── CityDataset ───────────────────────────────────────────────────────────────

/// All trip records of one city, in source order.
#[derive(Debug, Clone)]
pub struct CityDataset {
    city: City,
    records: Vec<TripRecord>,
    has_gender: bool,
    has_birth_year: bool,
}

impl CityDataset {
    /// Build a dataset from already-parsed records.
    ///
    /// `fields` lists the optional columns the dataset carries.
    pub fn new(city: City, records: Vec<TripRecord>, fields: &[OptionalField]) -> Self {
        Self {
            city,
            records,
            has_gender: fields.contains(&OptionalField::Gender),
            has_birth_year: fields.contains(&OptionalField::BirthYear),
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source carried the optional column `field`.
    pub fn has_field(&self, field: OptionalField) -> bool {
        match field {
            OptionalField::Gender => self.has_gender,
            OptionalField::BirthYear => self.has_birth_year,
        }
    }

    /// Unfiltered view over every record.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::all(self)
    }
}

// ── RecordStore ───────────────────────────────────────────────────────────────

/// Loads city datasets from the sources listed in a [`CityCatalog`].
///
/// Holds no cache: every call reads the source again and returns a fresh
/// dataset owned by the caller.
#[derive(Debug, Clone)]
pub struct RecordStore {
    catalog: CityCatalog,
}

impl RecordStore {
    pub fn new(catalog: CityCatalog) -> Self {
        Self { catalog }
    }

    /// Load the dataset for a free-text city identifier.
    pub fn load(&self, city_id: &str) -> Result<CityDataset> {
        let city = self.catalog.resolve(city_id)?;
        self.load_city(city)
    }

    /// Load the dataset for `city`.
    pub fn load_city(&self, city: City) -> Result<CityDataset> {
        let path = self.catalog.source_path(city)?;
        let file = std::fs::File::open(&path).map_err(|source| {
            BikeshareError::SourceUnavailable {
                path: path.clone(),
                source,
            }
        })?;

        let dataset = read_trips(std::io::BufReader::new(file), city, &path)?;
        info!(
            "Loaded {} trips for {} from {}",
            dataset.len(),
            city,
            path.display()
        );
        Ok(dataset)
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse trip records from CSV text.
///
/// `source` is only used in error messages.
pub fn read_trips<R: Read>(input: R, city: City, source: &Path) -> Result<CityDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(source, e, None))?
        .clone();
    let index = ColumnIndex::from_headers(&headers, source)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result.map_err(|e| csv_error(source, e, Some(i + 1)))?;
        records.push(index.parse_row(&row, i + 1)?);
    }

    let mut fields = Vec::new();
    if index.gender.is_some() {
        fields.push(OptionalField::Gender);
    }
    if index.birth_year.is_some() {
        fields.push(OptionalField::BirthYear);
    }

    debug!(
        "Parsed {} rows from {} (gender: {}, birth year: {})",
        records.len(),
        source.display(),
        index.gender.is_some(),
        index.birth_year.is_some(),
    );

    Ok(CityDataset::new(city, records, &fields))
}

/// Classify a CSV failure. I/O failures mean the source is unreadable; a
/// data row (1-based `row`) that is not valid CSV is a malformed record.
fn csv_error(source: &Path, e: csv::Error, row: Option<usize>) -> BikeshareError {
    let path = PathBuf::from(source);
    if !e.is_io_error() {
        return match row {
            Some(row) => BikeshareError::MalformedRecord {
                row,
                field: "record".to_string(),
                value: e.to_string(),
            },
            None => BikeshareError::SourceRead { path, source: e },
        };
    }

    let message = e.to_string();
    let source = match e.into_kind() {
        csv::ErrorKind::Io(io) => io,
        _ => std::io::Error::other(message),
    };
    BikeshareError::SourceUnavailable { path, source }
}

/// Positions of the known columns within a source header.
struct ColumnIndex {
    start_time: usize,
    end_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, source: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| BikeshareError::MissingColumn {
                path: PathBuf::from(source),
                column: name.to_string(),
            })
        };

        Ok(Self {
            start_time: require(columns::START_TIME)?,
            end_time: require(columns::END_TIME)?,
            trip_duration: require(columns::TRIP_DURATION)?,
            start_station: require(columns::START_STATION)?,
            end_station: require(columns::END_STATION)?,
            user_type: require(columns::USER_TYPE)?,
            gender: find(OptionalField::Gender.column_name()),
            birth_year: find(OptionalField::BirthYear.column_name()),
        })
    }

    /// Convert one CSV row (1-based `row` number) into a [`TripRecord`].
    fn parse_row(&self, row: &StringRecord, row_no: usize) -> Result<TripRecord> {
        let cell = |i: usize| row.get(i).unwrap_or("");
        let malformed = |field: &str, value: &str| BikeshareError::MalformedRecord {
            row: row_no,
            field: field.to_string(),
            value: value.to_string(),
        };

        let raw_start = cell(self.start_time);
        let start_time =
            parse_timestamp(raw_start).ok_or_else(|| malformed(columns::START_TIME, raw_start))?;

        let raw_duration = cell(self.trip_duration);
        let trip_duration = raw_duration
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| malformed(columns::TRIP_DURATION, raw_duration))?;

        let gender = self
            .gender
            .map(cell)
            .filter(|g| !g.is_empty())
            .map(str::to_string);

        let birth_year = match self.birth_year.map(cell).filter(|b| !b.is_empty()) {
            None => None,
            Some(raw) => Some(
                parse_birth_year(raw).ok_or_else(|| malformed(columns::BIRTH_YEAR, raw))?,
            ),
        };

        Ok(TripRecord::new(start_time)
            .with_end_time(cell(self.end_time))
            .with_duration(trip_duration)
            .with_stations(cell(self.start_station), cell(self.end_station))
            .with_user_type(cell(self.user_type))
            .with_gender(gender)
            .with_birth_year(birth_year))
    }
}

/// Birth years are published as floats (`"1989.0"`); accept whole values only.
fn parse_birth_year(raw: &str) -> Option<i32> {
    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    i32::try_from(value as i64).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
