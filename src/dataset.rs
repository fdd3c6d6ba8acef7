//! Launch record loading
//!
//! The dataset is read once at startup from a CSV file and kept in memory,
//! read-only, for the lifetime of the process. Every chart is derived from
//! this table.
//!
//! ## Expected Columns
//!
//! ```text
//! Launch Site, Booster Version, Booster Version Category, Payload Mass (kg), class
//! ```
//!
//! Any other columns (the unnamed index column, `Flight Number`, ...) are ignored.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::aggregate::PayloadRange;

/// Sentinel option meaning "no filter"
pub const ALL_SITES: &str = "ALL";

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_LAUNCH_SITE,
    COL_BOOSTER_VERSION,
    COL_BOOSTER_CATEGORY,
    COL_PAYLOAD_MASS,
    COL_CLASS,
];

/// Errors that can occur while ingesting the launch dataset
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Row {row}: invalid payload mass '{value}'")]
    InvalidPayload { row: usize, value: String },

    #[error("Row {row}: invalid outcome class '{value}' (expected 0 or 1)")]
    InvalidOutcome { row: usize, value: String },

    #[error("Dataset contains no launch records")]
    Empty,
}

/// Launch outcome class (1 = success, 0 = failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// The numeric class value as stored in the dataset
    pub fn class_value(&self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Parse a class cell; accepts `0`/`1` and their float spellings (`1.0`)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "1.0" => Some(Outcome::Success),
            "0" | "0.0" => Some(Outcome::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_value())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.class_value())
    }
}

/// A single row of the launch dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub booster_version: String,
    pub booster_version_category: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
}

/// Column positions resolved from the header row
struct ColumnIndex {
    launch_site: usize,
    booster_version: usize,
    booster_category: usize,
    payload_mass: usize,
    class: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(IngestError::MissingColumn(name))
        };

        // Report the first missing column in declaration order
        for name in REQUIRED_COLUMNS {
            find(name)?;
        }

        Ok(Self {
            launch_site: find(COL_LAUNCH_SITE)?,
            booster_version: find(COL_BOOSTER_VERSION)?,
            booster_category: find(COL_BOOSTER_CATEGORY)?,
            payload_mass: find(COL_PAYLOAD_MASS)?,
            class: find(COL_CLASS)?,
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<LaunchRecord, IngestError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let raw_payload = cell(self.payload_mass);
        let payload_mass_kg = raw_payload
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| IngestError::InvalidPayload {
                row,
                value: raw_payload.to_string(),
            })?;

        let raw_class = cell(self.class);
        let outcome = Outcome::parse(raw_class).ok_or_else(|| IngestError::InvalidOutcome {
            row,
            value: raw_class.to_string(),
        })?;

        Ok(LaunchRecord {
            launch_site: cell(self.launch_site).to_string(),
            booster_version: cell(self.booster_version).to_string(),
            booster_version_category: cell(self.booster_category).to_string(),
            payload_mass_kg,
            outcome,
        })
    }
}

/// Immutable in-memory launch table
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    extent: PayloadRange,
}

impl LaunchDataset {
    /// Load the dataset from a CSV file on disk
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load the dataset from any CSV source (header row required)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, IngestError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(rdr.headers()?)?;

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            // Line the record starts on, so multi-line quoted fields report correctly
            let row = record.position().map_or(0, |p| p.line() as usize);
            records.push(columns.parse_row(&record, row)?);
        }

        Self::from_records(records)
    }

    /// Build a dataset from already-parsed records
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, IngestError> {
        let mut iter = records.iter().map(|r| r.payload_mass_kg);
        let first = iter.next().ok_or(IngestError::Empty)?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        Ok(Self {
            records,
            extent: PayloadRange::new(min, max),
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed payload mass range across all records
    pub fn payload_extent(&self) -> PayloadRange {
        self.extent
    }

    /// Launch site options: `ALL` followed by each site in first-seen order
    pub fn distinct_sites(&self) -> Vec<String> {
        with_all_sentinel(distinct(self.records.iter().map(|r| r.launch_site.as_str())))
    }

    /// Booster version options: `ALL` followed by each version in first-seen order
    pub fn distinct_boosters(&self) -> Vec<String> {
        with_all_sentinel(distinct(
            self.records.iter().map(|r| r.booster_version.as_str()),
        ))
    }

    /// Booster version categories in first-seen order (scatter legend order)
    pub fn distinct_booster_categories(&self) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .map(|r| r.booster_version_category.as_str()),
        )
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

fn with_all_sentinel(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL_SITES.to_string())
        .chain(values)
        .collect()
}
