#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV loader that builds the in-memory rescue request table.
//!
//! The table is read once at startup, from a local file or an HTTP URL,
//! optionally gzip-compressed. Rows that cannot be used (bad timestamp, no
//! need flags) are skipped with a warning so one bad row never aborts the
//! load; missing text fields are replaced with empty strings.

pub mod parsing;

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use rescue_dashboard_incident_models::{IncidentRecord, NeedFlag};

use crate::parsing::{parse_coordinate, parse_flag, parse_timestamp};

/// Column holding the request timestamp.
pub const TIMESTAMP_COLUMN: &str = "dateadded";

/// Boolean flag columns and the [`NeedFlag`] each one sets.
const FLAG_COLUMNS: &[(&str, NeedFlag)] = &[
    ("needrescue", NeedFlag::NeedRescue),
    ("needmed", NeedFlag::NeedMed),
    ("needfoodandwater", NeedFlag::NeedFoodAndWater),
];

/// Errors that can occur while loading the table.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column every row needs.
    #[error("CSV header is missing required column '{column}'")]
    MissingColumn {
        /// The missing column name.
        column: &'static str,
    },

    /// A required text field is empty or absent on a row.
    #[error("line {line}: missing field '{column}'")]
    MissingField {
        /// The field name.
        column: &'static str,
        /// 1-based CSV line number.
        line: u64,
    },

    /// A row's timestamp could not be parsed.
    #[error("line {line}: unparseable timestamp '{value}'")]
    InvalidTimestamp {
        /// The raw value.
        value: String,
        /// 1-based CSV line number.
        line: u64,
    },

    /// A row requests no kind of help.
    #[error("line {line}: no need flags set")]
    NoNeedFlags {
        /// 1-based CSV line number.
        line: u64,
    },
}

/// Loads the rescue request table from a file path or URL.
///
/// Sources ending in `.gz` are decompressed.
#[derive(Debug, Clone)]
pub struct TableReader {
    /// File path or `http(s)://` URL.
    source: String,
    /// Whether the payload is gzip-compressed.
    is_gzipped: bool,
}

impl TableReader {
    /// Creates a reader for `source`. Gzip is assumed when the source ends
    /// in `.gz`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            is_gzipped: Path::new(source)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gz")),
        }
    }

    fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    /// Reads the whole table.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the source cannot be read or is not valid
    /// CSV. Individual bad rows are skipped, not reported as errors.
    pub async fn load(&self) -> Result<Vec<IncidentRecord>, ReadError> {
        let bytes = if self.is_remote() {
            let response = reqwest::get(&self.source).await?.error_for_status()?;
            let bytes = response.bytes().await?;
            log::debug!("Downloaded {} bytes from {}", bytes.len(), self.source);
            bytes.to_vec()
        } else {
            std::fs::read(&self.source)?
        };

        let records = if self.is_gzipped {
            Self::read_records(flate2::read::GzDecoder::new(bytes.as_slice()))?
        } else {
            Self::read_records(bytes.as_slice())?
        };

        log::info!("Loaded {} records from {}", records.len(), self.source);
        Ok(records)
    }

    /// Parses CSV from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the CSV is malformed or lacks the timestamp
    /// column.
    pub fn read_records(reader: impl Read) -> Result<Vec<IncidentRecord>, ReadError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let columns: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_owned(), i))
            .collect();

        if !columns.contains_key(TIMESTAMP_COLUMN) {
            return Err(ReadError::MissingColumn {
                column: TIMESTAMP_COLUMN,
            });
        }

        let mut records = Vec::new();
        let mut skipped: u64 = 0;

        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, csv::Position::line);
            let row = Row {
                columns: &columns,
                record: &record,
                line,
            };

            match row.to_incident() {
                Ok(incident) => records.push(incident),
                Err(e) => {
                    log::warn!("Skipping row: {e}");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} unusable rows");
        }

        Ok(records)
    }
}

/// A CSV record viewed through the header's column positions.
struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
    line: u64,
}

impl Row<'_> {
    /// Trimmed value of `column`, or `None` if absent or empty.
    fn get(&self, column: &str) -> Option<&str> {
        let index = *self.columns.get(column)?;
        let value = self.record.get(index)?.trim();
        (!value.is_empty()).then_some(value)
    }

    fn required_text(&self, column: &'static str) -> Result<String, ReadError> {
        self.get(column)
            .map(str::to_owned)
            .ok_or(ReadError::MissingField {
                column,
                line: self.line,
            })
    }

    /// A required text field, or an empty string if it is missing.
    fn text_or_empty(&self, column: &'static str) -> String {
        self.required_text(column).unwrap_or_else(|e| {
            log::warn!("{e}; using empty string");
            String::new()
        })
    }

    fn optional_text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_owned)
    }

    fn need_flags(&self) -> BTreeSet<NeedFlag> {
        let mut flags = BTreeSet::new();

        for (column, flag) in FLAG_COLUMNS {
            let raw = self.get(column).unwrap_or("");
            match parse_flag(raw) {
                Some(true) => {
                    flags.insert(*flag);
                }
                Some(false) => {}
                None => log::warn!(
                    "line {}: unrecognized {column} value '{raw}', treating as false",
                    self.line
                ),
            }
        }

        // `needothers` is free text describing the need rather than a flag.
        if self.get("needothers").is_some() {
            flags.insert(NeedFlag::NeedOthers);
        }

        flags
    }

    fn to_incident(&self) -> Result<IncidentRecord, ReadError> {
        let raw_timestamp = self.get(TIMESTAMP_COLUMN).unwrap_or("");
        let requested_at =
            parse_timestamp(raw_timestamp).ok_or_else(|| ReadError::InvalidTimestamp {
                value: raw_timestamp.to_owned(),
                line: self.line,
            })?;

        let need_flags = self.need_flags();
        if need_flags.is_empty() {
            return Err(ReadError::NoNeedFlags { line: self.line });
        }

        let id = self
            .get("id")
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or_else(|| i64::try_from(self.line).unwrap_or(i64::MAX));

        Ok(IncidentRecord {
            id,
            location: self.text_or_empty("location"),
            requestee_phone: self.text_or_empty("requestee_phone"),
            district: self.text_or_empty("district"),
            latitude: parse_coordinate(self.get("latitude")),
            longitude: parse_coordinate(self.get("longitude")),
            requested_at,
            need_flags,
            need_others: self.optional_text("needothers"),
            detail_med: self.optional_text("detailmed"),
            detail_rescue: self.optional_text("detailrescue"),
        })
    }
}
