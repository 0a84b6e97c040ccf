//! CSV timestamp series reader with full input validation.

use std::path::{Path, PathBuf};

use tandem_match::TimestampSeries;
use tracing::{debug, instrument};

use crate::IoError;

/// Reads a timestamp series from a CSV file.
///
/// Expected CSV format:
/// - Header row required (only the first column is read)
/// - One timestamp per row, parseable as a finite float
/// - Rows in non-decreasing timestamp order
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InvalidTimestamp`] | Cell is NaN, Inf, or unparseable |
/// | [`IoError::InvalidSeries`] | Timestamps are out of order |
pub struct TimestampReader {
    path: PathBuf,
}

impl TimestampReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`TimestampSeries`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TimestampSeries, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let mut values = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            let raw = record.get(0).unwrap_or("");
            let value: f64 = raw.trim().parse().map_err(|_| IoError::InvalidTimestamp {
                path: self.path.clone(),
                row_index,
                raw: raw.to_string(),
            })?;
            if !value.is_finite() {
                return Err(IoError::InvalidTimestamp {
                    path: self.path.clone(),
                    row_index,
                    raw: raw.to_string(),
                });
            }
            values.push(value);
        }

        if values.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }
        debug!(rows = values.len(), "read timestamp CSV");

        TimestampSeries::new(values).map_err(|e| IoError::InvalidSeries {
            path: self.path.clone(),
            source: e,
        })
    }
}
