//! JSON match artifact writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tandem_match::{MatchPair, Matching};
use tracing::{info, instrument};

use crate::IoError;

/// A serializable record of one matching run.
#[derive(Debug, Serialize)]
pub struct MatchArtifact {
    /// Name of the matcher strategy that produced the result.
    pub algorithm: String,
    /// Tolerance the matching was computed under.
    pub delta: f64,
    /// Length of the first input series.
    pub series1_len: usize,
    /// Length of the second input series.
    pub series2_len: usize,
    /// Number of matched pairs.
    pub matched: usize,
    /// Sum of pair costs.
    pub error: f64,
    /// The matched pairs, ascending by first-series index.
    pub pairs: Vec<MatchPair>,
}

impl MatchArtifact {
    /// Build an artifact from a matching and its run parameters.
    #[must_use]
    pub fn new(
        algorithm: &str,
        delta: f64,
        series1_len: usize,
        series2_len: usize,
        matching: &Matching,
    ) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            delta,
            series1_len,
            series2_len,
            matched: matching.len(),
            error: matching.error(),
            pairs: matching.pairs().to_vec(),
        }
    }
}

/// Writes match artifacts to JSON files.
pub struct MatchWriter {
    path: PathBuf,
}

impl MatchWriter {
    /// Create a new writer targeting the given output path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Write the artifact as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write(&self, artifact: &MatchArtifact) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).expect("serialization cannot fail");
        fs::write(&self.path, &json).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;
        info!(matched = artifact.matched, "match artifact written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_match::{hybrid_timestamp_match, Delta, TimestampSeries};

    fn sample_artifact() -> MatchArtifact {
        let a = TimestampSeries::new(vec![1.0, 2.0]).unwrap();
        let b = TimestampSeries::new(vec![1.1, 2.1]).unwrap();
        let m = hybrid_timestamp_match(a.as_view(), b.as_view(), Delta::new(0.5).unwrap());
        MatchArtifact::new("hybrid", 0.5, a.len(), b.len(), &m)
    }

    #[test]
    fn writes_json_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        MatchWriter::new(&path).write(&sample_artifact()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["algorithm"], "hybrid");
        assert_eq!(value["matched"], 2);
        assert_eq!(value["pairs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn unwritable_path_errors() {
        let result = MatchWriter::new(Path::new("/nonexistent/dir/out.json"))
            .write(&sample_artifact());
        assert!(matches!(result, Err(IoError::WriteFile { .. })));
    }
}
