//! College dataset used as prompt context for profile recommendations.

use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read college dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("college dataset {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw row as exported from the rankings sheet; any column may be blank.
#[derive(Debug, Deserialize)]
struct RawCollege {
    institution: Option<String>,
    location: Option<String>,
    #[serde(rename = "ar score")]
    ar_score: Option<f64>,
    #[serde(rename = "fsr score")]
    fsr_score: Option<f64>,
    #[serde(rename = "score scaled")]
    overall_score: Option<f64>,
}

/// A complete college record.
#[derive(Debug, Clone, PartialEq)]
pub struct College {
    pub institution: String,
    pub location: String,
    /// Academic reputation score.
    pub ar_score: f64,
    /// Faculty/student ratio score.
    pub fsr_score: f64,
    pub overall_score: f64,
}

impl RawCollege {
    fn complete(self) -> Option<College> {
        let institution = self.institution?.trim().to_string();
        let location = self.location?.trim().to_string();
        if institution.is_empty() || location.is_empty() {
            return None;
        }
        Some(College {
            institution,
            location,
            ar_score: self.ar_score?,
            fsr_score: self.fsr_score?,
            overall_score: self.overall_score?,
        })
    }
}

/// The colleges handed to the model, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct CollegeCatalog {
    colleges: Vec<College>,
}

impl CollegeCatalog {
    /// Build from records already in memory, keeping at most `limit`.
    pub fn new(colleges: Vec<College>, limit: usize) -> Self {
        let mut colleges = colleges;
        colleges.truncate(limit);
        Self { colleges }
    }

    /// Parse a JSON array of rows, dropping incomplete ones, and keep the
    /// first `limit` complete records.
    pub fn from_json(json: &str, limit: usize) -> Result<Self, serde_json::Error> {
        let rows: Vec<RawCollege> = serde_json::from_str(json)?;
        let colleges = rows
            .into_iter()
            .filter_map(RawCollege::complete)
            .take(limit)
            .collect();
        Ok(Self { colleges })
    }

    /// Load the dataset file.
    pub async fn load(path: &Path, limit: usize) -> Result<Self, CatalogError> {
        let shown = path.display().to_string();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Read {
                path: shown.clone(),
                source,
            })?;
        let catalog = Self::from_json(&json, limit).map_err(|source| CatalogError::Parse {
            path: shown.clone(),
            source,
        })?;

        info!(
            name: "colleges.loaded",
            path = %shown,
            count = catalog.len(),
            "College dataset loaded"
        );
        Ok(catalog)
    }

    /// Like [`CollegeCatalog::load`], but a missing file yields an empty
    /// catalog. Malformed files are still errors.
    pub async fn load_or_empty(path: &Path, limit: usize) -> Result<Self, CatalogError> {
        match Self::load(path, limit).await {
            Err(CatalogError::Read { path, source })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                warn!(
                    name: "colleges.missing",
                    path = %path,
                    "College dataset not found, profile prompts will carry no context"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn len(&self) -> usize {
        self.colleges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }

    /// One line per college in the form the profile prompt expects.
    pub fn prompt_context(&self) -> String {
        let mut out = String::new();
        for c in &self.colleges {
            let _ = writeln!(
                out,
                "institution: {}, location: {}, ar score: {}, fsr score: {}, overall score: {}",
                c.institution, c.location, c.ar_score, c.fsr_score, c.overall_score
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROWS: &str = r#"[
        {"institution": "IIT Bombay", "location": "Mumbai", "ar score": 55.1, "fsr score": 32.0, "score scaled": 71.4},
        {"institution": "Blank Scores", "location": "Pune", "ar score": null, "fsr score": 10.0, "score scaled": 40.0},
        {"institution": "IISc", "location": "Bengaluru", "ar score": 40.2, "fsr score": 60.5, "score scaled": 68.0},
        {"location": "Delhi", "ar score": 1.0, "fsr score": 1.0, "score scaled": 1.0},
        {"institution": "IIT Delhi", "location": "New Delhi", "ar score": 50.0, "fsr score": 30.0, "score scaled": 70.0}
    ]"#;

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let catalog = CollegeCatalog::from_json(ROWS, 20).unwrap();
        let names: Vec<_> = catalog
            .colleges()
            .iter()
            .map(|c| c.institution.as_str())
            .collect();
        assert_eq!(names, ["IIT Bombay", "IISc", "IIT Delhi"]);
    }

    #[test]
    fn test_limit_applies_after_filtering() {
        let catalog = CollegeCatalog::from_json(ROWS, 2).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.colleges()[1].institution, "IISc");
    }

    #[test]
    fn test_prompt_context_lines() {
        let catalog = CollegeCatalog::from_json(ROWS, 1).unwrap();
        assert_eq!(
            catalog.prompt_context(),
            "institution: IIT Bombay, location: Mumbai, ar score: 55.1, fsr score: 32, overall score: 71.4\n"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = CollegeCatalog::load_or_empty(&dir.path().join("nope.json"), 20)
            .await
            .unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_dataset_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{ROWS}").unwrap();

        let catalog = CollegeCatalog::load(file.path(), 20).await.unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.colleges()[0].location, "Mumbai");
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = CollegeCatalog::load_or_empty(file.path(), 20)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
