//! Fixtures
//!
//! Named bill counts stored as YAML under `<base>/bills/<name>.yml`:
//!
//! ```yaml
//! description: Thirty dollar float
//! bills:
//!   "20": 1
//!   "10": 1
//! target_amount: 15
//! allowed_denominations: ["10", "5"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{bills::BillMultiset, denominations::Denomination, request::SplitRequest};

/// Directory fixtures are read from unless told otherwise.
pub const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Loading Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Fixture names are plain file stems
    #[error("Invalid fixture name: {0}")]
    InvalidName(String),
}

/// A named bill count from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BillsFixture {
    /// What the fixture represents
    #[serde(default)]
    pub description: Option<String>,

    /// Bills per denomination
    pub bills: BillMultiset,

    /// Amount to remove
    #[serde(default)]
    pub target_amount: Option<u64>,

    /// Denominations that may be removed; absent means all of them
    #[serde(default)]
    pub allowed_denominations: Option<Vec<Denomination>>,
}

impl BillsFixture {
    /// The equivalent split request.
    pub fn request(&self) -> SplitRequest {
        SplitRequest {
            bills: self.bills,
            target_amount: self.target_amount,
            allowed_denominations: self.allowed_denominations.as_ref().map(|allowed| {
                allowed
                    .iter()
                    .map(|denom| (denom.as_key().to_string(), true))
                    .collect()
            }),
        }
    }

    /// Load a fixture from the default base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Fixture::new().load_bills(name)
    }
}

/// Fixture loader
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a loader reading from [`DEFAULT_BASE_PATH`]
    pub fn new() -> Self {
        Self::with_base_path(DEFAULT_BASE_PATH)
    }

    /// Create a loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base path fixtures are read from.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load a bills fixture by name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a plain file stem or the file
    /// cannot be read or parsed.
    pub fn load_bills(&self, name: &str) -> Result<BillsFixture, FixtureError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(FixtureError::InvalidName(name.to_string()));
        }

        let file_path = self.base_path.join("bills").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: BillsFixture = serde_norway::from_str(&contents)?;

        debug!(path = %file_path.display(), total = fixture.bills.total_value(), "loaded fixture");

        Ok(fixture)
    }

    /// Names of every bills fixture, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture directory cannot be read.
    pub fn names(&self) -> Result<Vec<String>, FixtureError> {
        let mut names = Vec::new();

        for entry in fs::read_dir(self.base_path.join("bills"))? {
            let path = entry?.path();

            if path.extension().is_some_and(|ext| ext == "yml")
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                names.push(stem.to_string());
            }
        }

        names.sort();

        Ok(names)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::denominations::DenominationSet;

    use super::*;

    fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> TestResult {
        let bills_dir = dir.path().join("bills");

        fs::create_dir_all(&bills_dir)?;
        fs::write(bills_dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn loads_bills_fixture() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            &dir,
            "float",
            r#"
description: Till float
bills:
  "20": 1
  "10": 1
  "5": 2
target_amount: 15
allowed_denominations: ["10", "5"]
"#,
        )?;

        let fixture = Fixture::with_base_path(dir.path()).load_bills("float")?;

        assert_eq!(fixture.description.as_deref(), Some("Till float"));
        assert_eq!(fixture.bills.total_value(), 40);
        assert_eq!(fixture.target_amount, Some(15));

        let request = fixture.request();

        assert_eq!(
            request.allowed(),
            DenominationSet::new([Denomination::Ten, Denomination::Five])
        );
        assert_eq!(request.total(), 40);

        Ok(())
    }

    #[test]
    fn optional_fields_default() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(&dir, "plain", "bills:\n  \"50\": 5\n")?;

        let fixture = Fixture::with_base_path(dir.path()).load_bills("plain")?;

        assert_eq!(fixture.description, None);
        assert_eq!(fixture.target_amount, None);
        assert_eq!(fixture.request().allowed(), DenominationSet::all());

        Ok(())
    }

    #[test]
    fn lists_fixture_names() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(&dir, "zeta", "bills: {}\n")?;
        write_fixture(&dir, "alpha", "bills: {}\n")?;
        fs::write(dir.path().join("bills").join("notes.txt"), "ignored")?;

        let names = Fixture::with_base_path(dir.path()).names()?;

        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);

        Ok(())
    }

    #[test]
    fn missing_fixture_is_io_error() -> TestResult {
        let dir = TempDir::new()?;

        let result = Fixture::with_base_path(dir.path()).load_bills("absent");

        assert!(matches!(result, Err(FixtureError::Io(_))));

        Ok(())
    }

    #[test]
    fn malformed_fixture_is_yaml_error() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(&dir, "broken", "bills:\n  \"5\": lots\n")?;

        let result = Fixture::with_base_path(dir.path()).load_bills("broken");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));

        Ok(())
    }

    #[test]
    fn rejects_path_like_names() {
        let fixture = Fixture::new();

        for name in ["", "../secrets", "bills/inner", ".hidden"] {
            assert!(matches!(
                fixture.load_bills(name),
                Err(FixtureError::InvalidName(_))
            ));
        }
    }
}
