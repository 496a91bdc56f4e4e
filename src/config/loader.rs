//! Input loading functionality.
//!
//! This module provides the [`InputLoader`] type for reading people and rules
//! documents from disk, and [`parse_report_date`] for report dates given as
//! text.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::calculation::build_report;
use crate::error::{EngineError, EngineResult};
use crate::models::PiaweReport;
use crate::validation;

use super::types::{InputFormat, PEOPLE_KEY, RULES_KEY};

/// Loads the people and rules collections a report is built from.
///
/// # Example
///
/// ```no_run
/// use piawe_engine::config::{InputLoader, parse_report_date};
///
/// let loader = InputLoader::load("./people.json", "./rules.json")?;
/// let report = loader.report(parse_report_date("2017/03/01")?)?;
/// println!("{}", serde_json::to_string_pretty(&report).unwrap());
/// # Ok::<(), piawe_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct InputLoader {
    people: Vec<Value>,
    rules: Vec<Value>,
}

impl InputLoader {
    /// Loads both documents.
    ///
    /// # Errors
    ///
    /// - `InputNotFound` if either file cannot be read
    /// - `InputParse` if either file is not valid JSON / YAML
    /// - `MissingEnvelopeKey` if a document lacks its `people` / `rules` array
    pub fn load<P: AsRef<Path>, R: AsRef<Path>>(people_path: P, rules_path: R) -> EngineResult<Self> {
        let people = Self::load_people(people_path)?;
        let rules = Self::load_rules(rules_path)?;
        Ok(Self { people, rules })
    }

    /// Loads the array under the `people` key of a document.
    pub fn load_people<P: AsRef<Path>>(path: P) -> EngineResult<Vec<Value>> {
        Self::load_collection(path.as_ref(), PEOPLE_KEY)
    }

    /// Loads the array under the `rules` key of a document.
    pub fn load_rules<P: AsRef<Path>>(path: P) -> EngineResult<Vec<Value>> {
        Self::load_collection(path.as_ref(), RULES_KEY)
    }

    /// Returns the loaded person records.
    pub fn people(&self) -> &[Value] {
        &self.people
    }

    /// Returns the loaded rule records.
    pub fn rules(&self) -> &[Value] {
        &self.rules
    }

    /// Builds the wrapped report for `report_date`.
    pub fn report(&self, report_date: NaiveDate) -> EngineResult<PiaweReport> {
        build_report(&self.people, &self.rules, report_date).map(PiaweReport::from)
    }

    fn load_collection(path: &Path, key: &str) -> EngineResult<Vec<Value>> {
        let path_str = path.display().to_string();
        let mut document = Self::load_document(path)?;

        let collection = match document.get_mut(key).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EngineError::MissingEnvelopeKey {
                    path: path_str,
                    key: key.to_string(),
                });
            }
        };

        debug!(path = %path_str, key, entries = collection.len(), "Loaded input collection");
        Ok(collection)
    }

    /// Reads and parses a JSON or YAML document.
    fn load_document(path: &Path) -> EngineResult<Value> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::InputNotFound {
            path: path_str.clone(),
        })?;

        let parsed: Result<Value, String> = match InputFormat::from_path(path) {
            InputFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            InputFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| EngineError::InputParse {
            path: path_str,
            message,
        })
    }
}

/// Parses a report date given as `YYYY/MM/DD`.
///
/// # Errors
///
/// Returns `InvalidFormat` if the text does not match the pattern or does not
/// name a real calendar date.
///
/// # Example
///
/// ```
/// use piawe_engine::config::parse_report_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_report_date("2017/03/01").unwrap(),
///     NaiveDate::from_ymd_opt(2017, 3, 1).unwrap()
/// );
/// assert!(parse_report_date("2017/01/50").is_err());
/// ```
pub fn parse_report_date(text: &str) -> EngineResult<NaiveDate> {
    validation::parse_date("report_date", text, || format!("report date {:?}", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const RULES_JSON: &str = r#"{"rules": [
        {"applicableWeeks": "1-26", "percentagePayable": 90, "overtimeIncluded": true},
        {"applicableWeeks": "27+", "percentagePayable": 80, "overtimeIncluded": false}
    ]}"#;

    const PEOPLE_JSON: &str = r#"{"people": [
        {"name": "test person", "hourlyRate": 75.0, "overtimeRate": 150.0,
         "normalHours": 35.0, "overtimeHours": 5, "injuryDate": "2016/12/21"}
    ]}"#;

    #[test]
    fn test_load_json_documents_and_report() {
        let people = write_file(".json", PEOPLE_JSON);
        let rules = write_file(".json", RULES_JSON);

        let loader = InputLoader::load(people.path(), rules.path()).unwrap();
        assert_eq!(loader.people().len(), 1);
        assert_eq!(loader.rules().len(), 2);

        let report = loader.report(parse_report_date("2017/03/01").unwrap()).unwrap();
        assert_eq!(report.piawe_report.report_date, "2017/03/01");
        assert_eq!(report.piawe_report.report_lines[0].pay_for_this_week, "3037.50");
    }

    #[test]
    fn test_load_yaml_rules() {
        let rules = write_file(
            ".yaml",
            "rules:\n  - applicableWeeks: \"1-26\"\n    percentagePayable: 90\n    overtimeIncluded: true\n  - applicableWeeks: \"27+\"\n    percentagePayable: 80.5\n    overtimeIncluded: false\n",
        );

        let loaded = InputLoader::load_rules(rules.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1]["applicableWeeks"], "27+");
        assert_eq!(loaded[1]["overtimeIncluded"], false);
    }

    #[test]
    fn test_missing_file_returns_input_not_found() {
        match InputLoader::load_people("foo") {
            Err(EngineError::InputNotFound { path }) => assert_eq!(path, "foo"),
            other => panic!("Expected InputNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document_is_missing_envelope_key() {
        let empty = write_file(".json", "{}");

        match InputLoader::load_people(empty.path()) {
            Err(EngineError::MissingEnvelopeKey { key, .. }) => assert_eq!(key, "people"),
            other => panic!("Expected MissingEnvelopeKey, got {:?}", other),
        }
        match InputLoader::load_rules(empty.path()) {
            Err(EngineError::MissingEnvelopeKey { key, .. }) => assert_eq!(key, "rules"),
            other => panic!("Expected MissingEnvelopeKey, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_envelope_is_missing_envelope_key() {
        let file = write_file(".json", r#"{"people": {"name": "x"}}"#);
        assert!(matches!(
            InputLoader::load_people(file.path()),
            Err(EngineError::MissingEnvelopeKey { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_file(".json", "{invalid json");
        assert!(matches!(
            InputLoader::load_rules(file.path()),
            Err(EngineError::InputParse { .. })
        ));
    }

    #[test]
    fn test_report_date_pattern_error() {
        match parse_report_date("foo") {
            Err(EngineError::InvalidFormat { field, message, .. }) => {
                assert_eq!(field, "report_date");
                assert_eq!(message, "is not in YYYY/MM/DD format");
            }
            other => panic!("Expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_report_date_calendar_error() {
        match parse_report_date("2017/01/50") {
            Err(EngineError::InvalidFormat { value, message, .. }) => {
                assert_eq!(value, "2017/01/50");
                assert_eq!(message, "does not represent a valid date");
            }
            other => panic!("Expected InvalidFormat, got {:?}", other),
        }
    }
}
