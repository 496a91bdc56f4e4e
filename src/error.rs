//! Error types for the PIAWE payment engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can abort report generation.

use thiserror::Error;

/// The main error type for the PIAWE payment engine.
///
/// Record-level variants carry the offending field, the offending value and
/// the whole input record rendered as JSON, so bad input can be located
/// without re-running the report.
///
/// # Example
///
/// ```
/// use piawe_engine::error::EngineError;
///
/// let error = EngineError::MissingField {
///     field: "name".to_string(),
///     record: "{}".to_string(),
/// };
/// assert_eq!(error.to_string(), "record does not have a 'name' key: {}");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required key was absent from an input record.
    #[error("record does not have a '{field}' key: {record}")]
    MissingField {
        /// The key that was missing.
        field: String,
        /// The offending record, rendered as JSON.
        record: String,
    },

    /// A value was present but of the wrong type.
    #[error("'{field}' must be {expected}, got {value}: {record}")]
    InvalidType {
        /// The key holding the bad value.
        field: String,
        /// A description of the expected type (e.g. "a number").
        expected: String,
        /// The offending value, rendered as JSON.
        value: String,
        /// The offending record, rendered as JSON.
        record: String,
    },

    /// A string value failed a required pattern or is not a real calendar date.
    #[error("'{field}' value {value} {message}: {record}")]
    InvalidFormat {
        /// The key holding the bad value.
        field: String,
        /// The offending value.
        value: String,
        /// What was wrong with the value.
        message: String,
        /// The offending record, rendered as JSON.
        record: String,
    },

    /// A well-formed value was semantically out of range.
    #[error("'{field}' value {value} {message}: {record}")]
    InvalidValue {
        /// The key holding the bad value.
        field: String,
        /// The offending value.
        value: String,
        /// What was wrong with the value.
        message: String,
        /// The offending record, rendered as JSON.
        record: String,
    },

    /// The rule array as a whole does not partition the week axis.
    #[error("Inconsistent rule table at rule {rule}: {message}")]
    RuleTableConsistency {
        /// The 1-based ordinal of the offending rule.
        rule: usize,
        /// A description of the inconsistency.
        message: String,
    },

    /// No rule matched despite the rule table invariants. Always an engine bug.
    #[error("ENGINE BUG - {message}")]
    EngineInvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },

    /// An input file was not found.
    #[error("Could not find file {path}")]
    InputNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An input file could not be parsed.
    #[error("Failed to parse input file '{path}': {message}")]
    InputParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input file parsed but lacks its top-level collection key.
    #[error("Input file '{path}' did not contain a '{key}' array")]
    MissingEnvelopeKey {
        /// The path to the input file.
        path: String,
        /// The key that was expected (`people` or `rules`).
        key: String,
    },
}

impl EngineError {
    /// Returns true for errors that signal a defect in the engine rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, EngineError::EngineInvariantViolation { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
