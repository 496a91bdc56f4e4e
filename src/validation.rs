//! Stateless field validators for untyped input records.
//!
//! People and rules arrive as JSON objects. Every typed value in the engine is
//! produced by one of these functions, which either return the typed value or
//! an [`EngineError`] naming the field, the value and the whole record.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};

/// An untyped input record, as parsed from JSON or YAML.
pub type Record = Map<String, Value>;

/// The date format used for injury dates and report dates.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}/[0-9]{2}/[0-9]{2}$").expect("date pattern is valid"));

/// Renders a record as compact JSON for error messages.
pub fn render(record: &Record) -> String {
    Value::Object(record.clone()).to_string()
}

/// Returns the value stored under `field`, or `MissingField`.
pub fn require<'a>(record: &'a Record, field: &str) -> EngineResult<&'a Value> {
    record.get(field).ok_or_else(|| EngineError::MissingField {
        field: field.to_string(),
        record: render(record),
    })
}

/// Validates that `field` holds a JSON string.
pub fn require_string<'a>(record: &'a Record, field: &str) -> EngineResult<&'a str> {
    let value = require(record, field)?;
    value.as_str().ok_or_else(|| invalid_type(record, field, "a string", value))
}

/// Validates that `field` holds a string with at least one non-whitespace character.
pub fn require_non_empty_string<'a>(record: &'a Record, field: &str) -> EngineResult<&'a str> {
    let value = require_string(record, field)?;
    if value.trim().is_empty() {
        return Err(EngineError::InvalidValue {
            field: field.to_string(),
            value: format!("{:?}", value),
            message: "must not be empty".to_string(),
            record: render(record),
        });
    }
    Ok(value)
}

/// Validates that `field` holds a JSON number and converts it to an exact decimal.
///
/// The conversion goes through the number's shortest textual form, so `75.003`
/// becomes exactly `75.003` rather than its nearest binary approximation.
pub fn require_decimal(record: &Record, field: &str) -> EngineResult<Decimal> {
    let value = require(record, field)?;
    let number = match value {
        Value::Number(number) => number,
        other => return Err(invalid_type(record, field, "a number", other)),
    };

    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| EngineError::InvalidValue {
            field: field.to_string(),
            value: text,
            message: "is outside the supported decimal range".to_string(),
            record: render(record),
        })
}

/// Validates that `field` holds a number that is zero or greater.
pub fn require_non_negative_decimal(record: &Record, field: &str) -> EngineResult<Decimal> {
    let value = require_decimal(record, field)?;
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            message: "must not be negative".to_string(),
            record: render(record),
        });
    }
    Ok(value)
}

/// Validates that `field` holds a JSON boolean. Strings such as `"true"` are rejected.
pub fn require_bool(record: &Record, field: &str) -> EngineResult<bool> {
    let value = require(record, field)?;
    value
        .as_bool()
        .ok_or_else(|| invalid_type(record, field, "a boolean true or false", value))
}

/// Validates that `field` holds a `YYYY/MM/DD` string naming a real calendar date.
pub fn require_date(record: &Record, field: &str) -> EngineResult<NaiveDate> {
    let text = require_string(record, field)?;
    parse_date(field, text, || render(record))
}

/// Parses a `YYYY/MM/DD` date string.
///
/// `context` renders the surrounding input for the error message and is only
/// invoked on failure.
pub fn parse_date(
    field: &str,
    text: &str,
    context: impl Fn() -> String,
) -> EngineResult<NaiveDate> {
    if !DATE_PATTERN.is_match(text) {
        return Err(EngineError::InvalidFormat {
            field: field.to_string(),
            value: text.to_string(),
            message: "is not in YYYY/MM/DD format".to_string(),
            record: context(),
        });
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| EngineError::InvalidFormat {
        field: field.to_string(),
        value: text.to_string(),
        message: "does not represent a valid date".to_string(),
        record: context(),
    })
}

/// Formats a date the way it is read: `YYYY/MM/DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn invalid_type(record: &Record, field: &str, expected: &str, value: &Value) -> EngineError {
    EngineError::InvalidType {
        field: field.to_string(),
        expected: expected.to_string(),
        value: value.to_string(),
        record: render(record),
    }
}
