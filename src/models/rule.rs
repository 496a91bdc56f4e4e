//! Payment rule model.
//!
//! This module defines the [`Rule`] struct: one band of a rule table, saying
//! what percentage of pre-injury earnings is payable during a range of
//! injury weeks and whether overtime counts towards those earnings.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::validation::{self, Record};

/// Input key for the week range.
pub const APPLICABLE_WEEKS: &str = "applicableWeeks";
/// Input key for the percentage payable.
pub const PERCENTAGE_PAYABLE: &str = "percentagePayable";
/// Input key for the overtime flag.
pub const OVERTIME_INCLUDED: &str = "overtimeIncluded";

// `N-M` or `N+`
static WEEKS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)(?:-([0-9]+)|(\+))$").expect("applicable weeks pattern is valid")
});

/// A single payment rule.
///
/// Week numbers are 1-based: week 1 starts at the moment of injury and week 2
/// starts seven days later. A rule therefore covers the elapsed-weeks
/// interval `[start_week - 1, end_week)`.
///
/// # Example
///
/// ```
/// use piawe_engine::models::Rule;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let record = json!({
///     "applicableWeeks": "27-52",
///     "percentagePayable": 80,
///     "overtimeIncluded": true
/// });
/// let rule = Rule::from_record(record.as_object().unwrap()).unwrap();
/// assert_eq!(rule.start_week(), 27);
/// assert_eq!(rule.end_week(), Some(52));
/// assert!(rule.matches(Decimal::from(26)));
/// assert!(!rule.matches(Decimal::from(52)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    applicable_weeks: String,
    start_week: u32,
    end_week: Option<u32>,
    percentage_payable: Decimal,
    overtime_included: bool,
}

impl Rule {
    /// Validates a rule record.
    ///
    /// # Errors
    ///
    /// - `MissingField` if a key is absent
    /// - `InvalidType` if `applicableWeeks` is not a string, `percentagePayable`
    ///   is not a number or `overtimeIncluded` is not a boolean
    /// - `InvalidFormat` if `applicableWeeks` is neither `N-M` nor `N+`
    /// - `InvalidValue` if the range starts at week 0, does not fit a week
    ///   number, or ends before it starts
    pub fn from_record(record: &Record) -> EngineResult<Self> {
        let applicable_weeks = validation::require_string(record, APPLICABLE_WEEKS)?;
        let (start_week, end_week) = parse_applicable_weeks(applicable_weeks, record)?;
        let percentage_payable = validation::require_decimal(record, PERCENTAGE_PAYABLE)?;
        let overtime_included = validation::require_bool(record, OVERTIME_INCLUDED)?;

        Ok(Self {
            applicable_weeks: applicable_weeks.to_string(),
            start_week,
            end_week,
            percentage_payable,
            overtime_included,
        })
    }

    /// Returns the raw week range as given in the input.
    pub fn applicable_weeks(&self) -> &str {
        &self.applicable_weeks
    }

    /// Returns the first injury week this rule covers.
    pub fn start_week(&self) -> u32 {
        self.start_week
    }

    /// Returns the last injury week this rule covers, or `None` if open-ended.
    pub fn end_week(&self) -> Option<u32> {
        self.end_week
    }

    /// Returns true if the rule covers every week from its start onwards.
    pub fn is_open_ended(&self) -> bool {
        self.end_week.is_none()
    }

    /// Returns the percentage of earnings payable under this rule.
    pub fn percentage_payable(&self) -> Decimal {
        self.percentage_payable
    }

    /// Returns true if overtime earnings count towards payable earnings.
    pub fn overtime_included(&self) -> bool {
        self.overtime_included
    }

    /// Returns true if this rule applies after `weeks_since_injury` elapsed weeks.
    ///
    /// The lower bound is inclusive and the upper bound exclusive, so a rule
    /// `1-26` applies from `0` up to but not including `26`, where a following
    /// `27-52` rule takes over.
    pub fn matches(&self, weeks_since_injury: Decimal) -> bool {
        weeks_since_injury >= Decimal::from(self.start_week - 1)
            && self
                .end_week
                .is_none_or(|end| weeks_since_injury < Decimal::from(end))
    }
}

fn parse_applicable_weeks(text: &str, record: &Record) -> EngineResult<(u32, Option<u32>)> {
    let captures = WEEKS_PATTERN
        .captures(text)
        .ok_or_else(|| EngineError::InvalidFormat {
            field: APPLICABLE_WEEKS.to_string(),
            value: text.to_string(),
            message: "is not in valid format (expected N-M or N+)".to_string(),
            record: validation::render(record),
        })?;

    let start_week = parse_week(&captures[1], text, record)?;
    if start_week == 0 {
        return Err(invalid_weeks(text, "starts at week 0 (weeks are numbered from 1)", record));
    }

    let end_week = match captures.get(2) {
        Some(end) => Some(parse_week(end.as_str(), text, record)?),
        None => None,
    };

    if let Some(end_week) = end_week.filter(|&end| end <= start_week) {
        return Err(invalid_weeks(
            text,
            &format!(
                "has an end week of {} that is not later than its start week of {}",
                end_week, start_week
            ),
            record,
        ));
    }

    Ok((start_week, end_week))
}

fn parse_week(digits: &str, text: &str, record: &Record) -> EngineResult<u32> {
    digits
        .parse::<u32>()
        .map_err(|_| invalid_weeks(text, "has a week number that is too large", record))
}

fn invalid_weeks(text: &str, message: &str, record: &Record) -> EngineError {
    EngineError::InvalidValue {
        field: APPLICABLE_WEEKS.to_string(),
        value: text.to_string(),
        message: message.to_string(),
        record: validation::render(record),
    }
}
