//! Person model.
//!
//! This module defines the [`Person`] struct: an injured worker whose pay
//! facts and injury date have been validated from an untyped input record.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::validation::{self, Record};

/// Input key for the person's name.
pub const NAME: &str = "name";
/// Input key for the ordinary hourly rate.
pub const HOURLY_RATE: &str = "hourlyRate";
/// Input key for the overtime hourly rate.
pub const OVERTIME_RATE: &str = "overtimeRate";
/// Input key for ordinary hours per week.
pub const NORMAL_HOURS: &str = "normalHours";
/// Input key for overtime hours per week.
pub const OVERTIME_HOURS: &str = "overtimeHours";
/// Input key for the injury date.
pub const INJURY_DATE: &str = "injuryDate";

/// An injured worker with validated pre-injury earnings facts.
///
/// A `Person` can only be obtained through [`Person::from_record`], so every
/// value held here has passed validation exactly once. It is immutable and
/// may be reused across report dates.
///
/// # Example
///
/// ```
/// use piawe_engine::models::Person;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let record = json!({
///     "name": "Ebony Boycott",
///     "hourlyRate": 75.0030,
///     "overtimeRate": 150.0000,
///     "normalHours": 35.0,
///     "overtimeHours": 7.3,
///     "injuryDate": "2016/05/01"
/// });
/// let person = Person::from_record(record.as_object().unwrap()).unwrap();
/// assert_eq!(person.name(), "Ebony Boycott");
/// assert_eq!(person.hourly_rate(), Decimal::new(75003, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    hourly_rate: Decimal,
    overtime_rate: Decimal,
    normal_hours: Decimal,
    overtime_hours: Decimal,
    injury_date: NaiveDate,
    /// The source record as JSON, kept for error context.
    source: String,
}

impl Person {
    /// Validates a person record.
    ///
    /// Fields are checked in a fixed order (`name`, `hourlyRate`,
    /// `overtimeRate`, `normalHours`, `overtimeHours`, `injuryDate`) and the
    /// first failure is returned, so an empty record fails on `name`.
    ///
    /// # Errors
    ///
    /// - `MissingField` if a key is absent
    /// - `InvalidType` if a rate or hours value is not a number, or `name` /
    ///   `injuryDate` is not a string
    /// - `InvalidFormat` if `injuryDate` is not a `YYYY/MM/DD` calendar date
    /// - `InvalidValue` if `name` is empty or a rate or hours value is negative
    pub fn from_record(record: &Record) -> EngineResult<Self> {
        let name = validation::require_non_empty_string(record, NAME)?.to_string();
        let hourly_rate = validation::require_non_negative_decimal(record, HOURLY_RATE)?;
        let overtime_rate = validation::require_non_negative_decimal(record, OVERTIME_RATE)?;
        let normal_hours = validation::require_non_negative_decimal(record, NORMAL_HOURS)?;
        let overtime_hours = validation::require_non_negative_decimal(record, OVERTIME_HOURS)?;
        let injury_date = validation::require_date(record, INJURY_DATE)?;

        Ok(Self {
            name,
            hourly_rate,
            overtime_rate,
            normal_hours,
            overtime_hours,
            injury_date,
            source: validation::render(record),
        })
    }

    /// Returns the person's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordinary hourly rate.
    pub fn hourly_rate(&self) -> Decimal {
        self.hourly_rate
    }

    /// Returns the overtime hourly rate.
    pub fn overtime_rate(&self) -> Decimal {
        self.overtime_rate
    }

    /// Returns the ordinary hours worked per week before the injury.
    pub fn normal_hours(&self) -> Decimal {
        self.normal_hours
    }

    /// Returns the overtime hours worked per week before the injury.
    pub fn overtime_hours(&self) -> Decimal {
        self.overtime_hours
    }

    /// Returns the date of injury.
    pub fn injury_date(&self) -> NaiveDate {
        self.injury_date
    }

    /// Returns the record this person was built from, rendered as JSON.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the number of weeks elapsed between the injury and `report_date`.
    ///
    /// The result is an exact fraction (`days / 7`) and is never truncated;
    /// the day of the injury is week `0`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the injury date is later than `report_date`.
    pub fn weeks_since_injury(&self, report_date: NaiveDate) -> EngineResult<Decimal> {
        if self.injury_date > report_date {
            return Err(EngineError::InvalidValue {
                field: INJURY_DATE.to_string(),
                value: validation::format_date(self.injury_date),
                message: format!(
                    "is a date in the future (report date is {})",
                    validation::format_date(report_date)
                ),
                record: self.source.clone(),
            });
        }

        let days = (report_date - self.injury_date).num_days();
        Ok(Decimal::from(days) / Decimal::from(7))
    }
}
