//! Weekly payment calculation and report line rendering.
//!
//! This module computes the amount payable to a person under a matched rule
//! and renders the fixed-precision report line for that payment.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::person_fields::{NORMAL_HOURS, OVERTIME_HOURS};
use crate::models::rule_fields::PERCENTAGE_PAYABLE;
use crate::models::{Person, ReportLine, Rule};

/// Decimal places for money, hours, weeks and percentages.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Decimal places for hourly rates.
pub const RATE_DECIMAL_PLACES: u32 = 6;

/// Rounds half away from zero (half-up for the non-negative values used here).
fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders `value` with exactly `decimal_places` digits after the point.
///
/// # Examples
///
/// ```
/// use piawe_engine::calculation::format_fixed;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_fixed(Decimal::from_str("75.003").unwrap(), 6), "75.003000");
/// assert_eq!(format_fixed(Decimal::from_str("43.428571").unwrap(), 2), "43.43");
/// assert_eq!(format_fixed(Decimal::from_str("0.125").unwrap(), 2), "0.13");
/// ```
pub fn format_fixed(value: Decimal, decimal_places: u32) -> String {
    let rounded = round_half_up(value, decimal_places);
    format!("{:.*}", decimal_places as usize, rounded)
}

/// Calculates the amount payable to `person` for one week under `rule`.
///
/// ```text
/// earnings = normal_hours * hourly_rate
///          + overtime_hours * overtime_rate   (only if the rule includes overtime)
/// pay      = round(earnings * percentage_payable / 100, 2)
/// ```
///
/// Every intermediate value is exact; the only rounding is the final
/// half-up rounding to cents.
///
/// # Errors
///
/// Returns `InvalidValue` naming the field whose product does not fit a
/// decimal, with the person's record.
///
/// # Examples
///
/// ```
/// use piawe_engine::calculation::pay_for_this_week;
/// use piawe_engine::models::{Person, Rule};
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let person = Person::from_record(json!({
///     "name": "test person",
///     "hourlyRate": 75.0,
///     "overtimeRate": 150.0,
///     "normalHours": 35.0,
///     "overtimeHours": 5,
///     "injuryDate": "2016/12/21"
/// }).as_object().unwrap()).unwrap();
/// let rule = Rule::from_record(json!({
///     "applicableWeeks": "1-26",
///     "percentagePayable": 90,
///     "overtimeIncluded": true
/// }).as_object().unwrap()).unwrap();
///
/// assert_eq!(pay_for_this_week(&person, &rule).unwrap(), Decimal::new(303750, 2));
/// ```
pub fn pay_for_this_week(person: &Person, rule: &Rule) -> EngineResult<Decimal> {
    let mut earnings = person
        .normal_hours()
        .checked_mul(person.hourly_rate())
        .ok_or_else(|| overflow(person, NORMAL_HOURS, person.normal_hours()))?;

    if rule.overtime_included() {
        earnings = person
            .overtime_hours()
            .checked_mul(person.overtime_rate())
            .and_then(|overtime| earnings.checked_add(overtime))
            .ok_or_else(|| overflow(person, OVERTIME_HOURS, person.overtime_hours()))?;
    }

    let payable = earnings
        .checked_mul(rule.percentage_payable())
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow(person, PERCENTAGE_PAYABLE, rule.percentage_payable()))?;

    Ok(round_half_up(payable, AMOUNT_DECIMAL_PLACES))
}

fn overflow(person: &Person, field: &str, value: Decimal) -> EngineError {
    EngineError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: "makes the weekly payment too large to calculate".to_string(),
        record: person.source().to_string(),
    }
}

/// Renders the report line for `person` paid under `rule` after
/// `weeks_since_injury` elapsed weeks.
pub fn render_report_line(
    person: &Person,
    rule: &Rule,
    weeks_since_injury: Decimal,
) -> EngineResult<ReportLine> {
    let pay = pay_for_this_week(person, rule)?;

    Ok(ReportLine {
        name: person.name().to_string(),
        pay_for_this_week: format_fixed(pay, AMOUNT_DECIMAL_PLACES),
        weeks_since_injury: format_fixed(weeks_since_injury, AMOUNT_DECIMAL_PLACES),
        hourly_rate: format_fixed(person.hourly_rate(), RATE_DECIMAL_PLACES),
        overtime_rate: format_fixed(person.overtime_rate(), RATE_DECIMAL_PLACES),
        normal_hours: format_fixed(person.normal_hours(), AMOUNT_DECIMAL_PLACES),
        overtime_hours: format_fixed(person.overtime_hours(), AMOUNT_DECIMAL_PLACES),
        percentage_payable: format_fixed(rule.percentage_payable(), AMOUNT_DECIMAL_PLACES),
        overtime_included: rule.overtime_included().to_string(),
    })
}
