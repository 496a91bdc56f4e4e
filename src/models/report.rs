//! Report output models.
//!
//! This module contains the [`ReportLine`] and [`PaymentReport`] types that
//! make up a PIAWE payment report. Every numeric field is pre-rendered as a
//! fixed-precision string so the output is byte-stable across runs.

use serde::{Deserialize, Serialize};

/// One person's payment for the report week.
///
/// Field order is the serialized order.
///
/// # Example
///
/// ```
/// use piawe_engine::models::ReportLine;
///
/// let line = ReportLine {
///     name: "test person".to_string(),
///     pay_for_this_week: "3037.50".to_string(),
///     weeks_since_injury: "10.00".to_string(),
///     hourly_rate: "75.000000".to_string(),
///     overtime_rate: "150.000000".to_string(),
///     normal_hours: "35.00".to_string(),
///     overtime_hours: "5.00".to_string(),
///     percentage_payable: "90.00".to_string(),
///     overtime_included: "true".to_string(),
/// };
/// assert_eq!(line.pay_for_this_week, "3037.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// The person's name.
    pub name: String,
    /// The amount payable this week, to 2 decimal places.
    pub pay_for_this_week: String,
    /// Elapsed weeks since the injury, to 2 decimal places.
    pub weeks_since_injury: String,
    /// The ordinary hourly rate, to 6 decimal places.
    pub hourly_rate: String,
    /// The overtime hourly rate, to 6 decimal places.
    pub overtime_rate: String,
    /// Ordinary hours per week, to 2 decimal places.
    pub normal_hours: String,
    /// Overtime hours per week, to 2 decimal places.
    pub overtime_hours: String,
    /// The percentage payable under the matched rule, to 2 decimal places.
    pub percentage_payable: String,
    /// `"true"` if the matched rule includes overtime, otherwise `"false"`.
    pub overtime_included: String,
}

/// A payment report for a single report date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReport {
    /// The report date as `YYYY/MM/DD`.
    pub report_date: String,
    /// One line per person, in input order.
    pub report_lines: Vec<ReportLine>,
}

/// The top-level document written by the CLI and returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiaweReport {
    /// The wrapped report.
    pub piawe_report: PaymentReport,
}

impl From<PaymentReport> for PiaweReport {
    fn from(report: PaymentReport) -> Self {
        Self {
            piawe_report: report,
        }
    }
}
