//! Core data models for the PIAWE payment engine.
//!
//! This module contains the validated input values and the report output types.

mod person;
mod report;
mod rule;

pub use person::Person;
pub use report::{PaymentReport, PiaweReport, ReportLine};
pub use rule::Rule;

/// Input keys of a person record.
pub mod person_fields {
    pub use super::person::{
        HOURLY_RATE, INJURY_DATE, NAME, NORMAL_HOURS, OVERTIME_HOURS, OVERTIME_RATE,
    };
}

/// Input keys of a rule record.
pub mod rule_fields {
    pub use super::rule::{APPLICABLE_WEEKS, OVERTIME_INCLUDED, PERCENTAGE_PAYABLE};
}
