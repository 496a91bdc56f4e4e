//! Calculation logic for the PIAWE payment engine.
//!
//! This module contains the rule table with its consistency checks and
//! lookup, the weekly payment calculation with its fixed-precision
//! rendering, and the report builder that runs a roster against a table.

mod payment;
mod report_builder;
mod rule_table;

pub use payment::{
    AMOUNT_DECIMAL_PLACES, RATE_DECIMAL_PLACES, format_fixed, pay_for_this_week,
    render_report_line,
};
pub use report_builder::{ReportBuilder, build_report, person_from_value};
pub use rule_table::RuleTable;
