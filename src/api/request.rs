//! Request types for the PIAWE payment API.
//!
//! This module defines the JSON request structure for the `/report` endpoint.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::parse_report_date;
use crate::error::EngineResult;

/// Request body for the `/report` endpoint.
///
/// Person records are kept untyped here; they are validated one by one while
/// the report is built, with the same errors as file input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// The person records to report on.
    pub people: Vec<Value>,
    /// The report date as `YYYY/MM/DD`. Defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
}

impl ReportRequest {
    /// Resolves the report date, falling back to today's local date.
    pub fn report_date(&self) -> EngineResult<NaiveDate> {
        match &self.report_date {
            Some(text) => parse_report_date(text),
            None => Ok(Local::now().date_naive()),
        }
    }
}
