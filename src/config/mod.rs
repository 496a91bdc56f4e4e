//! Input loading for the PIAWE payment engine.
//!
//! This module reads people and rules documents (JSON, or YAML by file
//! extension) and parses report dates given as text.
//!
//! # Example
//!
//! ```no_run
//! use piawe_engine::config::{InputLoader, parse_report_date};
//!
//! let loader = InputLoader::load("./people.json", "./rules.yaml").unwrap();
//! let report = loader.report(parse_report_date("2017/03/01").unwrap()).unwrap();
//! println!("{} lines", report.piawe_report.report_lines.len());
//! ```

mod loader;
mod types;

pub use loader::{InputLoader, parse_report_date};
pub use types::{InputFormat, PEOPLE_KEY, RULES_KEY};
