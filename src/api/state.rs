//! Application state for the PIAWE payment API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::ReportBuilder;

/// Shared application state.
///
/// Holds the report builder whose rule table was validated once at startup.
/// The table is immutable, so requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    /// The report builder over the server's rule table.
    builder: Arc<ReportBuilder>,
}

impl AppState {
    /// Creates a new application state around a report builder.
    pub fn new(builder: ReportBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
        }
    }

    /// Returns a reference to the report builder.
    pub fn builder(&self) -> &ReportBuilder {
        &self.builder
    }
}
