//! HTTP API module for the PIAWE payment engine.
//!
//! This module provides the REST endpoint for building payment reports
//! against a rule table loaded when the server starts.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ReportRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
