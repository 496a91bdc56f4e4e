//! HTTP request handlers for the PIAWE payment API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::PiaweReport;

use super::request::ReportRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/report", post(report_handler))
        .with_state(state)
}

/// Handler for POST /report endpoint.
///
/// Runs the posted roster against the server's rule table and returns the
/// wrapped payment report.
async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("MISSING_FIELD", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    match build(&state, &request) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                people = request.people.len(),
                report_date = %report.piawe_report.report_date,
                "Report completed successfully"
            );
            json_response(StatusCode::OK, report)
        }
        Err(err) => {
            if err.is_internal() {
                tracing::error!(correlation_id = %correlation_id, error = %err, "Report failed");
            } else {
                warn!(correlation_id = %correlation_id, error = %err, "Report rejected");
            }
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn build(state: &AppState, request: &ReportRequest) -> EngineResult<PiaweReport> {
    let report_date = request.report_date()?;
    state
        .builder()
        .build(&request.people, report_date)
        .map(PiaweReport::from)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::ReportBuilder;
    use axum::{body::Body, http::Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let builder = ReportBuilder::from_rule_records(&[
            json!({"applicableWeeks": "1-26", "percentagePayable": 90, "overtimeIncluded": true}),
            json!({"applicableWeeks": "27-52", "percentagePayable": 80, "overtimeIncluded": true}),
            json!({"applicableWeeks": "53+", "percentagePayable": 70, "overtimeIncluded": false}),
        ])
        .expect("valid rules");
        AppState::new(builder)
    }

    async fn post_report(body: String) -> (StatusCode, Value) {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/report")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response.headers().get("content-type").unwrap().clone();
        assert_eq!(content_type, "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let body = json!({
            "people": [{
                "name": "test person",
                "hourlyRate": 75.0,
                "overtimeRate": 150.0,
                "normalHours": 35.0,
                "overtimeHours": 5,
                "injuryDate": "2016/12/21"
            }],
            "report_date": "2017/03/01"
        });

        let (status, result) = post_report(body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let report: PiaweReport = serde_json::from_value(result).unwrap();
        assert_eq!(report.piawe_report.report_date, "2017/03/01");
        assert_eq!(report.piawe_report.report_lines[0].pay_for_this_week, "3037.50");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, result) = post_report("{invalid json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_people_returns_missing_field() {
        let (status, result) = post_report(r#"{"report_date": "2017/03/01"}"#.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "MISSING_FIELD");
    }

    #[tokio::test]
    async fn test_empty_person_returns_missing_field() {
        let body = json!({"people": [{}], "report_date": "2017/03/01"});
        let (status, result) = post_report(body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(result).unwrap();
        assert_eq!(error.code, "MISSING_FIELD");
        assert!(error.message.contains("'name'"));
    }

    #[tokio::test]
    async fn test_invalid_report_date_returns_invalid_format() {
        let body = json!({"people": [], "report_date": "2017/01/50"});
        let (status, result) = post_report(body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn test_oversized_person_returns_invalid_value() {
        let body = json!({
            "people": [{
                "name": "huge",
                "hourlyRate": 1e15,
                "overtimeRate": 0,
                "normalHours": 1e15,
                "overtimeHours": 0,
                "injuryDate": "2016/12/21"
            }],
            "report_date": "2017/03/01"
        });
        let (status, result) = post_report(body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(result["code"], "INVALID_VALUE");
    }
}
