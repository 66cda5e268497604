use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use retail_infra::BillingError;

pub fn billing_error_to_response(err: BillingError) -> axum::response::Response {
    match err {
        BillingError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        BillingError::InvalidDate(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_date", msg),
        BillingError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        BillingError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        BillingError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        BillingError::Store(e) => {
            tracing::error!(error = %e, "bill store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
