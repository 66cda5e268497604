use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use retail_core::BillId;
use retail_infra::BillingError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_bill))
        .route("/:id", get(get_bill))
        .route("/customer/:identity", get(list_customer_bills))
}

pub async fn create_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateBillRequest>,
) -> axum::response::Response {
    let request = match body.into_domain() {
        Ok(r) => r,
        Err(e) => return errors::billing_error_to_response(e.into()),
    };

    match services.bills.create_bill(request, Utc::now()).await {
        Ok(bill) => (StatusCode::CREATED, Json(bill)).into_response(),
        Err(e) => errors::billing_error_to_response(e),
    }
}

pub async fn get_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BillId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::billing_error_to_response(BillingError::from(e)),
    };

    match services.bills.find_by_id(id).await {
        Ok(bill) => (StatusCode::OK, Json(bill)).into_response(),
        Err(e) => errors::billing_error_to_response(e),
    }
}

pub async fn list_customer_bills(
    Extension(services): Extension<Arc<AppServices>>,
    Path(identity): Path<String>,
) -> axum::response::Response {
    match services.bills.find_by_customer(&identity).await {
        Ok(bills) => (StatusCode::OK, Json(bills)).into_response(),
        Err(e) => errors::billing_error_to_response(e),
    }
}
