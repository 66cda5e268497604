use axum::{
    routing::{get, post},
    Router,
};

pub mod bills;
pub mod system;

/// Router for the billing endpoints.
///
/// `/api/discount/...` mirrors `/api/bills/...` for clients of the older
/// discount endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/api/bills", bills::router())
        .route("/api/discount", post(bills::create_bill))
        .route("/api/discount/bill/:id", get(bills::get_bill))
        .route("/api/discount/bills/customer/:identity", get(bills::list_customer_bills))
}
