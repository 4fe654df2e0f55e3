//! HTTP surface of the billing service

pub mod error;
pub mod handlers;
pub mod paths;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::AppState;

use crate::service::BillingService;

/// Billing record and anomaly routes
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route(paths::records::RECORDS, post(handlers::create_record).get(handlers::list_records))
        .route(paths::records::RECORD_BY_ID, get(handlers::get_record))
        .route(paths::records::DETECT_ANOMALIES, post(handlers::detect_anomalies))
}

/// Bill analysis and market alternative routes
pub fn bill_routes() -> Router<AppState> {
    Router::new()
        .route(paths::bills::ANALYZE, post(handlers::analyze_bill))
        .route(paths::bills::PARSE, post(handlers::parse_bill))
        .route(paths::bills::ALTERNATIVES, post(handlers::find_alternatives))
}

/// Active policy routes
pub fn policy_routes() -> Router<AppState> {
    Router::new().route(
        paths::policy::POLICY,
        get(handlers::get_policy).put(handlers::replace_policy),
    )
}

/// Full billing API, nested under [`paths::API_BILLING`]
pub fn router(service: Arc<BillingService>) -> Router {
    let api = Router::new()
        .route(paths::HEALTH, get(handlers::health_check))
        .merge(record_routes())
        .merge(bill_routes())
        .merge(policy_routes());

    Router::new()
        .nest(paths::API_BILLING, api)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
