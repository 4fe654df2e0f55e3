use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use insurance_service::ActivePolicy;
use pricing_service::{AlternativeKind, SavingsEstimate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::models::MedicalBill;
use crate::records::{BillingRecord, DetectionReport, DetectionRequest, NewBillingRecord, RecordWithAnomalies};
use crate::service::{BillAnalysis, BillingService, DocumentAnalysis};

pub type AppState = Arc<BillingService>;

/// Extracted text of a bill or policy document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentText {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesRequest {
    pub item_name: String,
    pub billed_price: Decimal,
    #[serde(default)]
    pub kind: AlternativeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesResponse {
    pub item_name: String,
    /// Absent when no alternatives are known for the item
    pub estimate: Option<SavingsEstimate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub policy_version: u64,
    pub records: usize,
}

pub async fn health_check(State(service): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        policy_version: service.insurance().active_policy().await.version,
        records: service.ledger().len().await,
    })
}

pub async fn create_record(
    State(service): State<AppState>,
    Json(record): Json<NewBillingRecord>,
) -> Result<(StatusCode, Json<RecordWithAnomalies>), ApiError> {
    let created = service.create_record(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_records(State(service): State<AppState>) -> Json<Vec<BillingRecord>> {
    Json(service.list_records().await)
}

pub async fn get_record(
    State(service): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<BillingRecord>, ApiError> {
    Ok(Json(service.get_record(&record_id).await?))
}

pub async fn detect_anomalies(
    State(service): State<AppState>,
    Json(request): Json<DetectionRequest>,
) -> Result<Json<DetectionReport>, ApiError> {
    Ok(Json(service.detect_anomalies(&request).await?))
}

pub async fn analyze_bill(
    State(service): State<AppState>,
    Json(bill): Json<MedicalBill>,
) -> Result<Json<BillAnalysis>, ApiError> {
    Ok(Json(service.analyze_bill(&bill).await?))
}

pub async fn parse_bill(
    State(service): State<AppState>,
    Json(document): Json<DocumentText>,
) -> Result<Json<DocumentAnalysis>, ApiError> {
    Ok(Json(service.parse_and_analyze(&document.text).await?))
}

pub async fn get_policy(State(service): State<AppState>) -> Json<ActivePolicy> {
    Json(ActivePolicy::clone(&*service.insurance().active_policy().await))
}

pub async fn replace_policy(
    State(service): State<AppState>,
    Json(document): Json<DocumentText>,
) -> Result<Json<ActivePolicy>, ApiError> {
    let active = service.insurance().load_policy_document(&document.text).await?;
    Ok(Json(ActivePolicy::clone(&active)))
}

pub async fn find_alternatives(
    State(service): State<AppState>,
    Json(request): Json<AlternativesRequest>,
) -> Result<Json<AlternativesResponse>, ApiError> {
    let estimate = service.estimate_savings(&request.item_name, request.billed_price, request.kind)?;
    Ok(Json(AlternativesResponse {
        item_name: request.item_name,
        estimate,
    }))
}
