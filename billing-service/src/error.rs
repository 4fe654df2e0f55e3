use error_common::{codes, Classify, ErrorKind};
use insurance_service::InsuranceError;
use pricing_service::PricingError;
use thiserror::Error;
use uuid::Uuid;

use crate::document::BillParseError;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Medical bill must contain at least one treatment")]
    NoTreatments,

    #[error("No valid treatments for insurance coverage")]
    NoCoverableTreatments,

    #[error("Billing record not found: {0}")]
    RecordNotFound(String),

    #[error("Bill document error: {0}")]
    Document(#[from] BillParseError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Insurance policy error: {0}")]
    Insurance(#[from] InsuranceError),

    /// The cause is logged under `error_id` and never returned to callers
    #[error("Bill evaluation failed (error id {error_id})")]
    EvaluationFailed { error_id: Uuid },
}

impl Classify for BillingError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::NoTreatments | Self::NoCoverableTreatments => ErrorKind::Validation,
            Self::RecordNotFound(_) => ErrorKind::NotFound,
            Self::Document(_) => ErrorKind::Format,
            Self::Pricing(error) => error.kind(),
            Self::Insurance(error) => error.kind(),
            Self::EvaluationFailed { .. } => ErrorKind::Internal,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => codes::validation::INVALID_INPUT,
            Self::NoTreatments => codes::billing::NO_TREATMENTS,
            Self::NoCoverableTreatments => codes::billing::NO_COVERABLE_TREATMENTS,
            Self::RecordNotFound(_) => codes::billing::RECORD_NOT_FOUND,
            Self::Document(_) => codes::billing::DOCUMENT_FORMAT,
            Self::Pricing(error) => error.code(),
            Self::Insurance(error) => error.code(),
            Self::EvaluationFailed { .. } => codes::billing::EVALUATION_FAILED,
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
