use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use error_common::{Classify, ErrorKind, ErrorReport};
use insurance_service::InsuranceError;
use pricing_service::PricingError;
use tracing::{error, warn};

use crate::error::BillingError;

/// Error returned by billing handlers, rendered as an [`ErrorReport`]
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    report: ErrorReport,
}

impl ApiError {
    fn classified<E: Classify>(error: &E) -> Self {
        Self {
            status: status_for(error.kind()),
            report: ErrorReport::from_error(error),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn report(&self) -> &ErrorReport {
        &self.report
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Format => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<BillingError> for ApiError {
    fn from(error: BillingError) -> Self {
        let api_error = Self::classified(&error);
        match error {
            // Keep the id the cause was logged under
            BillingError::EvaluationFailed { error_id } => Self {
                report: api_error.report.with_error_id(error_id),
                ..api_error
            },
            _ => api_error,
        }
    }
}

impl From<InsuranceError> for ApiError {
    fn from(error: InsuranceError) -> Self {
        Self::classified(&error)
    }
}

impl From<PricingError> for ApiError {
    fn from(error: PricingError) -> Self {
        Self::classified(&error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                error_id = %self.report.error_id,
                error_type = %self.report.error_type,
                code = %self.report.code,
                status_code = self.status.as_u16(),
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %self.report.error_id,
                error_type = %self.report.error_type,
                code = %self.report.code,
                status_code = self.status.as_u16(),
                message = %self.report.message,
                "Request rejected"
            );
        }
        (self.status, Json(self.report)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(BillingError::NoTreatments).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(BillingError::RecordNotFound("BILL-1".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PricingError::Validation("bad".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_evaluation_failure_keeps_logged_id() {
        let error_id = Uuid::new_v4();
        let api_error = ApiError::from(BillingError::EvaluationFailed { error_id });
        assert_eq!(api_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.report().error_id, error_id);
        assert!(!api_error.report().message.contains(&error_id.to_string()));
    }
}
