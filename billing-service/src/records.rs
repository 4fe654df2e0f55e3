use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};

/// Billing record as submitted, before it is assigned an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBillingRecord {
    pub patient_id: String,
    pub provider_id: String,
    pub service_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    pub amount: Decimal,
    pub date_of_service: DateTime<Utc>,
    /// Defaults to the time the record is stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_billed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_claim_id: Option<String>,
}

impl NewBillingRecord {
    /// # Errors
    ///
    /// Rejects blank identifiers and a non-positive amount.
    pub fn validate(&self) -> BillingResult<()> {
        for (field, value) in [
            ("patient_id", &self.patient_id),
            ("provider_id", &self.provider_id),
            ("service_code", &self.service_code),
        ] {
            if value.trim().is_empty() {
                return Err(BillingError::Validation(format!("{field} cannot be empty")));
            }
        }
        if self.amount <= Decimal::ZERO {
            return Err(BillingError::Validation(format!(
                "Amount must be greater than zero, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Stored billing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub record_id: String,
    pub patient_id: String,
    pub provider_id: String,
    pub service_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    pub amount: Decimal,
    pub date_of_service: DateTime<Utc>,
    pub date_billed: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_claim_id: Option<String>,
}

impl BillingRecord {
    /// Identifiers are stored trimmed, so every rule compares the same values
    pub fn from_new(record_id: String, new: NewBillingRecord, now: DateTime<Utc>) -> Self {
        Self {
            record_id,
            patient_id: new.patient_id.trim().to_string(),
            provider_id: new.provider_id.trim().to_string(),
            service_code: new.service_code.trim().to_string(),
            service_description: new.service_description,
            amount: new.amount,
            date_of_service: new.date_of_service,
            date_billed: new.date_billed.unwrap_or(now),
            diagnosis_code: new.diagnosis_code,
            insurance_claim_id: new.insurance_claim_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    Overcharge,
    Duplicate,
    UnusualPattern,
    Fraudulent,
    CodingError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Suspicious finding on a billing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAnomaly {
    pub anomaly_id: String,
    pub record_id: String,
    pub anomaly_type: AnomalyType,
    pub severity: AnomalySeverity,
    pub description: String,
    /// 0.0 to 1.0
    pub confidence_score: f64,
    pub detected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Response to record creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordWithAnomalies {
    pub record: BillingRecord,
    pub anomalies: Vec<DetectedAnomaly>,
}

const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

/// On-demand detection over stored records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRequest {
    /// Empty means every stored record; unknown ids are ignored
    #[serde(default)]
    pub record_ids: Vec<String>,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_filter: Option<Vec<AnomalySeverity>>,
}

impl Default for DetectionRequest {
    fn default() -> Self {
        Self {
            record_ids: Vec::new(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            severity_filter: None,
        }
    }
}

impl DetectionRequest {
    /// # Errors
    ///
    /// Rejects a `min_confidence` outside 0.0 to 1.0.
    pub fn validate(&self) -> BillingResult<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(BillingError::Validation(format!(
                "min_confidence must be between 0 and 1, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }

    pub fn accepts(&self, anomaly: &DetectedAnomaly) -> bool {
        anomaly.confidence_score >= self.min_confidence
            && self
                .severity_filter
                .as_ref()
                .map_or(true, |allowed| allowed.contains(&anomaly.severity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub total_records_analyzed: usize,
    pub anomalies_detected: usize,
    pub anomalies: Vec<DetectedAnomaly>,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(amount: i64) -> NewBillingRecord {
        NewBillingRecord {
            patient_id: "PAT-1001".to_string(),
            provider_id: "PROV-7".to_string(),
            service_code: "99213".to_string(),
            service_description: None,
            amount: Decimal::new(amount, 0),
            date_of_service: Utc::now(),
            date_billed: None,
            diagnosis_code: None,
            insurance_claim_id: None,
        }
    }

    fn anomaly(severity: AnomalySeverity, confidence_score: f64) -> DetectedAnomaly {
        DetectedAnomaly {
            anomaly_id: "ANOM-00000000".to_string(),
            record_id: "BILL-20250101-00000000".to_string(),
            anomaly_type: AnomalyType::Duplicate,
            severity,
            description: String::new(),
            confidence_score,
            detected_at: Utc::now(),
            suggested_action: None,
        }
    }

    #[test]
    fn test_new_record_validation() {
        assert!(new_record(120).validate().is_ok());
        assert!(matches!(new_record(0).validate(), Err(BillingError::Validation(_))));

        let mut blank = new_record(120);
        blank.service_code = "  ".to_string();
        assert!(matches!(blank.validate(), Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_date_billed_defaults_to_storage_time() {
        let now = Utc::now();
        let record = BillingRecord::from_new("BILL-1".to_string(), new_record(120), now);
        assert_eq!(record.date_billed, now);
    }

    #[test]
    fn test_identifiers_are_stored_trimmed() {
        let mut new = new_record(120);
        new.patient_id = " PAT-1001 ".to_string();
        new.service_code = "\t99213 ".to_string();
        let record = BillingRecord::from_new("BILL-1".to_string(), new, Utc::now());
        assert_eq!(record.patient_id, "PAT-1001");
        assert_eq!(record.provider_id, "PROV-7");
        assert_eq!(record.service_code, "99213");
    }

    #[test]
    fn test_detection_request_defaults() {
        let request: DetectionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, DetectionRequest::default());
        assert!((request.min_confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_detection_request_filters() {
        let request = DetectionRequest {
            min_confidence: 0.7,
            severity_filter: Some(vec![AnomalySeverity::High]),
            ..Default::default()
        };
        assert!(request.accepts(&anomaly(AnomalySeverity::High, 0.75)));
        assert!(!request.accepts(&anomaly(AnomalySeverity::Medium, 0.75)));
        assert!(!request.accepts(&anomaly(AnomalySeverity::High, 0.65)));

        let out_of_range = DetectionRequest {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());
    }
}
