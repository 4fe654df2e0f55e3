use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::records::{AnomalySeverity, AnomalyType, BillingRecord, DetectedAnomaly};

const OVERCHARGE_MULTIPLIER: i64 = 2;
const OVERCHARGE_CONFIDENCE: f64 = 0.75;
const DUPLICATE_CONFIDENCE: f64 = 0.65;

/// Rules applied to every new billing record
#[derive(Debug, Clone)]
pub struct DetectionRules {
    /// Service code to its usual charge
    typical_amounts: HashMap<String, Decimal>,
    duplicate_window: Duration,
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            typical_amounts: [
                ("99213", Decimal::new(15_000, 2)),
                ("99214", Decimal::new(20_000, 2)),
                ("36415", Decimal::new(2_500, 2)),
            ]
            .into_iter()
            .map(|(code, amount)| (code.to_string(), amount))
            .collect(),
            duplicate_window: Duration::hours(24),
        }
    }
}

impl DetectionRules {
    pub fn typical_amount(&self, service_code: &str) -> Option<Decimal> {
        self.typical_amounts.get(service_code).copied()
    }

    /// All findings for `record` given the other stored records
    pub fn detect<'a>(
        &self,
        record: &BillingRecord,
        others: impl IntoIterator<Item = &'a BillingRecord>,
        now: DateTime<Utc>,
    ) -> Vec<DetectedAnomaly> {
        self.overcharge(record, now)
            .into_iter()
            .chain(self.duplicate(record, others, now))
            .collect()
    }

    /// Amount above twice the typical charge for a known service code
    pub fn overcharge(&self, record: &BillingRecord, now: DateTime<Utc>) -> Option<DetectedAnomaly> {
        let typical = self.typical_amount(&record.service_code)?;
        let threshold = typical.checked_mul(Decimal::new(OVERCHARGE_MULTIPLIER, 0))?;
        (record.amount > threshold).then(|| DetectedAnomaly {
            anomaly_id: anomaly_id(),
            record_id: record.record_id.clone(),
            anomaly_type: AnomalyType::Overcharge,
            severity: AnomalySeverity::High,
            description: format!(
                "Amount {} exceeds typical range for service code {}",
                record.amount, record.service_code
            ),
            confidence_score: OVERCHARGE_CONFIDENCE,
            detected_at: now,
            suggested_action: Some("Review pricing against fee schedule".to_string()),
        })
    }

    /// First other record for the same patient and service code within the
    /// duplicate window
    pub fn duplicate<'a>(
        &self,
        record: &BillingRecord,
        others: impl IntoIterator<Item = &'a BillingRecord>,
        now: DateTime<Utc>,
    ) -> Option<DetectedAnomaly> {
        let original = others.into_iter().find(|other| {
            other.record_id != record.record_id
                && other.patient_id == record.patient_id
                && other.service_code == record.service_code
                && (other.date_of_service - record.date_of_service).abs() < self.duplicate_window
        })?;

        Some(DetectedAnomaly {
            anomaly_id: anomaly_id(),
            record_id: record.record_id.clone(),
            anomaly_type: AnomalyType::Duplicate,
            severity: AnomalySeverity::Medium,
            description: format!("Possible duplicate of record {}", original.record_id),
            confidence_score: DUPLICATE_CONFIDENCE,
            detected_at: now,
            suggested_action: Some("Verify if this is a legitimate duplicate service".to_string()),
        })
    }
}

/// `ANOM-` and eight upper-case hex digits
fn anomaly_id() -> String {
    format!("ANOM-{}", short_hex_id())
}

pub(crate) fn short_hex_id() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase().chars().take(8).collect()
}
