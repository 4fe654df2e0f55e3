use std::collections::HashMap;

use chrono::{DateTime, Utc};
use logger_redacted::mask_identifier;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::anomaly::{short_hex_id, DetectionRules};
use crate::error::{BillingError, BillingResult};
use crate::records::{
    BillingRecord, DetectedAnomaly, DetectionReport, DetectionRequest, NewBillingRecord, RecordWithAnomalies,
};

struct StoredRecord {
    record: BillingRecord,
    /// Found when the record was created
    anomalies: Vec<DetectedAnomaly>,
}

#[derive(Default)]
struct LedgerState {
    /// Record ids in insertion order
    order: Vec<String>,
    records: HashMap<String, StoredRecord>,
}

impl LedgerState {
    fn iter(&self) -> impl Iterator<Item = &BillingRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|stored| &stored.record)
    }
}

/// In-memory billing record store with anomaly detection on insert
#[derive(Default)]
pub struct RecordLedger {
    state: RwLock<LedgerState>,
    rules: DetectionRules,
}

impl RecordLedger {
    pub fn new(rules: DetectionRules) -> Self {
        Self {
            state: RwLock::default(),
            rules,
        }
    }

    /// Store a record and check it against the records already held
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Validation`] for an invalid record.
    #[instrument(skip_all, fields(patient = %mask_identifier(&new.patient_id), service_code = %new.service_code))]
    pub async fn create(&self, new: NewBillingRecord) -> BillingResult<RecordWithAnomalies> {
        new.validate().map_err(|error| {
            warn!(%error, "Rejected billing record");
            error
        })?;

        let now = Utc::now();
        let mut state = self.state.write().await;
        let record = BillingRecord::from_new(next_record_id(now, &state.records), new, now);
        let anomalies = self.rules.detect(&record, state.iter(), now);

        state.order.push(record.record_id.clone());
        state.records.insert(
            record.record_id.clone(),
            StoredRecord {
                record: record.clone(),
                anomalies: anomalies.clone(),
            },
        );

        info!(
            record_id = %record.record_id,
            anomalies = anomalies.len(),
            "Billing record created"
        );
        Ok(RecordWithAnomalies { record, anomalies })
    }

    /// # Errors
    ///
    /// Returns [`BillingError::RecordNotFound`] for an unknown id.
    pub async fn get(&self, record_id: &str) -> BillingResult<BillingRecord> {
        self.state
            .read()
            .await
            .records
            .get(record_id)
            .map(|stored| stored.record.clone())
            .ok_or_else(|| BillingError::RecordNotFound(record_id.to_string()))
    }

    /// Every record in the order it was created
    pub async fn list(&self) -> Vec<BillingRecord> {
        self.state.read().await.iter().cloned().collect()
    }

    /// Anomalies recorded when the record was created
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::RecordNotFound`] for an unknown id.
    pub async fn anomalies_for(&self, record_id: &str) -> BillingResult<Vec<DetectedAnomaly>> {
        self.state
            .read()
            .await
            .records
            .get(record_id)
            .map(|stored| stored.anomalies.clone())
            .ok_or_else(|| BillingError::RecordNotFound(record_id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run the rules again over the chosen records and filter the findings
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Validation`] for an out of range
    /// `min_confidence`.
    #[instrument(skip_all, fields(requested = request.record_ids.len()))]
    pub async fn detect(&self, request: &DetectionRequest) -> BillingResult<DetectionReport> {
        request.validate()?;

        let now = Utc::now();
        let state = self.state.read().await;
        let targets: Vec<&BillingRecord> = if request.record_ids.is_empty() {
            state.iter().collect()
        } else {
            request
                .record_ids
                .iter()
                .filter_map(|id| {
                    let found = state.records.get(id).map(|stored| &stored.record);
                    if found.is_none() {
                        debug!(record_id = %id, "Skipping unknown record");
                    }
                    found
                })
                .collect()
        };

        let anomalies: Vec<DetectedAnomaly> = targets
            .iter()
            .flat_map(|record| self.rules.detect(record, state.iter(), now))
            .filter(|anomaly| request.accepts(anomaly))
            .collect();

        info!(
            analyzed = targets.len(),
            detected = anomalies.len(),
            "Anomaly detection complete"
        );
        Ok(DetectionReport {
            total_records_analyzed: targets.len(),
            anomalies_detected: anomalies.len(),
            anomalies,
            analyzed_at: now,
        })
    }
}

/// `BILL-<yyyymmdd>-<8 upper-case hex>`, retried on the rare collision
fn next_record_id(now: DateTime<Utc>, taken: &HashMap<String, StoredRecord>) -> String {
    loop {
        let id = format!("BILL-{}-{}", now.format("%Y%m%d"), short_hex_id());
        if !taken.contains_key(&id) {
            return id;
        }
    }
}
