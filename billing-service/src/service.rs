use std::sync::Arc;

use insurance_service::InsuranceService;
use logger_redacted::mask_identifier;
use pricing_service::{AlternativeKind, AlternativesCatalogue, CostEfficiencyComparator, SavingsEstimate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::document::{BillDocumentLayout, LabeledLineBillLayout};
use crate::error::BillingResult;
use crate::evaluator::CoverageEvaluator;
use crate::ledger::RecordLedger;
use crate::models::{AnalysisResult, MedicalBill};
use crate::records::{BillingRecord, DetectionReport, DetectionRequest, NewBillingRecord, RecordWithAnomalies};
use crate::reporting::BillingReports;

const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Analysis of a bill together with the policy version it was run against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillAnalysis {
    pub policy_version: u64,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// Bill read from a document, its analysis and the patient summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub hospital: String,
    pub bill: MedicalBill,
    pub policy_version: u64,
    pub analysis: AnalysisResult,
    pub summary: String,
}

/// Billing service
///
/// Ties together bill evaluation against the active policy, the billing
/// record ledger and market alternatives.
pub struct BillingService {
    insurance: Arc<InsuranceService>,
    evaluator: CoverageEvaluator,
    ledger: RecordLedger,
    bill_layout: Box<dyn BillDocumentLayout>,
    catalogue: AlternativesCatalogue,
    currency_symbol: String,
}

impl BillingService {
    /// Create a new billing service over the shared policy registry
    pub fn new(insurance: Arc<InsuranceService>, comparator: Arc<CostEfficiencyComparator>) -> Self {
        Self {
            insurance,
            evaluator: CoverageEvaluator::new(comparator),
            ledger: RecordLedger::default(),
            bill_layout: Box::new(LabeledLineBillLayout),
            catalogue: AlternativesCatalogue::builtin(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    #[must_use]
    pub fn with_bill_layout(mut self, layout: impl BillDocumentLayout + 'static) -> Self {
        self.bill_layout = Box::new(layout);
        self
    }

    #[must_use]
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn insurance(&self) -> &Arc<InsuranceService> {
        &self.insurance
    }

    pub fn ledger(&self) -> &RecordLedger {
        &self.ledger
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Evaluate a bill against a snapshot of the active policy
    ///
    /// # Errors
    ///
    /// See [`CoverageEvaluator::evaluate`].
    #[instrument(
        skip_all,
        fields(
            patient = %bill.patient_id.as_deref().map(mask_identifier).unwrap_or_default(),
            treatments = bill.treatments.len(),
        )
    )]
    pub async fn analyze_bill(&self, bill: &MedicalBill) -> BillingResult<BillAnalysis> {
        let active = self.insurance.active_policy().await;
        let analysis = self.evaluator.evaluate(bill, &active.policy).map_err(|error| {
            warn!(%error, policy_version = active.version, "Bill analysis failed");
            error
        })?;

        info!(
            policy_version = active.version,
            total_bill = %analysis.total_bill_amount,
            claimable = %analysis.total_claimable_amount,
            warnings = analysis.cost_efficiency_warnings.len(),
            "Bill analysed"
        );
        Ok(BillAnalysis {
            policy_version: active.version,
            analysis,
        })
    }

    /// Parse bill document text, analyse it and explain the result
    ///
    /// # Errors
    ///
    /// Returns [`crate::BillingError::Document`] when the text is not a bill,
    /// otherwise the errors of [`Self::analyze_bill`].
    #[instrument(skip_all, fields(layout = self.bill_layout.name()))]
    pub async fn parse_and_analyze(&self, text: &str) -> BillingResult<DocumentAnalysis> {
        let parsed = self.bill_layout.parse(text).map_err(|error| {
            warn!(%error, "Rejected bill document");
            error
        })?;
        let BillAnalysis {
            policy_version,
            analysis,
        } = self.analyze_bill(&parsed.bill).await?;
        let summary = BillingReports::patient_summary(&analysis, &self.currency_symbol);

        Ok(DocumentAnalysis {
            hospital: parsed.hospital,
            bill: parsed.bill,
            policy_version,
            analysis,
            summary,
        })
    }

    pub fn patient_summary(&self, analysis: &AnalysisResult) -> String {
        BillingReports::patient_summary(analysis, &self.currency_symbol)
    }

    /// # Errors
    ///
    /// See [`RecordLedger::create`].
    pub async fn create_record(&self, record: NewBillingRecord) -> BillingResult<RecordWithAnomalies> {
        self.ledger.create(record).await
    }

    /// # Errors
    ///
    /// See [`RecordLedger::get`].
    pub async fn get_record(&self, record_id: &str) -> BillingResult<BillingRecord> {
        self.ledger.get(record_id).await
    }

    pub async fn list_records(&self) -> Vec<BillingRecord> {
        self.ledger.list().await
    }

    /// # Errors
    ///
    /// See [`RecordLedger::detect`].
    pub async fn detect_anomalies(&self, request: &DetectionRequest) -> BillingResult<DetectionReport> {
        self.ledger.detect(request).await
    }

    /// Cheaper market options for a billed medicine or procedure
    ///
    /// # Errors
    ///
    /// Returns [`crate::BillingError::Pricing`] for a blank name or a
    /// non-positive price.
    pub fn estimate_savings(
        &self,
        item_name: &str,
        billed_price: Decimal,
        kind: AlternativeKind,
    ) -> BillingResult<Option<SavingsEstimate>> {
        Ok(self.catalogue.estimate_savings(item_name, billed_price, kind)?)
    }
}

impl Default for BillingService {
    fn default() -> Self {
        Self::new(Arc::default(), Arc::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BillingError;
    use crate::models::LineItem;
    use insurance_service::{Policy, PolicyDefinition, PolicySource};
    use std::collections::BTreeMap;

    fn bill() -> MedicalBill {
        MedicalBill::new(vec![LineItem::new("MRI Scan", Decimal::new(10_000, 0))], vec![])
    }

    #[tokio::test]
    async fn test_analysis_uses_active_policy_snapshot() {
        let service = BillingService::default();
        let first = service.analyze_bill(&bill()).await.unwrap();
        assert_eq!(first.policy_version, 1);
        assert_eq!(first.analysis.co_payment_deducted, Decimal::new(1_500, 0));

        let policy = Policy::new(PolicyDefinition {
            coverage_limits: BTreeMap::from([("MRI Scan".to_string(), Decimal::new(5_000, 0))]),
            co_payment_percentage: Decimal::new(10, 0),
            ..Default::default()
        })
        .unwrap();
        service.insurance().replace_policy(policy, PolicySource::Direct).await;

        let second = service.analyze_bill(&bill()).await.unwrap();
        assert_eq!(second.policy_version, 2);
        assert_eq!(second.analysis.total_claimable_amount, Decimal::new(4_500, 0));
    }

    #[tokio::test]
    async fn test_parse_and_analyze_document() {
        let service = BillingService::default().with_currency_symbol("Rs ");
        let analysed = service
            .parse_and_analyze("Patient: Ravi\nHospital: Lakeside\nTreatment: General Consultation - 1,000\nOther: Gloves - 150")
            .await
            .unwrap();

        assert_eq!(analysed.hospital, "Lakeside");
        assert_eq!(analysed.analysis.total_bill_amount, Decimal::new(1_150, 0));
        assert_eq!(analysed.analysis.non_payable_items.len(), 1);
        assert!(analysed.summary.contains("- Total billed amount: Rs 1,150.00"));
    }

    #[tokio::test]
    async fn test_bad_document_is_a_document_error() {
        let service = BillingService::default();
        let result = service.parse_and_analyze("Hospital: Lakeside").await;
        assert!(matches!(result, Err(BillingError::Document(_))));
    }

    #[test]
    fn test_estimate_savings_passes_through_pricing_errors() {
        let service = BillingService::default();
        let result = service.estimate_savings("Paracetamol", Decimal::ZERO, AlternativeKind::Medicine);
        assert!(matches!(result, Err(BillingError::Pricing(_))));
    }
}
