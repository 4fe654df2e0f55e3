use chrono::{DateTime, Utc};
use pricing_service::{CostEfficiencyResult, CostEfficiencyStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};

/// One charged line of a bill, either a treatment or another item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub cost: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, cost: Decimal) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }

    /// # Errors
    ///
    /// Rejects a blank name or a cost that is not positive.
    pub fn validate(&self) -> BillingResult<()> {
        if self.name.trim().is_empty() {
            return Err(BillingError::Validation("Line item name cannot be empty".to_string()));
        }
        if self.cost <= Decimal::ZERO {
            return Err(BillingError::Validation(format!(
                "Cost for '{}' must be greater than zero",
                self.name.trim()
            )));
        }
        Ok(())
    }
}

/// Medical bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalBill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub treatments: Vec<LineItem>,
    #[serde(default)]
    pub other_items: Vec<LineItem>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MedicalBill {
    pub fn new(treatments: Vec<LineItem>, other_items: Vec<LineItem>) -> Self {
        Self {
            bill_id: None,
            patient_id: None,
            treatments,
            other_items,
            created_at: Utc::now(),
        }
    }

    /// # Errors
    ///
    /// Returns [`BillingError::NoTreatments`] for a bill without treatments,
    /// even when it has other items, and a validation error for the first
    /// invalid line item.
    pub fn validate(&self) -> BillingResult<()> {
        if self.treatments.is_empty() {
            return Err(BillingError::NoTreatments);
        }
        self.treatments
            .iter()
            .chain(&self.other_items)
            .try_for_each(LineItem::validate)
    }
}

/// Which list of the bill a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Treatment,
    OtherItem,
}

/// How the policy treated a billed treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Covered,
    PolicyExclusion,
    /// Not excluded, but the policy sets no limit for it either
    UncoveredNoLimit,
}

/// Per-treatment claim line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageBreakdownEntry {
    pub treatment_name: String,
    pub billed_cost: Decimal,
    /// Zero when excluded or uncovered
    pub coverage_limit: Decimal,
    pub claimable_amount: Decimal,
    /// Reference average cost, zero when unlisted
    pub mean_cost: Decimal,
    /// No variance data is kept, so always zero
    pub std_dev: Decimal,
    /// No price history is kept, so always empty
    pub historical_trend: Vec<Decimal>,
    pub coverage_status: CoverageStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    PolicyExclusion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedItem {
    pub name: String,
    pub cost: Decimal,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonPayableReason {
    NonPayableItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonPayableItem {
    pub name: String,
    pub cost: Decimal,
    pub reason: NonPayableReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningPriority {
    High,
}

/// An over-market price found on the bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEfficiencyWarning {
    #[serde(flatten)]
    pub result: CostEfficiencyResult,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<WarningPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

impl CostEfficiencyWarning {
    pub fn status(&self) -> CostEfficiencyStatus {
        self.result.status
    }
}

/// Claim breakdown for one bill against one policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_bill_amount: Decimal,
    /// After co-payment
    pub total_claimable_amount: Decimal,
    pub co_payment_deducted: Decimal,
    pub excluded_items: Vec<ExcludedItem>,
    pub non_payable_items: Vec<NonPayableItem>,
    pub coverage_breakdown: Vec<CoverageBreakdownEntry>,
    pub cost_efficiency_warnings: Vec<CostEfficiencyWarning>,
}
