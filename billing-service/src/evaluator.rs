use std::sync::Arc;

use anyhow::{anyhow, Context};
use error_common::report_internal;
use insurance_service::{Policy, TreatmentCoverage};
use pricing_service::{CostEfficiencyComparator, CostEfficiencyResult, CostEfficiencyStatus, PricingError};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::error::{BillingError, BillingResult};
use crate::models::{
    AnalysisResult, CostEfficiencyWarning, CoverageBreakdownEntry, CoverageStatus, ExcludedItem,
    ExclusionReason, ItemType, LineItem, MedicalBill, NonPayableItem, NonPayableReason, WarningPriority,
};

/// Outcome of checking one line against reference prices
#[derive(Debug)]
pub enum PriceCheck {
    Assessed(CostEfficiencyResult),
    /// No reference price for the item
    Unlisted,
    /// The comparison itself failed; the rest of the bill is still evaluated
    Failed(PricingError),
}

impl PriceCheck {
    /// The comparison, if it landed outside the market range
    pub fn overpriced(self) -> Option<CostEfficiencyResult> {
        match self {
            Self::Assessed(result) if result.status.is_overpriced() => Some(result),
            _ => None,
        }
    }
}

/// Failure inside a single evaluation run
enum Fault {
    /// Caller's fault, returned unchanged
    Input(BillingError),
    /// Anything else; logged and replaced by an opaque error id
    Internal(anyhow::Error),
}

impl From<BillingError> for Fault {
    fn from(error: BillingError) -> Self {
        Self::Input(error)
    }
}

impl From<anyhow::Error> for Fault {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error)
    }
}

/// Running sums for one bill
#[derive(Default)]
struct Totals {
    billed: Decimal,
    claimable: Decimal,
}

/// Applies a policy to a bill and collects market price warnings.
///
/// Evaluation holds no state between calls: the same bill and policy always
/// produce the same result.
#[derive(Debug, Clone, Default)]
pub struct CoverageEvaluator {
    comparator: Arc<CostEfficiencyComparator>,
}

impl CoverageEvaluator {
    pub fn new(comparator: Arc<CostEfficiencyComparator>) -> Self {
        Self { comparator }
    }

    /// # Errors
    ///
    /// Input problems come back as they are: [`BillingError::NoTreatments`],
    /// [`BillingError::Validation`] for an invalid line, and
    /// [`BillingError::NoCoverableTreatments`] when no treatment is covered.
    /// Any other failure is logged and reported as
    /// [`BillingError::EvaluationFailed`].
    pub fn evaluate(&self, bill: &MedicalBill, policy: &Policy) -> BillingResult<AnalysisResult> {
        match self.run(bill, policy) {
            Ok(result) => Ok(result),
            Err(Fault::Input(error)) => Err(error),
            Err(Fault::Internal(cause)) => {
                let error_id = report_internal("bill coverage evaluation", &cause);
                Err(BillingError::EvaluationFailed { error_id })
            }
        }
    }

    pub fn check_price(&self, item: &LineItem) -> PriceCheck {
        match self.comparator.evaluate(&item.name, item.cost) {
            Ok(Some(result)) => PriceCheck::Assessed(result),
            Ok(None) => PriceCheck::Unlisted,
            Err(error) => {
                warn!(item = %item.name, %error, "Price check failed; continuing without it");
                PriceCheck::Failed(error)
            }
        }
    }

    fn run(&self, bill: &MedicalBill, policy: &Policy) -> Result<AnalysisResult, Fault> {
        bill.validate()?;

        let mut totals = Totals::default();
        let mut excluded_items = Vec::new();
        let mut non_payable_items = Vec::new();
        let mut coverage_breakdown = Vec::with_capacity(bill.treatments.len());
        let mut cost_efficiency_warnings = Vec::new();

        for treatment in &bill.treatments {
            totals.billed = add(totals.billed, treatment.cost)?;
            let price_check = self.check_price(treatment);
            let mean_cost = match &price_check {
                PriceCheck::Assessed(result) => result.average_cost,
                PriceCheck::Unlisted | PriceCheck::Failed(_) => Decimal::ZERO,
            };

            let coverage = policy
                .classify_treatment(&treatment.name)
                .with_context(|| format!("classifying treatment '{}'", treatment.name))?;

            let (coverage_status, coverage_limit, claimable_amount) = match coverage {
                TreatmentCoverage::Excluded => {
                    excluded_items.push(ExcludedItem {
                        name: treatment.name.clone(),
                        cost: treatment.cost,
                        reason: ExclusionReason::PolicyExclusion,
                    });
                    (CoverageStatus::PolicyExclusion, Decimal::ZERO, Decimal::ZERO)
                }
                TreatmentCoverage::Covered { limit } => {
                    let claimable = treatment.cost.min(limit);
                    totals.claimable = add(totals.claimable, claimable)?;
                    (CoverageStatus::Covered, limit, claimable)
                }
                TreatmentCoverage::Uncovered => (CoverageStatus::UncoveredNoLimit, Decimal::ZERO, Decimal::ZERO),
            };
            debug!(
                treatment = %treatment.name,
                ?coverage_status,
                %claimable_amount,
                "Evaluated treatment"
            );

            coverage_breakdown.push(CoverageBreakdownEntry {
                treatment_name: treatment.name.clone(),
                billed_cost: treatment.cost,
                coverage_limit,
                claimable_amount,
                mean_cost,
                std_dev: Decimal::ZERO,
                historical_trend: Vec::new(),
                coverage_status,
            });

            if let Some(result) = price_check.overpriced() {
                cost_efficiency_warnings.push(CostEfficiencyWarning {
                    result,
                    item_type: ItemType::Treatment,
                    priority: None,
                    alert: None,
                });
            }
        }

        for item in &bill.other_items {
            totals.billed = add(totals.billed, item.cost)?;

            let non_payable = policy
                .is_non_payable(&item.name)
                .with_context(|| format!("checking non-payable item '{}'", item.name))?;
            if non_payable {
                non_payable_items.push(NonPayableItem {
                    name: item.name.clone(),
                    cost: item.cost,
                    reason: NonPayableReason::NonPayableItem,
                });
            }

            if let Some(result) = self.check_price(item).overpriced() {
                let (priority, alert) = if non_payable && result.status == CostEfficiencyStatus::HighlyOverpriced {
                    (
                        Some(WarningPriority::High),
                        Some(format!(
                            "Non-payable item '{}' is significantly overpriced ({:.2} vs typical {:.2})",
                            item.name, result.billed_cost, result.average_cost
                        )),
                    )
                } else {
                    (None, None)
                };
                cost_efficiency_warnings.push(CostEfficiencyWarning {
                    result,
                    item_type: ItemType::OtherItem,
                    priority,
                    alert,
                });
            }
        }

        if totals.claimable <= Decimal::ZERO {
            return Err(BillingError::NoCoverableTreatments.into());
        }

        let co_payment_deducted = totals
            .claimable
            .checked_mul(policy.co_payment_percentage())
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .map(round_money)
            .ok_or_else(|| anyhow!("co-payment on {} overflowed", totals.claimable))?;
        let total_claimable_amount = totals
            .claimable
            .checked_sub(co_payment_deducted)
            .map(round_money)
            .ok_or_else(|| anyhow!("claimable total after co-payment overflowed"))?;

        Ok(AnalysisResult {
            total_bill_amount: totals.billed,
            total_claimable_amount,
            co_payment_deducted,
            excluded_items,
            non_payable_items,
            coverage_breakdown,
            cost_efficiency_warnings,
        })
    }
}

fn add(total: Decimal, amount: Decimal) -> Result<Decimal, Fault> {
    total
        .checked_add(amount)
        .ok_or_else(|| Fault::Internal(anyhow!("running total {total} overflowed adding {amount}")))
}

/// Two decimal places, ties to even
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}
