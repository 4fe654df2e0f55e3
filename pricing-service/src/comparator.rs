use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{require_name, PricingError, PricingResult};
use crate::models::CostEfficiencyResult;
use crate::reference::ReferencePriceTable;

/// Classifies billed amounts against a shared reference table
#[derive(Debug, Clone, Default)]
pub struct CostEfficiencyComparator {
    reference: Arc<ReferencePriceTable>,
}

impl CostEfficiencyComparator {
    pub fn new(reference: Arc<ReferencePriceTable>) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &ReferencePriceTable {
        &self.reference
    }

    /// Market band for `billed_cost`, or `None` when the item has no
    /// reference price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] when `billed_cost` is not
    /// positive or `item_name` is blank. The cost check runs first, so a
    /// non-positive cost is rejected for every name.
    pub fn evaluate(&self, item_name: &str, billed_cost: Decimal) -> PricingResult<Option<CostEfficiencyResult>> {
        if billed_cost <= Decimal::ZERO {
            return Err(PricingError::Validation(format!(
                "Billed cost must be greater than zero, got {billed_cost}"
            )));
        }
        let name = require_name(item_name)?;

        let Some(entry) = self.reference.lookup(name)? else {
            debug!(item = name, "No reference price for item");
            return Ok(None);
        };

        let status = entry.classify(billed_cost);
        debug!(item = name, %billed_cost, ?status, "Classified billed cost");

        Ok(Some(CostEfficiencyResult {
            item_name: name.to_string(),
            billed_cost,
            average_cost: entry.average_cost,
            min_cost: entry.min_cost,
            max_cost: entry.max_cost,
            status,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostEfficiencyStatus;

    fn comparator() -> CostEfficiencyComparator {
        CostEfficiencyComparator::default()
    }

    fn status_of(item: &str, cost: Decimal) -> CostEfficiencyStatus {
        comparator().evaluate(item, cost).unwrap().unwrap().status
    }

    #[test]
    fn test_boundary_law_for_mri_scan() {
        let epsilon = Decimal::new(1, 2);
        let average = Decimal::new(9000, 0);
        let max = Decimal::new(11000, 0);

        assert_eq!(status_of("MRI Scan", average), CostEfficiencyStatus::WithinMarketRange);
        assert_eq!(status_of("MRI Scan", average + epsilon), CostEfficiencyStatus::SlightlyOverpriced);
        assert_eq!(status_of("MRI Scan", max), CostEfficiencyStatus::SlightlyOverpriced);
        assert_eq!(status_of("MRI Scan", max + epsilon), CostEfficiencyStatus::HighlyOverpriced);
    }

    #[test]
    fn test_below_minimum_is_within_range() {
        assert_eq!(status_of("blood test", Decimal::new(100, 0)), CostEfficiencyStatus::WithinMarketRange);
    }

    #[test]
    fn test_result_carries_reference_bounds() {
        let result = comparator()
            .evaluate("Gloves", Decimal::new(150, 0))
            .unwrap()
            .unwrap();
        assert_eq!(result.item_name, "Gloves");
        assert_eq!(result.billed_cost, Decimal::new(150, 0));
        assert_eq!(result.average_cost, Decimal::new(100, 0));
        assert_eq!(result.min_cost, Decimal::new(50, 0));
        assert_eq!(result.max_cost, Decimal::new(200, 0));
        assert_eq!(result.status, CostEfficiencyStatus::SlightlyOverpriced);
    }

    #[test]
    fn test_unlisted_item_is_absent() {
        let result = comparator()
            .evaluate("Knee Replacement Surgery", Decimal::new(140_000, 0))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_non_positive_cost_is_rejected_for_listed_and_unlisted_items() {
        for name in ["MRI Scan", "Unlisted Procedure", ""] {
            for cost in [Decimal::ZERO, Decimal::new(-5, 0)] {
                assert!(
                    matches!(comparator().evaluate(name, cost), Err(PricingError::Validation(_))),
                    "{name:?} at {cost} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(matches!(
            comparator().evaluate("  ", Decimal::ONE),
            Err(PricingError::Validation(_))
        ));
    }
}
