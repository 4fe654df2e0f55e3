use std::sync::Arc;

use pricing_service::{
    CostEfficiencyComparator, CostEfficiencyStatus, PricingError, ReferenceCostEntry, ReferencePriceTable,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn comparator_for(average: Decimal, max: Decimal) -> CostEfficiencyComparator {
    let entry = ReferenceCostEntry::new("Test Procedure", average, Decimal::ZERO, max);
    let table = ReferencePriceTable::from_entries(vec![entry]).unwrap();
    CostEfficiencyComparator::new(Arc::new(table))
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

proptest! {
    #[test]
    fn boundary_law_holds_for_any_band(
        average in 1i64..10_000_000,
        spread in 0i64..10_000_000,
        epsilon in 1i64..1_000,
    ) {
        let average = cents(average);
        let max = average + cents(spread);
        let epsilon = cents(epsilon);
        let comparator = comparator_for(average, max);
        let status = |cost: Decimal| comparator.evaluate("test procedure", cost).unwrap().unwrap().status;

        prop_assert_eq!(status(average), CostEfficiencyStatus::WithinMarketRange);
        prop_assert_eq!(status(max), if max > average {
            CostEfficiencyStatus::SlightlyOverpriced
        } else {
            CostEfficiencyStatus::WithinMarketRange
        });
        prop_assert_eq!(status(max + epsilon), CostEfficiencyStatus::HighlyOverpriced);
        if average + epsilon <= max {
            prop_assert_eq!(status(average + epsilon), CostEfficiencyStatus::SlightlyOverpriced);
        }
    }

    #[test]
    fn non_positive_costs_are_always_rejected(
        name in "[A-Za-z ]{0,24}",
        cost in -10_000_000i64..=0,
    ) {
        let comparator = CostEfficiencyComparator::default();
        let result = comparator.evaluate(&name, cents(cost));
        prop_assert!(matches!(result, Err(PricingError::Validation(_))));
    }

    #[test]
    fn unlisted_names_are_absent_not_errors(
        suffix in "[a-z]{3,12}",
        cost in 1i64..10_000_000,
    ) {
        let comparator = CostEfficiencyComparator::default();
        let name = format!("Unlisted {suffix}");
        prop_assert!(comparator.evaluate(&name, cents(cost)).unwrap().is_none());
    }
}

#[test]
fn builtin_table_respects_cost_ordering() {
    for entry in ReferencePriceTable::builtin().entries() {
        assert!(entry.is_consistent(), "{} has inconsistent bounds", entry.item_name);
    }
}
