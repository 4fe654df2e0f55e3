use std::collections::BTreeMap;

use billing_service::{BillingError, CoverageEvaluator, CoverageStatus, LineItem, MedicalBill};
use insurance_service::{default_policy, Policy, PolicyDefinition};
use pricing_service::CostEfficiencyStatus;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn money(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

#[test]
fn scenario_covered_treatment_above_market_price() {
    let bill = MedicalBill::new(vec![LineItem::new("MRI Scan", money(12_000))], vec![]);
    let result = CoverageEvaluator::default().evaluate(&bill, &default_policy()).unwrap();

    let entry = &result.coverage_breakdown[0];
    assert_eq!(entry.coverage_status, CoverageStatus::Covered);
    assert_eq!(entry.coverage_limit, money(18_000));
    assert_eq!(entry.claimable_amount, money(12_000));

    assert_eq!(result.cost_efficiency_warnings.len(), 1);
    let warning = &result.cost_efficiency_warnings[0];
    assert_eq!(warning.result.item_name, "MRI Scan");
    assert_eq!(warning.status(), CostEfficiencyStatus::HighlyOverpriced);

    assert_eq!(result.co_payment_deducted, money(1_800));
    assert_eq!(result.total_claimable_amount, money(10_200));
}

#[test]
fn scenario_only_excluded_treatment() {
    let policy = Policy::new(PolicyDefinition {
        coverage_limits: BTreeMap::from([("General Consultation".to_string(), money(2_000))]),
        exclusions: vec!["Cosmetic Surgery".to_string()],
        co_payment_percentage: money(15),
        ..Default::default()
    })
    .unwrap();
    let bill = MedicalBill::new(vec![LineItem::new("Cosmetic Surgery", money(5_000))], vec![]);

    let error = CoverageEvaluator::default().evaluate(&bill, &policy).unwrap_err();
    assert!(matches!(error, BillingError::NoCoverableTreatments));
    assert_eq!(error.to_string(), "No valid treatments for insurance coverage");
}

#[test]
fn scenario_consultation_with_non_payable_supplies() {
    let bill = MedicalBill::new(
        vec![LineItem::new("General Consultation", money(1_000))],
        vec![LineItem::new("Gloves", money(150))],
    );
    let result = CoverageEvaluator::default().evaluate(&bill, &default_policy()).unwrap();

    assert_eq!(result.non_payable_items.len(), 1);
    assert_eq!(result.non_payable_items[0].name, "Gloves");
    assert_eq!(result.coverage_breakdown[0].claimable_amount, money(1_000));
    assert_eq!(result.co_payment_deducted.to_string(), "150.00");
    assert_eq!(result.total_claimable_amount.to_string(), "850.00");
    assert_eq!(result.total_bill_amount, money(1_150));
}

#[test]
fn result_serializes_money_as_numbers() {
    let bill = MedicalBill::new(vec![LineItem::new("General Consultation", money(1_000))], vec![]);
    let result = CoverageEvaluator::default().evaluate(&bill, &default_policy()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["total_claimable_amount"].is_number());
    assert_eq!(json["total_claimable_amount"].as_f64(), Some(850.0));
    assert_eq!(json["coverage_breakdown"][0]["coverage_status"], "covered");
}

proptest! {
    #[test]
    fn claimable_plus_co_payment_is_capped_claim(cents in 1i64..100_000_000, percent in 0i64..=100) {
        let policy = Policy::new(PolicyDefinition {
            coverage_limits: BTreeMap::from([("Major Surgery".to_string(), money(200_000))]),
            co_payment_percentage: money(percent),
            ..Default::default()
        })
        .unwrap();
        let cost = Decimal::new(cents, 2);
        let bill = MedicalBill::new(vec![LineItem::new("Major Surgery", cost)], vec![]);
        let evaluator = CoverageEvaluator::default();

        let result = evaluator.evaluate(&bill, &policy).unwrap();
        let capped = cost.min(money(200_000));
        prop_assert_eq!(result.total_claimable_amount + result.co_payment_deducted, capped);
        prop_assert_eq!(result.co_payment_deducted.scale(), 2);
        prop_assert_eq!(&result, &evaluator.evaluate(&bill, &policy).unwrap());
    }
}
