use rust_decimal::Decimal;

use crate::models::{Policy, PolicyDefinition};

const DEFAULT_COVERAGE_LIMITS: &[(&str, i64)] = &[
    ("General Consultation", 2_000),
    ("Blood Test", 3_000),
    ("MRI Scan", 18_000),
    ("CT Scan", 15_000),
    ("ICU Charges", 10_000),
    ("Minor Surgery", 50_000),
    ("Major Surgery", 200_000),
    ("Knee Replacement Surgery", 150_000),
];

const DEFAULT_EXCLUSIONS: &[&str] = &[
    "Cosmetic Surgery",
    "Fertility Treatment",
    "Experimental Procedures",
    "Experimental Treatment",
];

const DEFAULT_NON_PAYABLE_ITEMS: &[&str] = &[
    "Gloves",
    "Masks",
    "Sanitizer",
    "Administrative Charges",
    "Registration Fees",
    "Sanitization Charges",
];

const DEFAULT_CO_PAYMENT_PERCENTAGE: i64 = 15;

/// Definition of the policy that is active until a document replaces it
pub fn default_policy_definition() -> PolicyDefinition {
    PolicyDefinition {
        coverage_limits: DEFAULT_COVERAGE_LIMITS
            .iter()
            .map(|&(name, limit)| (name.to_string(), Decimal::new(limit, 0)))
            .collect(),
        exclusions: DEFAULT_EXCLUSIONS.iter().map(ToString::to_string).collect(),
        non_payable_items: DEFAULT_NON_PAYABLE_ITEMS.iter().map(ToString::to_string).collect(),
        co_payment_percentage: Decimal::new(DEFAULT_CO_PAYMENT_PERCENTAGE, 0),
    }
}

pub fn default_policy() -> Policy {
    Policy::index(default_policy_definition())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_passes_validation() {
        let validated = Policy::new(default_policy_definition()).unwrap();
        assert_eq!(validated, default_policy());
    }

    #[test]
    fn test_default_policy_contents() {
        let policy = default_policy();
        assert_eq!(policy.coverage_limit("MRI Scan").unwrap(), Some(Decimal::new(18_000, 0)));
        assert_eq!(
            policy.coverage_limit("General Consultation").unwrap(),
            Some(Decimal::new(2_000, 0))
        );
        assert!(policy.is_excluded("Cosmetic Surgery").unwrap());
        assert!(policy.is_non_payable("Gloves").unwrap());
        assert_eq!(policy.co_payment_percentage(), Decimal::new(15, 0));
    }
}
