use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InsuranceError, InsuranceResult};

/// Serialized form of a policy, as supplied by callers and documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    /// Treatment name to the most the policy pays for it
    pub coverage_limits: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub non_payable_items: Vec<String>,
    /// Share of the claimable total the patient still bears, 0 to 100
    pub co_payment_percentage: Decimal,
}

/// How the policy treats a single treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreatmentCoverage {
    /// Listed as an exclusion, whether or not it also has a limit
    Excluded,
    Covered { limit: Decimal },
    /// Neither excluded nor given a coverage limit
    Uncovered,
}

/// Validated insurance policy with case-insensitive lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyDefinition", into = "PolicyDefinition")]
pub struct Policy {
    definition: PolicyDefinition,
    limits: HashMap<String, Decimal>,
    exclusions: HashSet<String>,
    non_payable: HashSet<String>,
}

impl Policy {
    /// # Errors
    ///
    /// Returns [`InsuranceError::InvalidPolicy`] when the co-payment is
    /// outside 0..=100, a limit is negative, a name is blank, or two
    /// coverage limits share a name ignoring case.
    pub fn new(definition: PolicyDefinition) -> InsuranceResult<Self> {
        let percentage = definition.co_payment_percentage;
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(InsuranceError::InvalidPolicy(format!(
                "co-payment percentage must be between 0 and 100, got {percentage}"
            )));
        }

        let mut seen = HashSet::new();
        for (name, limit) in &definition.coverage_limits {
            let key = normalize(name);
            if key.is_empty() {
                return Err(InsuranceError::InvalidPolicy(
                    "coverage limit names cannot be empty".to_string(),
                ));
            }
            if *limit < Decimal::ZERO {
                return Err(InsuranceError::InvalidPolicy(format!(
                    "coverage limit for '{name}' cannot be negative"
                )));
            }
            if !seen.insert(key) {
                return Err(InsuranceError::InvalidPolicy(format!(
                    "coverage limit for '{name}' is listed more than once"
                )));
            }
        }

        let blank_listed = definition
            .exclusions
            .iter()
            .chain(&definition.non_payable_items)
            .any(|name| name.trim().is_empty());
        if blank_listed {
            return Err(InsuranceError::InvalidPolicy(
                "exclusion and non-payable names cannot be empty".to_string(),
            ));
        }

        Ok(Self::index(definition))
    }

    /// Build lookup tables for a definition already known to be valid
    pub(crate) fn index(definition: PolicyDefinition) -> Self {
        let limits = definition
            .coverage_limits
            .iter()
            .map(|(name, limit)| (normalize(name), *limit))
            .collect();
        let exclusions = definition.exclusions.iter().map(|name| normalize(name)).collect();
        let non_payable = definition
            .non_payable_items
            .iter()
            .map(|name| normalize(name))
            .collect();

        Self {
            definition,
            limits,
            exclusions,
            non_payable,
        }
    }

    /// # Errors
    ///
    /// All queries reject blank names with [`InsuranceError::Validation`].
    pub fn is_excluded(&self, name: &str) -> InsuranceResult<bool> {
        Ok(self.exclusions.contains(&query_key(name)?))
    }

    /// Has a coverage limit and is not excluded
    ///
    /// # Errors
    ///
    /// Rejects blank names.
    pub fn is_covered(&self, name: &str) -> InsuranceResult<bool> {
        let key = query_key(name)?;
        Ok(self.limits.contains_key(&key) && !self.exclusions.contains(&key))
    }

    /// Configured limit, regardless of exclusion status
    ///
    /// # Errors
    ///
    /// Rejects blank names.
    pub fn coverage_limit(&self, name: &str) -> InsuranceResult<Option<Decimal>> {
        Ok(self.limits.get(&query_key(name)?).copied())
    }

    /// # Errors
    ///
    /// Rejects blank names.
    pub fn is_non_payable(&self, name: &str) -> InsuranceResult<bool> {
        Ok(self.non_payable.contains(&query_key(name)?))
    }

    pub fn co_payment_percentage(&self) -> Decimal {
        self.definition.co_payment_percentage
    }

    /// Exclusion takes precedence over a coverage limit
    ///
    /// # Errors
    ///
    /// Rejects blank names.
    pub fn classify_treatment(&self, name: &str) -> InsuranceResult<TreatmentCoverage> {
        let key = query_key(name)?;
        if self.exclusions.contains(&key) {
            return Ok(TreatmentCoverage::Excluded);
        }
        Ok(match self.limits.get(&key) {
            Some(&limit) => TreatmentCoverage::Covered { limit },
            None => TreatmentCoverage::Uncovered,
        })
    }

    pub fn definition(&self) -> &PolicyDefinition {
        &self.definition
    }
}

impl TryFrom<PolicyDefinition> for Policy {
    type Error = InsuranceError;

    fn try_from(definition: PolicyDefinition) -> InsuranceResult<Self> {
        Self::new(definition)
    }
}

impl From<Policy> for PolicyDefinition {
    fn from(policy: Policy) -> Self {
        policy.definition
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn query_key(name: &str) -> InsuranceResult<String> {
    let key = normalize(name);
    if key.is_empty() {
        return Err(InsuranceError::Validation("Item name cannot be empty".to_string()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> PolicyDefinition {
        PolicyDefinition {
            coverage_limits: BTreeMap::from([
                ("MRI Scan".to_string(), Decimal::new(18_000, 0)),
                ("Cosmetic Surgery".to_string(), Decimal::new(40_000, 0)),
            ]),
            exclusions: vec!["Cosmetic Surgery".to_string(), "Fertility Treatment".to_string()],
            non_payable_items: vec!["Gloves".to_string()],
            co_payment_percentage: Decimal::new(15, 0),
        }
    }

    #[test]
    fn test_queries_ignore_case_and_whitespace() {
        let policy = Policy::new(definition()).unwrap();
        assert!(policy.is_covered(" mri scan ").unwrap());
        assert_eq!(policy.coverage_limit("MRI SCAN").unwrap(), Some(Decimal::new(18_000, 0)));
        assert!(policy.is_excluded("fertility treatment").unwrap());
        assert!(policy.is_non_payable("GLOVES").unwrap());
        assert!(!policy.is_non_payable("Masks").unwrap());
        assert_eq!(policy.co_payment_percentage(), Decimal::new(15, 0));
    }

    #[test]
    fn test_exclusion_takes_precedence_over_limit() {
        let policy = Policy::new(definition()).unwrap();
        assert!(!policy.is_covered("Cosmetic Surgery").unwrap());
        assert_eq!(
            policy.coverage_limit("Cosmetic Surgery").unwrap(),
            Some(Decimal::new(40_000, 0))
        );
        assert_eq!(
            policy.classify_treatment("cosmetic surgery").unwrap(),
            TreatmentCoverage::Excluded
        );
    }

    #[test]
    fn test_classify_treatment() {
        let policy = Policy::new(definition()).unwrap();
        assert_eq!(
            policy.classify_treatment("MRI Scan").unwrap(),
            TreatmentCoverage::Covered { limit: Decimal::new(18_000, 0) }
        );
        assert_eq!(
            policy.classify_treatment("Acupuncture").unwrap(),
            TreatmentCoverage::Uncovered
        );
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let policy = Policy::new(definition()).unwrap();
        assert!(matches!(policy.is_excluded(""), Err(InsuranceError::Validation(_))));
        assert!(matches!(policy.is_covered("  "), Err(InsuranceError::Validation(_))));
        assert!(matches!(policy.coverage_limit("\t"), Err(InsuranceError::Validation(_))));
        assert!(matches!(policy.is_non_payable(""), Err(InsuranceError::Validation(_))));
    }

    #[test]
    fn test_co_payment_must_be_a_percentage() {
        for percentage in [Decimal::new(-1, 0), Decimal::new(10001, 2)] {
            let mut invalid = definition();
            invalid.co_payment_percentage = percentage;
            assert!(matches!(Policy::new(invalid), Err(InsuranceError::InvalidPolicy(_))));
        }

        let mut bounds = definition();
        bounds.co_payment_percentage = Decimal::ONE_HUNDRED;
        assert!(Policy::new(bounds).is_ok());
    }

    #[test]
    fn test_negative_limit_and_case_duplicates_are_rejected() {
        let mut negative = definition();
        negative.coverage_limits.insert("Blood Test".to_string(), Decimal::new(-1, 0));
        assert!(Policy::new(negative).is_err());

        let mut duplicate = definition();
        duplicate.coverage_limits.insert("mri scan".to_string(), Decimal::new(1, 0));
        assert!(Policy::new(duplicate).is_err());
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{
            "coverage_limits": {"Blood Test": 3000},
            "co_payment_percentage": 120
        }"#;
        assert!(serde_json::from_str::<Policy>(json).is_err());

        let json = r#"{
            "coverage_limits": {"Blood Test": 3000},
            "exclusions": ["Experimental Procedures"],
            "co_payment_percentage": 10
        }"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert!(policy.is_covered("blood test").unwrap());
        assert!(policy.definition().non_payable_items.is_empty());
    }
}
