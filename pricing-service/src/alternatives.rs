use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require_name, PricingError, PricingResult};

/// `(brand, price, dosage, quantity)`
type MedicineRow = (&'static str, i64, &'static str, u32);
/// `(provider, price, turnaround)`
type ProcedureRow = (&'static str, i64, &'static str);

const MEDICINES: &[(&str, &[MedicineRow])] = &[
    ("Amoxicillin", &[
        ("Amoxicillin (Generic)", 45, "500mg", 10),
        ("Augmentin", 120, "500mg", 10),
        ("Moxikind", 95, "500mg", 10),
    ]),
    ("Azithromycin", &[
        ("Azithromycin (Generic)", 60, "500mg", 3),
        ("Zithromax", 180, "500mg", 3),
        ("Aziblast", 90, "500mg", 3),
    ]),
    ("Ciprofloxacin", &[
        ("Ciprofloxacin (Generic)", 50, "500mg", 10),
        ("Cipro", 200, "500mg", 10),
        ("Ciprolet", 85, "500mg", 10),
    ]),
    ("Paracetamol", &[
        ("Paracetamol (Generic)", 20, "500mg", 15),
        ("Crocin", 65, "500mg", 15),
        ("Dolo", 55, "500mg", 15),
    ]),
    ("Ibuprofen", &[
        ("Ibuprofen (Generic)", 30, "400mg", 10),
        ("Brufen", 85, "400mg", 10),
        ("Combiflam", 75, "400mg", 10),
    ]),
    ("Diclofenac", &[
        ("Diclofenac (Generic)", 35, "50mg", 10),
        ("Voveran", 90, "50mg", 10),
        ("Diclogesic", 75, "50mg", 10),
    ]),
    ("Cough Syrup", &[
        ("Cough Syrup (Generic)", 40, "100ml", 1),
        ("Ascoril", 85, "100ml", 1),
        ("Strepsils", 70, "100ml", 1),
    ]),
    ("Vitamin C", &[
        ("Vitamin C (Generic)", 25, "500mg", 30),
        ("Celin", 70, "500mg", 30),
        ("Limcee", 65, "500mg", 30),
    ]),
    ("Vitamin D3", &[
        ("Vitamin D3 (Generic)", 40, "1000IU", 30),
        ("D-Rise", 110, "1000IU", 30),
        ("Osteocare", 100, "1000IU", 30),
    ]),
    ("Antacid", &[
        ("Antacid (Generic)", 30, "100ml", 1),
        ("Gelusil", 80, "100ml", 1),
        ("Digene", 75, "100ml", 1),
    ]),
    ("Cetirizine", &[
        ("Cetirizine (Generic)", 20, "10mg", 10),
        ("Alerid", 60, "10mg", 10),
        ("Xyzal", 85, "10mg", 10),
    ]),
];

const PROCEDURES: &[(&str, &[ProcedureRow])] = &[
    ("MRI Brain", &[
        ("Apollo Hospitals", 8500, "30 mins"),
        ("City Hospital", 7500, "30 mins"),
        ("Diagnostic Lab (XYZ)", 6000, "30 mins"),
    ]),
    ("MRI Spine", &[
        ("Apollo Hospitals", 9000, "30 mins"),
        ("City Hospital", 8000, "30 mins"),
        ("Diagnostic Lab (XYZ)", 7000, "30 mins"),
    ]),
    ("CT Scan", &[
        ("Apollo Hospitals", 5000, "15 mins"),
        ("City Hospital", 4000, "15 mins"),
        ("Diagnostic Lab (XYZ)", 3500, "15 mins"),
    ]),
    ("Blood Test", &[
        ("Pathlab Plus", 500, "24 hrs"),
        ("City Hospital", 800, "24 hrs"),
        ("Apollo Lab", 1000, "24 hrs"),
    ]),
    ("X-Ray", &[
        ("City Hospital", 300, "10 mins"),
        ("Diagnostic Lab (XYZ)", 250, "10 mins"),
        ("Apollo Hospitals", 400, "10 mins"),
    ]),
    ("Ultrasound", &[
        ("City Hospital", 500, "20 mins"),
        ("Diagnostic Lab (XYZ)", 400, "20 mins"),
        ("Apollo Hospitals", 700, "20 mins"),
    ]),
];

/// Savings above this share of the billed price mark the bill as overpriced
const OVERPRICED_SAVINGS_PERCENT: i64 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeKind {
    #[default]
    Medicine,
    Procedure,
}

/// A cheaper brand or provider for the same thing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketOption {
    Medicine {
        brand: String,
        price: Decimal,
        dosage: String,
        quantity: u32,
    },
    Procedure {
        provider: String,
        price: Decimal,
        turnaround: String,
    },
}

impl MarketOption {
    pub fn name(&self) -> &str {
        match self {
            Self::Medicine { brand, .. } => brand,
            Self::Procedure { provider, .. } => provider,
        }
    }

    pub fn price(&self) -> Decimal {
        match self {
            Self::Medicine { price, .. } | Self::Procedure { price, .. } => *price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub name: String,
    pub options: Vec<MarketOption>,
}

/// Potential savings from switching to the cheapest known option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub item_name: String,
    /// Catalogue entry the item was matched against
    pub matched_name: String,
    pub kind: AlternativeKind,
    pub billed_price: Decimal,
    pub cheapest_price: Decimal,
    pub cheapest_option: String,
    pub average_price: Decimal,
    pub savings_amount: Decimal,
    pub savings_percent: Decimal,
    pub is_overpriced: bool,
    pub alternatives: Vec<MarketOption>,
}

#[derive(Debug, Clone)]
pub struct AlternativesCatalogue {
    medicines: Vec<CatalogueEntry>,
    procedures: Vec<CatalogueEntry>,
}

impl Default for AlternativesCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AlternativesCatalogue {
    pub fn builtin() -> Self {
        let medicines = MEDICINES
            .iter()
            .map(|(name, rows)| CatalogueEntry {
                name: (*name).to_string(),
                options: rows
                    .iter()
                    .map(|&(brand, price, dosage, quantity)| MarketOption::Medicine {
                        brand: brand.to_string(),
                        price: Decimal::new(price, 0),
                        dosage: dosage.to_string(),
                        quantity,
                    })
                    .collect(),
            })
            .collect();

        let procedures = PROCEDURES
            .iter()
            .map(|(name, rows)| CatalogueEntry {
                name: (*name).to_string(),
                options: rows
                    .iter()
                    .map(|&(provider, price, turnaround)| MarketOption::Procedure {
                        provider: provider.to_string(),
                        price: Decimal::new(price, 0),
                        turnaround: turnaround.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self { medicines, procedures }
    }

    /// Exact name first, then a case-insensitive substring match in either
    /// direction, in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] for a blank name.
    pub fn find(&self, item_name: &str, kind: AlternativeKind) -> PricingResult<Option<&CatalogueEntry>> {
        let name = require_name(item_name)?;
        let entries = match kind {
            AlternativeKind::Medicine => &self.medicines,
            AlternativeKind::Procedure => &self.procedures,
        };

        if let Some(entry) = entries.iter().find(|entry| entry.name == name) {
            return Ok(Some(entry));
        }

        let wanted = name.to_lowercase();
        Ok(entries.iter().find(|entry| {
            let candidate = entry.name.to_lowercase();
            candidate.contains(&wanted) || wanted.contains(&candidate)
        }))
    }

    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] for a blank name, a non-positive
    /// billed price, or a price too large to compute with.
    pub fn estimate_savings(
        &self,
        item_name: &str,
        billed_price: Decimal,
        kind: AlternativeKind,
    ) -> PricingResult<Option<SavingsEstimate>> {
        if billed_price <= Decimal::ZERO {
            return Err(PricingError::Validation(format!(
                "Billed price must be greater than zero, got {billed_price}"
            )));
        }
        let Some(entry) = self.find(item_name, kind)? else {
            debug!(item = item_name.trim(), ?kind, "No market alternatives found");
            return Ok(None);
        };
        let Some(cheapest) = entry.options.iter().min_by_key(|option| option.price()) else {
            return Ok(None);
        };

        let out_of_range = || PricingError::Validation(format!("Billed price {billed_price} is out of range"));

        let total = entry
            .options
            .iter()
            .try_fold(Decimal::ZERO, |sum, option| sum.checked_add(option.price()))
            .ok_or_else(out_of_range)?;
        let average = total
            .checked_div(Decimal::from(entry.options.len()))
            .ok_or_else(out_of_range)?;
        let savings = billed_price
            .checked_sub(cheapest.price())
            .ok_or_else(out_of_range)?;
        let savings_percent = savings
            .checked_div(billed_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(out_of_range)?
            .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);

        Ok(Some(SavingsEstimate {
            item_name: item_name.trim().to_string(),
            matched_name: entry.name.clone(),
            kind,
            billed_price,
            cheapest_price: cheapest.price(),
            cheapest_option: cheapest.name().to_string(),
            average_price: average.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
            savings_amount: savings.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
            savings_percent,
            is_overpriced: savings_percent > Decimal::new(OVERPRICED_SAVINGS_PERCENT, 0),
            alternatives: entry.options.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_then_substring_lookup() {
        let catalogue = AlternativesCatalogue::builtin();

        let exact = catalogue.find("Paracetamol", AlternativeKind::Medicine).unwrap().unwrap();
        assert_eq!(exact.name, "Paracetamol");

        // Query contains the catalogue name
        let contained = catalogue
            .find("Paracetamol 500mg strip", AlternativeKind::Medicine)
            .unwrap()
            .unwrap();
        assert_eq!(contained.name, "Paracetamol");

        // Catalogue name contains the query
        let partial = catalogue.find("mri", AlternativeKind::Procedure).unwrap().unwrap();
        assert_eq!(partial.name, "MRI Brain");

        assert!(catalogue.find("Insulin", AlternativeKind::Medicine).unwrap().is_none());
    }

    #[test]
    fn test_kinds_are_searched_separately() {
        let catalogue = AlternativesCatalogue::builtin();
        assert!(catalogue.find("Blood Test", AlternativeKind::Medicine).unwrap().is_none());
        assert!(catalogue.find("Blood Test", AlternativeKind::Procedure).unwrap().is_some());
    }

    #[test]
    fn test_savings_for_overpriced_medicine() {
        let estimate = AlternativesCatalogue::builtin()
            .estimate_savings("Amoxicillin", Decimal::new(120, 0), AlternativeKind::Medicine)
            .unwrap()
            .unwrap();

        assert_eq!(estimate.cheapest_option, "Amoxicillin (Generic)");
        assert_eq!(estimate.cheapest_price, Decimal::new(45, 0));
        // (45 + 120 + 95) / 3
        assert_eq!(estimate.average_price, Decimal::new(8667, 2));
        assert_eq!(estimate.savings_amount, Decimal::new(75, 0));
        // 75 / 120 = 62.5%
        assert_eq!(estimate.savings_percent, Decimal::new(625, 1));
        assert!(estimate.is_overpriced);
        assert_eq!(estimate.alternatives.len(), 3);
    }

    #[test]
    fn test_savings_at_market_price_is_not_overpriced() {
        let estimate = AlternativesCatalogue::builtin()
            .estimate_savings("x-ray", Decimal::new(300, 0), AlternativeKind::Procedure)
            .unwrap()
            .unwrap();

        assert_eq!(estimate.matched_name, "X-Ray");
        assert_eq!(estimate.cheapest_option, "Diagnostic Lab (XYZ)");
        assert_eq!(estimate.savings_amount, Decimal::new(50, 0));
        // 50 / 300 = 16.67%
        assert_eq!(estimate.savings_percent, Decimal::new(167, 1));
        assert!(!estimate.is_overpriced);
    }

    #[test]
    fn test_savings_rejects_non_positive_price() {
        let result = AlternativesCatalogue::builtin().estimate_savings("Amoxicillin", Decimal::ZERO, AlternativeKind::Medicine);
        assert!(matches!(result, Err(PricingError::Validation(_))));
    }

    #[test]
    fn test_unknown_item_has_no_estimate() {
        let result = AlternativesCatalogue::builtin()
            .estimate_savings("Hip Replacement", Decimal::new(90_000, 0), AlternativeKind::Procedure)
            .unwrap();
        assert!(result.is_none());
    }
}
