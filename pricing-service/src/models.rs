use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Typical market cost range for a billed item or procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCostEntry {
    pub item_name: String,
    pub average_cost: Decimal,
    pub min_cost: Decimal,
    pub max_cost: Decimal,
}

impl ReferenceCostEntry {
    pub fn new(item_name: impl Into<String>, average_cost: Decimal, min_cost: Decimal, max_cost: Decimal) -> Self {
        Self {
            item_name: item_name.into(),
            average_cost,
            min_cost,
            max_cost,
        }
    }

    /// `min_cost <= average_cost <= max_cost` with no negative bound
    pub fn is_consistent(&self) -> bool {
        self.min_cost >= Decimal::ZERO
            && self.min_cost <= self.average_cost
            && self.average_cost <= self.max_cost
    }

    /// Strictly greater-than at both band boundaries
    pub fn classify(&self, billed_cost: Decimal) -> CostEfficiencyStatus {
        if billed_cost > self.max_cost {
            CostEfficiencyStatus::HighlyOverpriced
        } else if billed_cost > self.average_cost {
            CostEfficiencyStatus::SlightlyOverpriced
        } else {
            CostEfficiencyStatus::WithinMarketRange
        }
    }
}

/// Market price band of a billed amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostEfficiencyStatus {
    WithinMarketRange,
    SlightlyOverpriced,
    HighlyOverpriced,
}

impl CostEfficiencyStatus {
    pub fn is_overpriced(&self) -> bool {
        !matches!(self, Self::WithinMarketRange)
    }

    /// Lower-case words, e.g. `slightly overpriced`
    pub fn label(&self) -> &'static str {
        match self {
            Self::WithinMarketRange => "within market range",
            Self::SlightlyOverpriced => "slightly overpriced",
            Self::HighlyOverpriced => "highly overpriced",
        }
    }
}

/// Comparison of one billed amount against its reference entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEfficiencyResult {
    pub item_name: String,
    pub billed_cost: Decimal,
    pub average_cost: Decimal,
    pub min_cost: Decimal,
    pub max_cost: Decimal,
    pub status: CostEfficiencyStatus,
}
