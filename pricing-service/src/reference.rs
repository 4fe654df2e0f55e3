use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{require_name, PricingError, PricingResult};
use crate::models::ReferenceCostEntry;

/// `(item, average, min, max)` market costs shipped with the engine
const BUILTIN_COSTS: &[(&str, i64, i64, i64)] = &[
    ("MRI Scan", 9000, 7000, 11000),
    ("CT Scan", 4500, 3500, 6000),
    ("Blood Test", 800, 500, 1200),
    ("Gloves", 100, 50, 200),
    ("Masks", 50, 20, 100),
    ("Sanitizer", 150, 80, 250),
];

/// Read-only reference price table keyed by case-insensitive item name
#[derive(Debug, Clone)]
pub struct ReferencePriceTable {
    entries: Vec<ReferenceCostEntry>,
    index: HashMap<String, usize>,
}

impl Default for ReferencePriceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferencePriceTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN_COSTS
            .iter()
            .map(|&(name, average, min, max)| {
                ReferenceCostEntry::new(
                    name,
                    Decimal::new(average, 0),
                    Decimal::new(min, 0),
                    Decimal::new(max, 0),
                )
            })
            .collect::<Vec<_>>();
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (normalize(&entry.item_name), position))
            .collect();
        Self { entries, index }
    }

    /// # Errors
    ///
    /// Rejects blank or duplicate names and entries whose bounds are not
    /// `0 <= min <= average <= max`.
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceCostEntry>) -> PricingResult<Self> {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for mut entry in entries {
            let name = require_name(&entry.item_name)
                .map_err(|_| PricingError::InvalidReferenceEntry {
                    item: entry.item_name.clone(),
                    reason: "item name cannot be empty".to_string(),
                })?
                .to_string();

            if !entry.is_consistent() {
                return Err(PricingError::InvalidReferenceEntry {
                    item: name,
                    reason: format!(
                        "expected 0 <= min ({}) <= average ({}) <= max ({})",
                        entry.min_cost, entry.average_cost, entry.max_cost
                    ),
                });
            }

            let key = normalize(&name);
            if table.index.contains_key(&key) {
                return Err(PricingError::InvalidReferenceEntry {
                    item: name,
                    reason: "duplicate item name".to_string(),
                });
            }

            entry.item_name = name;
            table.index.insert(key, table.entries.len());
            table.entries.push(entry);
        }

        Ok(table)
    }

    /// Load a JSON array of entries
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid JSON, or contains an
    /// invalid entry.
    pub fn from_json_file(path: impl AsRef<Path>) -> PricingResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let entries: Vec<ReferenceCostEntry> = serde_json::from_str(&raw)?;
        let table = Self::from_entries(entries)?;
        info!(path = %path.display(), entries = table.len(), "Loaded reference price table");
        Ok(table)
    }

    /// Case-insensitive exact match; `None` for unlisted items
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Validation`] for a blank name.
    pub fn lookup(&self, item_name: &str) -> PricingResult<Option<&ReferenceCostEntry>> {
        let name = require_name(item_name)?;
        Ok(self
            .index
            .get(&normalize(name))
            .and_then(|&position| self.entries.get(position)))
    }

    pub fn entries(&self) -> &[ReferenceCostEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
