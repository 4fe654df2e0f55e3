use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{Policy, PolicyDefinition};

/// Why a policy document could not be turned into a policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyFormatError {
    #[error("Policy document is empty or its text could not be extracted")]
    EmptyDocument,

    #[error("No coverage limits found in policy document")]
    NoCoverageLimits,

    #[error("Co-payment percentage not found in policy document")]
    MissingCoPayment,

    #[error("Invalid co-payment line format: {line:?}")]
    InvalidCoPaymentLine { line: String },

    #[error("Invalid co-payment percentage value in line: {line:?}")]
    InvalidCoPayment { line: String },

    #[error("Co-payment percentage must be between 0 and 100, found {value}")]
    CoPaymentOutOfRange { value: Decimal },

    #[error("Policy document describes an invalid policy: {0}")]
    InvalidPolicy(String),
}

/// A document format that can be read into a [`Policy`]
pub trait PolicyDocumentLayout: Send + Sync {
    fn name(&self) -> &'static str;

    /// `lines` are trimmed and non-empty, in document order
    ///
    /// # Errors
    ///
    /// Returns the specific reason the lines do not describe a policy.
    fn parse(&self, lines: &[&str]) -> Result<Policy, PolicyFormatError>;
}

/// Trimmed, non-empty lines of extracted document text
pub fn document_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
}

/// Parse document text with the default [`SectionedPolicyLayout`]
///
/// # Errors
///
/// See [`SectionedPolicyLayout`].
pub fn parse_policy_document(text: &str) -> Result<Policy, PolicyFormatError> {
    SectionedPolicyLayout.parse(&document_lines(text))
}

/// Line-oriented layout with headed sections:
///
/// ```text
/// Coverage Limits:
/// MRI Scan - 10,000
/// Blood Test: 1500
///
/// Exclusions:
/// Cosmetic Surgery
///
/// Non Payable Items:
/// Gloves
///
/// Co-Payment: 10%
/// ```
///
/// Coverage lines that do not end in a number are skipped. The co-payment
/// line may appear anywhere; the last one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionedPolicyLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    CoverageLimits,
    Exclusions,
    NonPayable,
}

impl PolicyDocumentLayout for SectionedPolicyLayout {
    fn name(&self) -> &'static str {
        "sectioned"
    }

    fn parse(&self, lines: &[&str]) -> Result<Policy, PolicyFormatError> {
        if lines.is_empty() {
            return Err(PolicyFormatError::EmptyDocument);
        }

        let mut coverage_limits = BTreeMap::new();
        let mut exclusions = Vec::new();
        let mut non_payable_items = Vec::new();
        let mut co_payment = None;
        let mut section = None;

        for &line in lines {
            let lower = line.to_lowercase();

            if lower.contains("coverage") && (lower.contains("limit") || lower.contains(':')) {
                section = Some(Section::CoverageLimits);
                continue;
            }
            if lower.contains("exclusions") {
                section = Some(Section::Exclusions);
                continue;
            }
            if lower.contains("non payable") || lower.contains("non-payable") {
                section = Some(Section::NonPayable);
                continue;
            }
            if ["copayment", "co-payment", "co payment"]
                .iter()
                .any(|marker| lower.contains(marker))
            {
                co_payment = Some(parse_co_payment(line)?);
                continue;
            }

            let entry = strip_bullet(line);
            if entry.is_empty() {
                continue;
            }
            match section {
                Some(Section::CoverageLimits) => match parse_coverage_line(entry) {
                    Some((name, limit)) => insert_limit(&mut coverage_limits, name, limit),
                    None => debug!(line = entry, "Skipping unparsable coverage line"),
                },
                Some(Section::Exclusions) => exclusions.push(entry.to_string()),
                Some(Section::NonPayable) => non_payable_items.push(entry.to_string()),
                None => {}
            }
        }

        if coverage_limits.is_empty() {
            return Err(PolicyFormatError::NoCoverageLimits);
        }
        let co_payment_percentage = co_payment.ok_or(PolicyFormatError::MissingCoPayment)?;
        if co_payment_percentage < Decimal::ZERO || co_payment_percentage > Decimal::ONE_HUNDRED {
            return Err(PolicyFormatError::CoPaymentOutOfRange {
                value: co_payment_percentage,
            });
        }

        Policy::new(PolicyDefinition {
            coverage_limits,
            exclusions,
            non_payable_items,
            co_payment_percentage,
        })
        .map_err(|e| PolicyFormatError::InvalidPolicy(e.to_string()))
    }
}

/// `"CoPayment: 10%"` or `"Co-Payment - 10"`
fn parse_co_payment(line: &str) -> Result<Decimal, PolicyFormatError> {
    let value = line
        .split_once(':')
        .or_else(|| line.rsplit_once('-'))
        .map(|(_, value)| value)
        .ok_or_else(|| PolicyFormatError::InvalidCoPaymentLine {
            line: line.to_string(),
        })?;

    Decimal::from_str(value.replace('%', "").trim()).map_err(|_| PolicyFormatError::InvalidCoPayment {
        line: line.to_string(),
    })
}

/// `"<name> - <number>"` or `"<name>: <number>"`, split at whichever of
/// the last `" - "` or last `:` comes later. A bare hyphen never separates,
/// so `X-Ray` keeps its name and `-5000` keeps its sign.
fn parse_coverage_line(line: &str) -> Option<(&str, Decimal)> {
    let dash = line.rfind(" - ").map(|at| (at, at + 3));
    let colon = line.rfind(':').map(|at| (at, at + 1));
    let (name_end, value_start) = match (dash, colon) {
        (Some(dash), Some(colon)) => dash.max(colon),
        (separator, None) | (None, separator) => separator?,
    };
    let name = line.get(..name_end)?.trim();
    let value = line.get(value_start..)?;
    if name.is_empty() || name.ends_with([':', '-']) {
        return None;
    }
    let limit = Decimal::from_str(value.replace(',', "").trim()).ok()?;
    (limit >= Decimal::ZERO).then_some((name, limit))
}

/// Later lines override earlier ones with the same name, ignoring case
fn insert_limit(limits: &mut BTreeMap<String, Decimal>, name: &str, limit: Decimal) {
    let key = name.to_lowercase();
    limits.retain(|existing, _| existing.to_lowercase() != key);
    limits.insert(name.to_string(), limit);
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(['-', '*', '•']).trim()
}
