use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{LineItem, MedicalBill};

/// Why extracted bill text could not be read as a bill
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BillParseError {
    #[error("Bill document is empty or its text could not be extracted")]
    EmptyDocument,

    #[error("Patient name not found in bill document")]
    MissingPatient,

    #[error("Hospital name not found in bill document")]
    MissingHospital,

    #[error("No treatments found in bill document")]
    NoTreatments,

    #[error("Expected '<name> - <cost>' in line: {line:?}")]
    MalformedItem { line: String },

    #[error("Invalid cost in line: {line:?}")]
    InvalidCost { line: String },

    #[error("Cost for '{item}' must be greater than zero, found {cost}")]
    NonPositiveCost { item: String, cost: Decimal },
}

/// Bill read from a document, with the issuing hospital
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBill {
    pub hospital: String,
    pub bill: MedicalBill,
}

/// A bill document format
pub trait BillDocumentLayout: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns the specific reason the text is not a bill in this layout.
    fn parse(&self, text: &str) -> Result<ParsedBill, BillParseError>;
}

/// One labelled field per line:
///
/// ```text
/// Patient: Asha Verma
/// Hospital: City Care Hospital
/// Treatment: MRI Scan - 12,000
/// Treatment: Blood Test - 650.50
/// Other: Gloves - 150
/// ```
///
/// Labels are case-insensitive. Unlabelled lines are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledLineBillLayout;

impl BillDocumentLayout for LabeledLineBillLayout {
    fn name(&self) -> &'static str {
        "labeled_line"
    }

    fn parse(&self, text: &str) -> Result<ParsedBill, BillParseError> {
        let mut patient = None;
        let mut hospital = None;
        let mut treatments = Vec::new();
        let mut other_items = Vec::new();
        let mut any_line = false;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            any_line = true;
            let Some((label, value)) = line.split_once(':') else {
                debug!(line, "Skipping unlabelled bill line");
                continue;
            };
            let value = value.trim();
            match label.trim().to_lowercase().as_str() {
                "patient" if !value.is_empty() => patient = Some(value.to_string()),
                "hospital" if !value.is_empty() => hospital = Some(value.to_string()),
                "treatment" => treatments.push(parse_item(line, value)?),
                "other" => other_items.push(parse_item(line, value)?),
                _ => debug!(line, "Skipping unrecognised bill line"),
            }
        }

        if !any_line {
            return Err(BillParseError::EmptyDocument);
        }
        let patient = patient.ok_or(BillParseError::MissingPatient)?;
        let hospital = hospital.ok_or(BillParseError::MissingHospital)?;
        if treatments.is_empty() {
            return Err(BillParseError::NoTreatments);
        }

        let mut bill = MedicalBill::new(treatments, other_items);
        bill.patient_id = Some(patient);
        Ok(ParsedBill { hospital, bill })
    }
}

/// `<name> - <cost>`, split at the last `" - "` so hyphenated names survive
fn parse_item(line: &str, value: &str) -> Result<LineItem, BillParseError> {
    let malformed = || BillParseError::MalformedItem { line: line.to_string() };
    let (name, cost) = value.rsplit_once(" - ").ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }

    let cost = Decimal::from_str(cost.replace(',', "").trim())
        .map_err(|_| BillParseError::InvalidCost { line: line.to_string() })?;
    if cost <= Decimal::ZERO {
        return Err(BillParseError::NonPositiveCost {
            item: name.to_string(),
            cost,
        });
    }
    Ok(LineItem::new(name, cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        CITY CARE HOSPITAL - FINAL BILL
        Patient: Asha Verma
        Hospital: City Care Hospital
        treatment: MRI Scan - 12,000
        Treatment: X-Ray - Chest - 900.50
        Other: Gloves - 150
    ";

    fn parse(text: &str) -> Result<ParsedBill, BillParseError> {
        LabeledLineBillLayout.parse(text)
    }

    #[test]
    fn test_parses_labelled_bill() {
        let parsed = parse(SAMPLE).unwrap();
        assert_eq!(parsed.hospital, "City Care Hospital");
        assert_eq!(parsed.bill.patient_id.as_deref(), Some("Asha Verma"));
        assert_eq!(
            parsed.bill.treatments,
            vec![
                LineItem::new("MRI Scan", Decimal::new(12_000, 0)),
                LineItem::new("X-Ray - Chest", Decimal::new(90_050, 2)),
            ]
        );
        assert_eq!(parsed.bill.other_items, vec![LineItem::new("Gloves", Decimal::new(150, 0))]);
        assert!(parsed.bill.validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(parse(" \n "), Err(BillParseError::EmptyDocument));
        assert_eq!(
            parse("Hospital: X\nTreatment: MRI Scan - 100"),
            Err(BillParseError::MissingPatient)
        );
        assert_eq!(
            parse("Patient: A\nTreatment: MRI Scan - 100"),
            Err(BillParseError::MissingHospital)
        );
        assert_eq!(
            parse("Patient: A\nHospital: X\nOther: Gloves - 10"),
            Err(BillParseError::NoTreatments)
        );
    }

    #[test]
    fn test_bad_items() {
        assert!(matches!(
            parse("Patient: A\nHospital: X\nTreatment: MRI Scan 100"),
            Err(BillParseError::MalformedItem { .. })
        ));
        assert!(matches!(
            parse("Patient: A\nHospital: X\nTreatment: MRI Scan - lots"),
            Err(BillParseError::InvalidCost { .. })
        ));
        assert_eq!(
            parse("Patient: A\nHospital: X\nTreatment: MRI Scan - 0"),
            Err(BillParseError::NonPositiveCost {
                item: "MRI Scan".to_string(),
                cost: Decimal::ZERO
            })
        );
    }

    #[test]
    fn test_layout_trait_object() {
        let layout: Box<dyn BillDocumentLayout> = Box::new(LabeledLineBillLayout);
        assert_eq!(layout.name(), "labeled_line");
        assert!(layout.parse(SAMPLE).is_ok());
    }
}
