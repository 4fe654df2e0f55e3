use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::evaluator::round_money;
use crate::models::AnalysisResult;

/// Billing reports
pub struct BillingReports;

impl BillingReports {
    /// Plain-language explanation of an analysis for the patient.
    ///
    /// The output depends only on `result` and `currency`.
    pub fn patient_summary(result: &AnalysisResult, currency: &str) -> String {
        let mut lines: Vec<String> = vec![
            "Here is a clear summary of your medical bill and how your insurance may support you:".to_string(),
            String::new(),
            format!("- Total billed amount: {currency}{}", format_money(result.total_bill_amount)),
            format!(
                "- Estimated amount your insurer could pay after co-payment: {currency}{}",
                format_money(result.total_claimable_amount)
            ),
            format!(
                "- Your share due to co-payment: approximately {currency}{}",
                format_money(result.co_payment_deducted)
            ),
            String::new(),
        ];

        if result.excluded_items.is_empty() {
            lines.push(
                "Good news: based on this analysis, we did not find any treatments marked as policy exclusions."
                    .to_string(),
            );
        } else {
            lines.push(
                "Some treatments are not covered under your current policy and may need to be paid fully by you:"
                    .to_string(),
            );
            lines.push(format!(
                "- Excluded items: {}",
                join_names(result.excluded_items.iter().map(|item| item.name.as_str()))
            ));
        }
        lines.push(String::new());

        if result.non_payable_items.is_empty() {
            lines.push(
                "We did not flag any standard non-payable items like basic supplies or admin charges in this bill."
                    .to_string(),
            );
        } else {
            lines.push(
                "Certain items are considered non-payable (for example, basic supplies or administrative charges):"
                    .to_string(),
            );
            lines.push(format!(
                "- Non-payable items: {}",
                join_names(result.non_payable_items.iter().map(|item| item.name.as_str()))
            ));
            lines.push("These typically need to be covered by you and are standard across many insurance policies.".to_string());
        }
        lines.push(String::new());

        lines.push("Cost awareness and advisory:".to_string());
        if result.cost_efficiency_warnings.is_empty() {
            lines.push(
                "Based on our reference data, the costs in this bill appear to be within a normal market range for similar services."
                    .to_string(),
            );
        } else {
            let flagged = result
                .cost_efficiency_warnings
                .iter()
                .map(|warning| format!("{} ({})", warning.result.item_name, warning.status().label()))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(
                "Our cost comparison suggests that some items may be priced higher than typical market rates:"
                    .to_string(),
            );
            lines.push(format!("- Potentially overpriced: {flagged}"));
            lines.push(
                "You may want to ask your provider for a breakdown of these charges or if alternative options are available."
                    .to_string(),
            );
            lines.push(
                "If feasible, consider checking prices at nearby hospitals, diagnostic centers, or labs for similar services, \
                 as some providers may offer significantly lower rates for the same treatment."
                    .to_string(),
            );
        }

        lines.push(
            "Remember, this explanation is meant to empower you: you have the right to understand every charge, \
             ask your insurer or hospital for clarifications, and explore more affordable options when possible."
                .to_string(),
        );

        lines.join("\n")
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Two decimal places with comma thousands separators, e.g. `12,000.50`
pub fn format_money(amount: Decimal) -> String {
    let fixed = round_money(amount).abs().to_string();
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    if amount.is_sign_negative() && !amount.is_zero() {
        grouped.push('-');
    }
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let _ = write!(grouped, ".{fraction}");
    grouped
}
