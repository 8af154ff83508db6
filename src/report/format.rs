//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring code stays clean and testable
//! - output changes are localized

use crate::app::batch::BatchSummary;
use crate::domain::{ApplicationInput, Rating};
use crate::io::ingest::RejectedRow;
use crate::models::ModelParameters;
use crate::scoring::{Assessment, Explanation};

/// Loan-to-income multiple at which the gauge is full.
const LTI_GAUGE_MAX: f64 = 5.0;
const GAUGE_WIDTH: usize = 20;

/// Full single-applicant report.
pub fn format_assessment(input: &ApplicationInput, assessment: &Assessment) -> String {
    let mut out = String::new();

    out.push_str("=== Credit Risk Assessment ===\n");
    out.push_str(&format!(
        "Borrower: age {} | income {} | residence {}\n",
        input.age,
        fmt_amount(input.income),
        input.residence_type
    ));
    out.push_str(&format!(
        "Loan:     amount {} | tenure {}m | purpose {} | type {}\n",
        fmt_amount(input.loan_amount),
        input.loan_tenure_months,
        input.loan_purpose,
        input.loan_type
    ));
    out.push_str(&format!(
        "Behavior: avg DPD {} | delinquency {}% | utilization {}% | open accounts {}\n",
        input.avg_dpd_per_delinquency,
        input.delinquency_ratio,
        input.credit_utilization_ratio,
        input.number_of_open_accounts
    ));
    out.push_str(&format!(
        "Loan-to-Income Ratio: {:.2} {}\n",
        assessment.loan_to_income_ratio,
        gauge(assessment.loan_to_income_ratio / LTI_GAUGE_MAX)
    ));

    out.push_str("\nResults:\n");
    out.push_str(&format!(
        "- Default Probability: {} {}\n",
        fmt_percent(assessment.probability),
        gauge(assessment.probability)
    ));
    out.push_str(&format!("- Credit Score:        {}\n", assessment.credit_score));
    out.push_str(&format!("- Risk Rating:         {}\n", assessment.rating));
    out.push('\n');
    out.push_str(&interpretation(assessment));
    out.push('\n');

    out
}

/// One-sentence reading of an assessment.
pub fn interpretation(assessment: &Assessment) -> String {
    format!(
        "Based on your inputs, the model predicts a {} chance of default. \
         The borrower is rated as {} with a credit score of {}.",
        fmt_percent(assessment.probability),
        assessment.rating,
        assessment.credit_score
    )
}

/// Per-feature log-odds breakdown, largest absolute contribution first.
pub fn format_explanation(explanation: &Explanation) -> String {
    let mut rows: Vec<_> = explanation.contributions.iter().collect();
    rows.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = String::new();
    out.push_str("Log-odds breakdown:\n");
    out.push_str(&format!(
        "{:<30} {:>12} {:>10} {:>12}\n",
        "feature", "value", "weight", "contribution"
    ));
    for c in rows {
        out.push_str(&format!(
            "{:<30} {:>12.4} {:>10.4} {:>+12.4}\n",
            c.feature.to_string(),
            c.value,
            c.weight,
            c.contribution
        ));
    }
    out.push_str(&format!("{:<30} {:>12} {:>10} {:>+12.4}\n", "(intercept)", "", "", explanation.intercept));
    out.push_str(&format!("{:<30} {:>12} {:>10} {:>+12.4}\n", "log-odds", "", "", explanation.logodds));
    out
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    out.push_str("=== Batch Scoring Summary ===\n");
    out.push_str(&format!(
        "Rows: read={} | scored={} | rejected={}\n",
        summary.rows_read, summary.scored, summary.rejected
    ));
    if let (Some(p), Some(score)) = (summary.mean_probability, summary.mean_score) {
        out.push_str(&format!("Mean default probability: {}\n", fmt_percent(p)));
        out.push_str(&format!("Mean credit score: {score:.1}\n"));
    }

    out.push_str("\nBy rating:\n");
    for rating in Rating::ALL.iter().rev() {
        let n = summary.by_rating.get(rating).copied().unwrap_or(0);
        let share = if summary.scored == 0 {
            0.0
        } else {
            n as f64 / summary.scored as f64
        };
        out.push_str(&format!("  {:<10} {:>6}  {}\n", rating.label(), n, gauge(share)));
    }
    out
}

/// List rejected rows, at most `limit` of them.
pub fn format_rejections(rejected: &[RejectedRow], limit: Option<usize>) -> String {
    if rejected.is_empty() {
        return String::new();
    }

    let shown = limit.unwrap_or(rejected.len()).min(rejected.len());
    let mut out = String::new();
    out.push_str(&format!("Rejected rows ({}):\n", rejected.len()));
    for r in &rejected[..shown] {
        let id = r.id.as_deref().unwrap_or("-");
        out.push_str(&format!("  line {:>5} [{id}] {}\n", r.line, r.message));
    }
    if shown < rejected.len() {
        out.push_str(&format!("  ... and {} more\n", rejected.len() - shown));
    }
    out
}

pub fn format_model_summary(params: &ModelParameters) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Model: {} ===\n", params.name()));
    if let Some(date) = params.trained_on() {
        out.push_str(&format!("Trained on: {date}\n"));
    }
    out.push_str(&format!("Intercept: {:+.4}\n", params.intercept()));

    out.push_str(&format!("\nFeatures ({}):\n", params.features().len()));
    for (i, f) in params.features().iter().enumerate() {
        let scaling = f
            .scaling
            .map(|s| format!("  scaled [{}, {}]", s.min, s.max))
            .unwrap_or_default();
        out.push_str(&format!("{:>3}. {:<30} {:>+10.4}{scaling}\n", i + 1, f.key.to_string(), f.weight));
    }

    let v = params.vocabularies();
    out.push_str("\nVocabularies (baseline first):\n");
    out.push_str(&vocabulary_line("residence_type", v.residence_type.baseline, &v.residence_type.categories));
    out.push_str(&vocabulary_line("loan_purpose", v.loan_purpose.baseline, &v.loan_purpose.categories));
    out.push_str(&vocabulary_line("loan_type", v.loan_type.baseline, &v.loan_type.categories));

    out.push_str("\nScore bands:\n");
    let table = params.bands();
    for (i, band) in table.bands().iter().enumerate() {
        out.push_str(&format!(
            "  {:<10} {}-{}\n",
            band.label.label(),
            band.lower,
            table.upper_inclusive(i)
        ));
    }
    out
}

fn vocabulary_line<C: std::fmt::Display + PartialEq>(name: &str, baseline: C, categories: &[C]) -> String {
    let others: Vec<String> = categories
        .iter()
        .filter(|c| **c != baseline)
        .map(|c| c.to_string())
        .collect();
    format!("  {name:<15} {baseline} | {}\n", others.join(", "))
}

/// Percentage with two decimals (`0.808` -> `80.80%`).
pub fn fmt_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Whole amount with thousands separators (`1200000` -> `1,200,000`).
pub fn fmt_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Fixed-width bar for a fraction in `[0, 1]` (clamped).
fn gauge(fraction: f64) -> String {
    let f = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let filled = (f * GAUGE_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoanPurpose, LoanType, ResidenceType};
    use crate::models::params::fixtures::illustrative;
    use crate::scoring::ScoringPipeline;

    fn defaults() -> ApplicationInput {
        ApplicationInput {
            age: 28,
            income: 1_200_000.0,
            loan_amount: 2_560_000.0,
            loan_tenure_months: 36,
            avg_dpd_per_delinquency: 20.0,
            delinquency_ratio: 30.0,
            credit_utilization_ratio: 30.0,
            number_of_open_accounts: 2,
            residence_type: ResidenceType::Owned,
            loan_purpose: LoanPurpose::Education,
            loan_type: LoanType::Unsecured,
        }
    }

    #[test]
    fn assessment_report_shows_all_three_outputs() {
        let params = illustrative();
        let input = defaults();
        let assessment = ScoringPipeline::new(&params)
            .assess(&input.validate().unwrap())
            .unwrap();
        let text = format_assessment(&input, &assessment);

        assert!(text.contains("income 1,200,000"));
        assert!(text.contains("Loan-to-Income Ratio: 2.13"));
        assert!(text.contains("Default Probability: 80.8"));
        assert!(text.contains("Credit Score:        415"));
        assert!(text.contains("Risk Rating:         Poor"));
        assert!(text.contains("The borrower is rated as Poor with a credit score of 415."));
    }

    #[test]
    fn explanation_lists_every_feature() {
        let params = illustrative();
        let explanation = ScoringPipeline::new(&params)
            .explain(&defaults().validate().unwrap())
            .unwrap();
        let text = format_explanation(&explanation);
        assert!(text.contains("loan_to_income_ratio"));
        assert!(text.contains("loan_type=unsecured"));
        assert!(text.contains("(intercept)"));
    }

    #[test]
    fn model_summary_lists_bands_with_edges() {
        let text = format_model_summary(&illustrative());
        assert!(text.contains("Poor       300-579"));
        assert!(text.contains("Excellent  740-900"));
        assert!(text.contains("loan_type       Secured | Unsecured"));
    }

    #[test]
    fn rejections_are_truncated() {
        let rejected: Vec<RejectedRow> = (0..5)
            .map(|i| RejectedRow {
                line: i + 2,
                id: None,
                message: "bad".to_string(),
            })
            .collect();
        let text = format_rejections(&rejected, Some(2));
        assert!(text.contains("Rejected rows (5)"));
        assert!(text.contains("... and 3 more"));
        assert!(format_rejections(&[], Some(2)).is_empty());
    }

    #[test]
    fn amount_and_percent_formatting() {
        assert_eq!(fmt_amount(1_200_000.0), "1,200,000");
        assert_eq!(fmt_amount(999.0), "999");
        assert_eq!(fmt_amount(0.0), "0");
        assert_eq!(fmt_percent(0.80795), "80.80%");
    }

    #[test]
    fn gauge_is_clamped() {
        assert_eq!(gauge(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(gauge(7.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(gauge(0.5).matches('#').count(), 10);
    }
}
