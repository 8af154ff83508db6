//! Export scored applications and synthetic samples to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Scored rows repeat the input columns so the file can be re-ingested as-is.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::app::batch::ScoredApplication;
use crate::domain::Categorical;
use crate::error::{AppError, EXIT_IO};
use crate::io::ingest::ApplicationRecord;

/// Input columns followed by the assessment.
///
/// Kept flat: the csv writer cannot serialize nested or flattened structs.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    id: &'a str,
    age: i64,
    income: f64,
    loan_amount: f64,
    loan_tenure_months: i64,
    avg_dpd_per_delinquency: f64,
    delinquency_ratio: f64,
    credit_utilization_ratio: f64,
    number_of_open_accounts: i64,
    residence_type: &'a str,
    loan_purpose: &'a str,
    loan_type: &'a str,
    loan_to_income_ratio: String,
    probability: String,
    credit_score: u16,
    rating: &'a str,
}

impl<'a> ResultRow<'a> {
    fn new(scored: &'a ScoredApplication) -> Self {
        let input = &scored.input;
        let assessment = &scored.assessment;
        Self {
            id: &scored.id,
            age: input.age,
            income: input.income,
            loan_amount: input.loan_amount,
            loan_tenure_months: input.loan_tenure_months,
            avg_dpd_per_delinquency: input.avg_dpd_per_delinquency,
            delinquency_ratio: input.delinquency_ratio,
            credit_utilization_ratio: input.credit_utilization_ratio,
            number_of_open_accounts: input.number_of_open_accounts,
            residence_type: input.residence_type.label(),
            loan_purpose: input.loan_purpose.label(),
            loan_type: input.loan_type.label(),
            loan_to_income_ratio: format!("{:.4}", assessment.loan_to_income_ratio),
            probability: format!("{:.6}", assessment.probability),
            credit_score: assessment.credit_score.value(),
            rating: assessment.rating.label(),
        }
    }
}

/// Write scored applications to a CSV file.
pub fn write_results_csv(path: &Path, scored: &[ScoredApplication]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, scored)
}

/// Write scored applications to any writer.
pub fn write_results<W: Write>(sink: W, scored: &[ScoredApplication]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    for s in scored {
        writer
            .serialize(ResultRow::new(s))
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write raw application records (input schema only).
pub fn write_applications_csv(path: &Path, records: &[ApplicationRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_applications(file, records)
}

/// Write raw application records to any writer.
pub fn write_applications<W: Write>(sink: W, records: &[ApplicationRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::batch::score_batch;
    use crate::io::ingest::{load_applications, read_applications};
    use crate::models::params::fixtures::illustrative;
    use crate::scoring::ScoringPipeline;

    const CSV: &str = "id,age,income,loan_amount,loan_tenure_months,avg_dpd_per_delinquency,delinquency_ratio,credit_utilization_ratio,number_of_open_accounts,residence_type,loan_purpose,loan_type
A1,28,1200000,2560000,36,20,30,30,2,Owned,Education,Unsecured
";

    #[test]
    fn results_csv_has_inputs_and_outputs() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let out = score_batch(&pipeline, read_applications(CSV.as_bytes()).unwrap());

        let mut buf = Vec::new();
        write_results(&mut buf, &out.scored).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("id,age,income,"));
        assert!(header.ends_with("loan_to_income_ratio,probability,credit_score,rating"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("A1,28,"));
        assert!(row.ends_with(",415,Poor"), "{row}");
    }

    #[test]
    fn written_results_can_be_re_ingested() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let out = score_batch(&pipeline, read_applications(CSV.as_bytes()).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scored.csv");
        write_results_csv(&path, &out.scored).unwrap();

        let again = load_applications(&path).unwrap();
        assert_eq!(again.rows.len(), 1);
        assert_eq!(again.rows[0].id, "A1");
    }
}
