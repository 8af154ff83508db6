//! CSV ingest of loan applications.
//!
//! This module turns a CSV of raw applications into validated `Applicant`s that
//! are safe to score.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no scoring here

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Applicant, ApplicationInput, LoanPurpose, LoanType, ResidenceType};
use crate::error::{AppError, EXIT_INPUT, RowError};

/// Columns every application CSV must provide (`id` is optional).
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "age",
    "income",
    "loan_amount",
    "loan_tenure_months",
    "avg_dpd_per_delinquency",
    "delinquency_ratio",
    "credit_utilization_ratio",
    "number_of_open_accounts",
    "residence_type",
    "loan_purpose",
    "loan_type",
];

/// One CSV row as written on disk.
///
/// Categorical columns stay strings here so an unknown category becomes a
/// row-level encoding error instead of a CSV parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub age: i64,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: i64,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub number_of_open_accounts: i64,
    pub residence_type: String,
    pub loan_purpose: String,
    pub loan_type: String,
}

impl ApplicationRecord {
    pub fn from_input(id: impl Into<String>, input: &ApplicationInput) -> Self {
        Self {
            id: Some(id.into()),
            age: input.age,
            income: input.income,
            loan_amount: input.loan_amount,
            loan_tenure_months: input.loan_tenure_months,
            avg_dpd_per_delinquency: input.avg_dpd_per_delinquency,
            delinquency_ratio: input.delinquency_ratio,
            credit_utilization_ratio: input.credit_utilization_ratio,
            number_of_open_accounts: input.number_of_open_accounts,
            residence_type: input.residence_type.to_string(),
            loan_purpose: input.loan_purpose.to_string(),
            loan_type: input.loan_type.to_string(),
        }
    }

    /// Parse categorical columns and check numeric ranges.
    pub fn to_applicant(&self) -> Result<Applicant, RowError> {
        let input = ApplicationInput {
            age: self.age,
            income: self.income,
            loan_amount: self.loan_amount,
            loan_tenure_months: self.loan_tenure_months,
            avg_dpd_per_delinquency: self.avg_dpd_per_delinquency,
            delinquency_ratio: self.delinquency_ratio,
            credit_utilization_ratio: self.credit_utilization_ratio,
            number_of_open_accounts: self.number_of_open_accounts,
            residence_type: self.residence_type.parse::<ResidenceType>()?,
            loan_purpose: self.loan_purpose.parse::<LoanPurpose>()?,
            loan_type: self.loan_type.parse::<LoanType>()?,
        };
        Ok(input.validate()?)
    }
}

/// A row that passed parsing and validation.
#[derive(Debug, Clone)]
pub struct IngestedRow {
    pub line: usize,
    pub id: String,
    pub applicant: Applicant,
}

/// A row that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestedApplications {
    pub rows: Vec<IngestedRow>,
    pub rejected: Vec<RejectedRow>,
    pub rows_read: usize,
}

/// Load applications from a CSV file.
pub fn load_applications(path: &Path) -> Result<IngestedApplications, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open CSV '{}': {e}", path.display()),
        )
    })?;
    read_applications(file)
}

/// Parse applications from any CSV reader.
pub fn read_applications<R: Read>(source: R) -> Result<IngestedApplications, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();
    ensure_required_columns_exist(&headers)?;

    let mut out = IngestedApplications::default();

    for (idx, result) in reader.deserialize::<ApplicationRecord>().enumerate() {
        // +2: records start on the line after the header, and lines are 1-based.
        let line = idx + 2;
        out.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                out.rejected.push(RejectedRow {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match record.to_applicant() {
            Ok(applicant) => out.rows.push(IngestedRow {
                line,
                id: record.id.clone().unwrap_or_else(|| format!("row-{line}")),
                applicant,
            }),
            Err(e) => out.rejected.push(RejectedRow {
                line,
                id: record.id.clone(),
                message: e.to_string(),
            }),
        }
    }

    Ok(out)
}

fn ensure_required_columns_exist(headers: &csv::StringRecord) -> Result<(), AppError> {
    let present: HashSet<String> = headers.iter().map(str::to_string).collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(*c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            EXIT_INPUT,
            format!("CSV is missing required column(s): {}", missing.join(", ")),
        ))
    }
}
