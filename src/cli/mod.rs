//! Command-line parsing for the credit scoring engine.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! scoring code. Defaults for `score` mirror the intake form.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ApplicationInput, LoanPurpose, LoanType, ResidenceType};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "credit",
    version,
    about = "Credit risk scoring: default probability, credit score and risk rating"
)]
pub struct Cli {
    /// Model artifact (JSON). Overrides CREDIT_MODEL_PATH.
    #[arg(long, global = true, value_name = "JSON")]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a single applicant.
    Score(ScoreArgs),
    /// Score every application in a CSV file.
    Batch(BatchArgs),
    /// Write a synthetic application CSV.
    Sample(SampleArgs),
    /// Summarize the loaded model artifact.
    Inspect,
}

/// The eleven applicant inputs.
#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    /// Borrower age in years (18-100).
    #[arg(long, default_value_t = 28)]
    pub age: i64,

    /// Annual income.
    #[arg(long, default_value_t = 1_200_000.0)]
    pub income: f64,

    /// Requested loan amount.
    #[arg(long, default_value_t = 2_560_000.0)]
    pub loan_amount: f64,

    /// Loan tenure in months.
    #[arg(long, default_value_t = 36)]
    pub loan_tenure_months: i64,

    /// Average days past due per delinquency.
    #[arg(long = "avg-dpd", default_value_t = 20.0)]
    pub avg_dpd_per_delinquency: f64,

    /// Delinquency ratio in percent (0-100).
    #[arg(long, default_value_t = 30.0)]
    pub delinquency_ratio: f64,

    /// Credit utilization ratio in percent (0-100).
    #[arg(long, default_value_t = 30.0)]
    pub credit_utilization_ratio: f64,

    /// Number of open loan accounts (1-10).
    #[arg(long = "open-accounts", default_value_t = 2)]
    pub number_of_open_accounts: i64,

    #[arg(long, value_enum, default_value_t = ResidenceType::Owned)]
    pub residence_type: ResidenceType,

    #[arg(long, value_enum, default_value_t = LoanPurpose::Education)]
    pub loan_purpose: LoanPurpose,

    #[arg(long, value_enum, default_value_t = LoanType::Unsecured)]
    pub loan_type: LoanType,

    /// Print the assessment as JSON.
    #[arg(long)]
    pub json: bool,

    /// Include a per-feature breakdown of the log-odds.
    #[arg(long)]
    pub explain: bool,
}

impl ScoreArgs {
    pub fn to_input(&self) -> ApplicationInput {
        ApplicationInput {
            age: self.age,
            income: self.income,
            loan_amount: self.loan_amount,
            loan_tenure_months: self.loan_tenure_months,
            avg_dpd_per_delinquency: self.avg_dpd_per_delinquency,
            delinquency_ratio: self.delinquency_ratio,
            credit_utilization_ratio: self.credit_utilization_ratio,
            number_of_open_accounts: self.number_of_open_accounts,
            residence_type: self.residence_type,
            loan_purpose: self.loan_purpose,
            loan_type: self.loan_type,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Application CSV to score.
    #[arg(long, short = 'i', value_name = "CSV")]
    pub input: PathBuf,

    /// Write scored rows to this CSV.
    #[arg(long, short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// List every rejected row (default: first 10).
    #[arg(long)]
    pub all_rejects: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of applications to generate.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (stdout when omitted).
    #[arg(long, short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_defaults_match_intake_form() {
        let cli = Cli::parse_from(["credit", "score"]);
        let Command::Score(args) = cli.command else {
            panic!("expected score");
        };
        let input = args.to_input();
        assert_eq!(input.age, 28);
        assert_eq!(input.income, 1_200_000.0);
        assert_eq!(input.loan_amount, 2_560_000.0);
        assert_eq!(input.loan_tenure_months, 36);
        assert_eq!(input.number_of_open_accounts, 2);
        assert_eq!(input.residence_type, ResidenceType::Owned);
        assert_eq!(input.loan_purpose, LoanPurpose::Education);
        assert_eq!(input.loan_type, LoanType::Unsecured);
    }

    #[test]
    fn parses_categorical_flags() {
        let cli = Cli::parse_from([
            "credit",
            "score",
            "--residence-type",
            "mortgage",
            "--loan-purpose",
            "auto",
            "--loan-type",
            "secured",
            "--model",
            "m.json",
        ]);
        assert_eq!(cli.model, Some(PathBuf::from("m.json")));
        let Command::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(args.residence_type, ResidenceType::Mortgage);
        assert_eq!(args.loan_purpose, LoanPurpose::Auto);
        assert_eq!(args.loan_type, LoanType::Secured);
    }

    #[test]
    fn rejects_unknown_category_flag() {
        assert!(Cli::try_parse_from(["credit", "score", "--residence-type", "castle"]).is_err());
    }
}
