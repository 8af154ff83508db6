//! Synthetic loan-application generation.
//!
//! Produces plausible, always-valid applications for demos and smoke runs of
//! the batch scorer. Generation is fully determined by the seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{
    ApplicationInput, Categorical, LoanPurpose, LoanType, MAX_AGE, MAX_OPEN_ACCOUNTS, MIN_AGE, ResidenceType,
};
use crate::error::{AppError, EXIT_INPUT};
use crate::io::ingest::ApplicationRecord;

/// Median annual income of the synthetic population.
const MEDIAN_INCOME: f64 = 900_000.0;

/// Median loan-to-income multiple.
const MEDIAN_LTI: f64 = 1.5;

/// Share of applicants with no recorded income.
const ZERO_INCOME_SHARE: f64 = 0.02;

/// Share of applicants with at least one delinquency.
const DELINQUENT_SHARE: f64 = 0.4;

const TENURES: [i64; 9] = [6, 12, 24, 36, 48, 60, 84, 120, 240];

#[derive(Debug, Clone, Copy)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
}

pub fn generate_applications(config: &SampleConfig) -> Result<Vec<ApplicationRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(EXIT_INPUT, "Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let income_dist = LogNormal::new(MEDIAN_INCOME.ln(), 0.6)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Income distribution error: {e}")))?;
    let lti_dist = LogNormal::new(MEDIAN_LTI.ln(), 0.5)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Loan distribution error: {e}")))?;
    let dpd_dist = Normal::new(20.0, 12.0)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("DPD distribution error: {e}")))?;

    let width = config.count.to_string().len().max(4);
    let mut out = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let income = if rng.gen_bool(ZERO_INCOME_SHARE) {
            0.0
        } else {
            round_to(income_dist.sample(&mut rng), 1_000.0)
        };
        let loan_basis = if income > 0.0 { income } else { MEDIAN_INCOME };
        let loan_amount = round_to(loan_basis * lti_dist.sample(&mut rng), 1_000.0);

        let delinquent = rng.gen_bool(DELINQUENT_SHARE);
        let (avg_dpd, delinquency_ratio) = if delinquent {
            let dpd: f64 = dpd_dist.sample(&mut rng);
            (dpd.abs().round().max(1.0), f64::from(rng.gen_range(5u8..=60)))
        } else {
            (0.0, 0.0)
        };

        let input = ApplicationInput {
            age: rng.gen_range(MIN_AGE + 3..=MAX_AGE - 35),
            income,
            loan_amount,
            loan_tenure_months: pick(&mut rng, &TENURES),
            avg_dpd_per_delinquency: avg_dpd,
            delinquency_ratio,
            credit_utilization_ratio: f64::from(rng.gen_range(0u8..=100)),
            number_of_open_accounts: rng.gen_range(1..=MAX_OPEN_ACCOUNTS),
            residence_type: pick(&mut rng, ResidenceType::ALL),
            loan_purpose: pick(&mut rng, LoanPurpose::ALL),
            loan_type: pick(&mut rng, LoanType::ALL),
        };

        out.push(ApplicationRecord::from_input(format!("S{:0width$}", i + 1), &input));
    }

    Ok(out)
}

fn round_to(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

fn pick<T: Copy>(rng: &mut StdRng, options: &[T]) -> T {
    options[rng.gen_range(0..options.len())]
}
