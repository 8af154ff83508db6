//! Batch scoring shared by the `batch` command and its tests.
//!
//! ingest CSV -> score rows in parallel -> summary -> optional export
//!
//! Rows are scored independently against one borrowed `ModelParameters`, so the
//! work fans out with rayon without any locking.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::{ApplicationInput, Rating};
use crate::io::ingest::{IngestedApplications, RejectedRow};
use crate::scoring::{Assessment, ScoringPipeline};

/// A successfully scored application.
#[derive(Debug, Clone)]
pub struct ScoredApplication {
    pub id: String,
    pub input: ApplicationInput,
    pub assessment: Assessment,
}

/// Aggregate view of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub rows_read: usize,
    pub scored: usize,
    pub rejected: usize,
    pub mean_probability: Option<f64>,
    pub mean_score: Option<f64>,
    pub by_rating: BTreeMap<Rating, usize>,
}

#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub scored: Vec<ScoredApplication>,
    pub rejected: Vec<RejectedRow>,
    pub summary: BatchSummary,
}

/// Score every ingested row; rows the model cannot encode join the rejects.
pub fn score_batch(pipeline: &ScoringPipeline<'_>, ingested: IngestedApplications) -> BatchOutput {
    let results: Vec<_> = ingested
        .rows
        .par_iter()
        .map(|row| {
            pipeline
                .assess(&row.applicant)
                .map(|assessment| ScoredApplication {
                    id: row.id.clone(),
                    input: input_of(row),
                    assessment,
                })
                .map_err(|e| RejectedRow {
                    line: row.line,
                    id: Some(row.id.clone()),
                    message: e.to_string(),
                })
        })
        .collect();

    let mut scored = Vec::with_capacity(results.len());
    let mut rejected = ingested.rejected;
    for result in results {
        match result {
            Ok(s) => scored.push(s),
            Err(r) => rejected.push(r),
        }
    }
    rejected.sort_by_key(|r| r.line);

    for r in &rejected {
        warn!(line = r.line, id = r.id.as_deref().unwrap_or(""), reason = %r.message, "skipped application");
    }

    let summary = summarize(ingested.rows_read, &scored, rejected.len());
    info!(
        rows_read = summary.rows_read,
        scored = summary.scored,
        rejected = summary.rejected,
        "batch scored"
    );

    BatchOutput {
        scored,
        rejected,
        summary,
    }
}

fn input_of(row: &crate::io::ingest::IngestedRow) -> ApplicationInput {
    let a = &row.applicant;
    ApplicationInput {
        age: i64::from(a.profile.age),
        income: a.profile.annual_income,
        loan_amount: a.loan.loan_amount,
        loan_tenure_months: i64::from(a.loan.tenure_months),
        avg_dpd_per_delinquency: a.behavior.avg_dpd_per_delinquency,
        delinquency_ratio: a.behavior.delinquency_ratio_pct,
        credit_utilization_ratio: a.behavior.credit_utilization_pct,
        number_of_open_accounts: i64::from(a.behavior.open_accounts),
        residence_type: a.profile.residence_type,
        loan_purpose: a.loan.purpose,
        loan_type: a.loan.loan_type,
    }
}

fn summarize(rows_read: usize, scored: &[ScoredApplication], rejected: usize) -> BatchSummary {
    let mut by_rating = BTreeMap::new();
    for s in scored {
        *by_rating.entry(s.assessment.rating).or_insert(0) += 1;
    }

    let n = scored.len();
    let (mean_probability, mean_score) = if n == 0 {
        (None, None)
    } else {
        let p: f64 = scored.iter().map(|s| s.assessment.probability).sum();
        let score: f64 = scored
            .iter()
            .map(|s| f64::from(s.assessment.credit_score.value()))
            .sum();
        (Some(p / n as f64), Some(score / n as f64))
    };

    BatchSummary {
        rows_read,
        scored: n,
        rejected,
        mean_probability,
        mean_score,
        by_rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResidenceType;
    use crate::io::ingest::read_applications;
    use crate::models::ModelParameters;
    use crate::models::params::fixtures::{illustrative, illustrative_artifact};

    const CSV: &str = "id,age,income,loan_amount,loan_tenure_months,avg_dpd_per_delinquency,delinquency_ratio,credit_utilization_ratio,number_of_open_accounts,residence_type,loan_purpose,loan_type
A1,28,1200000,2560000,36,20,30,30,2,Owned,Education,Unsecured
A2,45,900000,100000,12,0,0,5,1,Mortgage,Home,Secured
A3,33,0,50000,6,0,0,0,1,Rented,Auto,Secured
A4,33,500000,50000,6,0,0,0,1,Castle,Auto,Secured
";

    #[test]
    fn scores_valid_rows_and_reports_rejects() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let ingested = read_applications(CSV.as_bytes()).unwrap();
        let out = score_batch(&pipeline, ingested);

        assert_eq!(out.summary.rows_read, 4);
        assert_eq!(out.summary.scored, 3);
        assert_eq!(out.summary.rejected, 1);
        assert_eq!(out.rejected[0].line, 5);

        let a1 = out.scored.iter().find(|s| s.id == "A1").unwrap();
        assert_eq!(a1.assessment.credit_score.value(), 415);
        assert_eq!(a1.assessment.rating, Rating::Poor);

        let a3 = out.scored.iter().find(|s| s.id == "A3").unwrap();
        assert_eq!(a3.assessment.loan_to_income_ratio, 0.0);

        let total: usize = out.summary.by_rating.values().sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn parallel_scoring_matches_sequential() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let ingested = read_applications(CSV.as_bytes()).unwrap();
        let sequential: Vec<_> = ingested
            .rows
            .iter()
            .map(|r| pipeline.assess(&r.applicant).unwrap())
            .collect();

        let out = score_batch(&pipeline, ingested);
        let parallel: Vec<_> = out.scored.iter().map(|s| s.assessment).collect();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn vocabulary_misses_become_rejects() {
        let mut artifact = illustrative_artifact();
        artifact.vocabularies.residence_type.categories = vec![ResidenceType::Owned, ResidenceType::Rented];
        artifact.features.retain(|f| f.key.to_string() != "residence_type=mortgage");
        let params = ModelParameters::try_from(artifact).unwrap();
        let pipeline = ScoringPipeline::new(&params);

        let out = score_batch(&pipeline, read_applications(CSV.as_bytes()).unwrap());
        assert_eq!(out.summary.scored, 2);
        assert_eq!(out.rejected.len(), 2);
        assert_eq!(out.rejected[0].id.as_deref(), Some("A2"));
        assert!(out.rejected[0].message.contains("outside the model's trained vocabulary"));
    }

    #[test]
    fn empty_batch_has_no_means() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let out = score_batch(&pipeline, IngestedApplications::default());
        assert_eq!(out.summary.mean_probability, None);
        assert_eq!(out.summary.scored, 0);
    }
}
