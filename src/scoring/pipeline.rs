//! The scoring pipeline.
//!
//! `FeatureEncoder -> ProbabilityModel -> ScoreMapper -> RatingClassifier`
//!
//! The pipeline only borrows `ModelParameters`; every intermediate value is local
//! to a call, so a single `&ScoringPipeline` can serve any number of threads.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Applicant, BorrowerProfile, CreditBehavior, LoanApplication, Rating};
use crate::error::EncodingError;
use crate::features::{FeatureEncoder, FeatureKey, loan_to_income_ratio};
use crate::models::{ModelParameters, ProbabilityModel};
use crate::scoring::rating::RatingClassifier;
use crate::scoring::score::{CreditScore, ScoreMapper};

/// Output of a single scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub probability: f64,
    pub credit_score: CreditScore,
    pub rating: Rating,
    pub loan_to_income_ratio: f64,
}

/// One feature's share of the log-odds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub feature: FeatureKey,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Log-odds broken down by feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub intercept: f64,
    pub logodds: f64,
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringPipeline<'a> {
    params: &'a ModelParameters,
    encoder: FeatureEncoder<'a>,
    model: ProbabilityModel<'a>,
    mapper: ScoreMapper,
    classifier: RatingClassifier<'a>,
}

impl<'a> ScoringPipeline<'a> {
    pub fn new(params: &'a ModelParameters) -> Self {
        Self {
            params,
            encoder: FeatureEncoder::new(params),
            model: ProbabilityModel::new(params),
            mapper: ScoreMapper::new(),
            classifier: RatingClassifier::new(params.bands()),
        }
    }

    pub fn compute(
        &self,
        profile: &BorrowerProfile,
        loan: &LoanApplication,
        behavior: &CreditBehavior,
    ) -> Result<Assessment, EncodingError> {
        let vector = self.encoder.encode(profile, loan, behavior)?;
        let probability = self.model.predict_probability(&vector);
        let credit_score = self.mapper.map_to_score(probability);
        let rating = self.classifier.classify(credit_score);

        debug!(probability, score = credit_score.value(), %rating, "scored application");

        Ok(Assessment {
            probability,
            credit_score,
            rating,
            loan_to_income_ratio: loan_to_income_ratio(loan.loan_amount, profile.annual_income),
        })
    }

    pub fn assess(&self, applicant: &Applicant) -> Result<Assessment, EncodingError> {
        self.compute(&applicant.profile, &applicant.loan, &applicant.behavior)
    }

    /// Per-feature breakdown of the log-odds for one applicant.
    pub fn explain(&self, applicant: &Applicant) -> Result<Explanation, EncodingError> {
        let vector = self
            .encoder
            .encode(&applicant.profile, &applicant.loan, &applicant.behavior)?;
        let contributions = self
            .params
            .features()
            .iter()
            .zip(vector.as_slice())
            .zip(self.model.contributions(&vector))
            .map(|((spec, &value), contribution)| Contribution {
                feature: spec.key,
                value,
                weight: spec.weight,
                contribution,
            })
            .collect();

        Ok(Explanation {
            intercept: self.params.intercept(),
            logodds: self.model.score_logodds(&vector),
            contributions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoanPurpose, LoanType, ResidenceType};
    use crate::models::params::fixtures::{illustrative, illustrative_artifact};
    use proptest::prelude::*;

    fn worked_example() -> Applicant {
        Applicant {
            profile: BorrowerProfile {
                age: 28,
                annual_income: 1_200_000.0,
                residence_type: ResidenceType::Owned,
            },
            loan: LoanApplication {
                loan_amount: 2_560_000.0,
                tenure_months: 36,
                purpose: LoanPurpose::Education,
                loan_type: LoanType::Unsecured,
            },
            behavior: CreditBehavior {
                avg_dpd_per_delinquency: 20.0,
                delinquency_ratio_pct: 30.0,
                credit_utilization_pct: 30.0,
                open_accounts: 2,
            },
        }
    }

    #[test]
    fn worked_example_scores_poor() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let assessment = pipeline.assess(&worked_example()).unwrap();

        assert!((assessment.probability - 0.808).abs() < 1e-3, "p = {}", assessment.probability);
        assert_eq!(assessment.credit_score.value(), 415);
        assert_eq!(assessment.rating, Rating::Poor);
        assert!((assessment.loan_to_income_ratio - 2.1333).abs() < 1e-4);
    }

    #[test]
    fn worked_example_logodds() {
        let params = illustrative();
        let explanation = ScoringPipeline::new(&params).explain(&worked_example()).unwrap();
        assert!((explanation.logodds - 1.436_666_7).abs() < 1e-6);
        let unsecured = explanation
            .contributions
            .iter()
            .find(|c| c.feature.to_string() == "loan_type=unsecured")
            .unwrap();
        assert_eq!(unsecured.contribution, 0.3);
    }

    #[test]
    fn clean_borrower_rates_higher_than_worked_example() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let mut applicant = worked_example();
        applicant.loan.loan_amount = 100_000.0;
        applicant.loan.loan_type = LoanType::Secured;
        applicant.behavior.avg_dpd_per_delinquency = 0.0;
        applicant.behavior.delinquency_ratio_pct = 0.0;
        applicant.behavior.credit_utilization_pct = 5.0;
        applicant.behavior.open_accounts = 1;

        let assessment = pipeline.assess(&applicant).unwrap();
        assert!(assessment.credit_score.value() > 415);
        assert!(assessment.rating > Rating::Poor);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let params = illustrative();
        let pipeline = ScoringPipeline::new(&params);
        let first = pipeline.assess(&worked_example()).unwrap();
        let second = pipeline.assess(&worked_example()).unwrap();
        assert_eq!(first.probability.to_bits(), second.probability.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn encoding_error_propagates_unchanged() {
        let mut artifact = illustrative_artifact();
        artifact.vocabularies.residence_type.categories = vec![ResidenceType::Owned, ResidenceType::Rented];
        artifact.features.retain(|f| f.key.to_string() != "residence_type=mortgage");
        let params = ModelParameters::try_from(artifact).unwrap();

        let mut applicant = worked_example();
        applicant.profile.residence_type = ResidenceType::Mortgage;
        let err = ScoringPipeline::new(&params).assess(&applicant).unwrap_err();
        assert!(matches!(err, EncodingError::OutsideVocabulary { .. }));
    }

    #[test]
    fn subnormal_income_with_zero_weight_ratio_keeps_probability_defined() {
        let mut artifact = illustrative_artifact();
        // Column 0 is loan_to_income_ratio.
        artifact.features[0].weight = 0.0;
        let params = ModelParameters::try_from(artifact).unwrap();

        let mut applicant = worked_example();
        applicant.profile.annual_income = 1e-310;
        applicant.loan.loan_amount = 1.0;

        let assessment = ScoringPipeline::new(&params).assess(&applicant).unwrap();
        assert!(assessment.loan_to_income_ratio.is_finite());
        assert!((0.0..=1.0).contains(&assessment.probability), "p = {}", assessment.probability);

        let reference = ScoringPipeline::new(&params)
            .assess(&Applicant {
                loan: LoanApplication {
                    loan_amount: 0.0,
                    ..applicant.loan
                },
                ..applicant
            })
            .unwrap();
        assert_eq!(assessment.probability, reference.probability);
        assert_eq!(assessment.credit_score, reference.credit_score);
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<ScoringPipeline<'static>>();
        assert_sync::<ModelParameters>();
    }

    fn residence() -> impl Strategy<Value = ResidenceType> {
        prop_oneof![
            Just(ResidenceType::Owned),
            Just(ResidenceType::Rented),
            Just(ResidenceType::Mortgage)
        ]
    }

    fn purpose() -> impl Strategy<Value = LoanPurpose> {
        prop_oneof![
            Just(LoanPurpose::Education),
            Just(LoanPurpose::Home),
            Just(LoanPurpose::Auto),
            Just(LoanPurpose::Personal)
        ]
    }

    proptest! {
        #[test]
        fn every_valid_application_gets_a_consistent_assessment(
            age in 18u32..=100,
            income in 0.0f64..10_000_000.0,
            loan_amount in 0.0f64..50_000_000.0,
            tenure in 0u32..=360,
            dpd in 0.0f64..120.0,
            delinquency in 0.0f64..=100.0,
            utilization in 0.0f64..=100.0,
            open_accounts in 1u32..=10,
            residence_type in residence(),
            purpose in purpose(),
            unsecured in any::<bool>(),
        ) {
            let params = illustrative();
            let pipeline = ScoringPipeline::new(&params);
            let applicant = Applicant {
                profile: BorrowerProfile { age, annual_income: income, residence_type },
                loan: LoanApplication {
                    loan_amount,
                    tenure_months: tenure,
                    purpose,
                    loan_type: if unsecured { LoanType::Unsecured } else { LoanType::Secured },
                },
                behavior: CreditBehavior {
                    avg_dpd_per_delinquency: dpd,
                    delinquency_ratio_pct: delinquency,
                    credit_utilization_pct: utilization,
                    open_accounts,
                },
            };

            let a = pipeline.assess(&applicant).unwrap();
            prop_assert!((0.0..=1.0).contains(&a.probability));
            prop_assert!((300..=900).contains(&a.credit_score.value()));
            prop_assert_eq!(a.rating, RatingClassifier::new(params.bands()).classify(a.credit_score));
        }
    }
}
