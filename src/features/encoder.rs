//! Feature encoding.
//!
//! The encoder walks the artifact's feature list in order and produces one value
//! per column:
//!
//! - continuous columns take the raw input (percentages divided by 100, the
//!   loan-to-income ratio derived), then min-max scaling if the column has
//!   training-time bounds
//! - indicator columns are `1.0` when the input's category matches, else `0.0`;
//!   the baseline category therefore contributes nothing
//!
//! Before any column is produced, every categorical input is checked against the
//! trained vocabulary. That check is the encoder's only failure mode.

use nalgebra::DVector;

use crate::domain::{BorrowerProfile, Categorical, CreditBehavior, LoanApplication};
use crate::error::EncodingError;
use crate::features::key::{CategoryValue, FeatureKey, NumericFeature};
use crate::math::{min_max_scale, ratio_or_zero};
use crate::models::params::{ModelParameters, Vocabulary};

/// Ordered feature values, aligned with `ModelParameters::features`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(DVector<f64>);

impl FeatureVector {
    #[cfg(test)]
    pub(crate) fn from_values(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }

    pub fn values(&self) -> &DVector<f64> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

/// `loan_amount / income`, defined as `0.0` when income is not positive.
pub fn loan_to_income_ratio(loan_amount: f64, income: f64) -> f64 {
    ratio_or_zero(loan_amount, income)
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    params: &'a ModelParameters,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(params: &'a ModelParameters) -> Self {
        Self { params }
    }

    pub fn encode(
        &self,
        profile: &BorrowerProfile,
        loan: &LoanApplication,
        behavior: &CreditBehavior,
    ) -> Result<FeatureVector, EncodingError> {
        let vocabularies = self.params.vocabularies();
        check_vocabulary(&vocabularies.residence_type, profile.residence_type)?;
        check_vocabulary(&vocabularies.loan_purpose, loan.purpose)?;
        check_vocabulary(&vocabularies.loan_type, loan.loan_type)?;

        let active = [
            CategoryValue::from(profile.residence_type),
            CategoryValue::from(loan.purpose),
            CategoryValue::from(loan.loan_type),
        ];

        let values = self
            .params
            .features()
            .iter()
            .map(|spec| match spec.key {
                FeatureKey::Numeric(feature) => {
                    let raw = numeric_value(feature, profile, loan, behavior);
                    match spec.scaling {
                        Some(bounds) => min_max_scale(raw, bounds.min, bounds.max),
                        None => raw,
                    }
                }
                FeatureKey::Indicator(value) => {
                    if active.contains(&value) {
                        1.0
                    } else {
                        0.0
                    }
                }
            });

        Ok(FeatureVector(DVector::from_iterator(self.params.features().len(), values)))
    }
}

fn check_vocabulary<C>(vocabulary: &Vocabulary<C>, category: C) -> Result<(), EncodingError>
where
    C: Categorical + Into<CategoryValue>,
{
    if vocabulary.contains(category) {
        Ok(())
    } else {
        Err(EncodingError::OutsideVocabulary {
            attribute: C::ATTRIBUTE,
            category: category.label().to_string(),
        })
    }
}

fn numeric_value(
    feature: NumericFeature,
    profile: &BorrowerProfile,
    loan: &LoanApplication,
    behavior: &CreditBehavior,
) -> f64 {
    match feature {
        NumericFeature::Age => f64::from(profile.age),
        NumericFeature::AnnualIncome => profile.annual_income,
        NumericFeature::LoanAmount => loan.loan_amount,
        NumericFeature::LoanTenureMonths => f64::from(loan.tenure_months),
        NumericFeature::AvgDpdPerDelinquency => behavior.avg_dpd_per_delinquency,
        NumericFeature::DelinquencyRatio => behavior.delinquency_ratio_pct / 100.0,
        NumericFeature::CreditUtilizationRatio => behavior.credit_utilization_pct / 100.0,
        NumericFeature::NumberOfOpenAccounts => f64::from(behavior.open_accounts),
        NumericFeature::LoanToIncomeRatio => loan_to_income_ratio(loan.loan_amount, profile.annual_income),
    }
}
