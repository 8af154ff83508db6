//! Feature names as they appear in the trained artifact.
//!
//! A feature is either a continuous input (`loan_to_income_ratio`) or an
//! indicator for one non-baseline category (`loan_type=unsecured`). Keys are
//! parsed into a closed set, so an artifact naming a feature the encoder cannot
//! produce is rejected at load time instead of silently contributing zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Attribute, Categorical, LoanPurpose, LoanType, ResidenceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFeature {
    Age,
    AnnualIncome,
    LoanAmount,
    LoanTenureMonths,
    AvgDpdPerDelinquency,
    /// Delinquency percentage divided by 100.
    DelinquencyRatio,
    /// Utilization percentage divided by 100.
    CreditUtilizationRatio,
    NumberOfOpenAccounts,
    LoanToIncomeRatio,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 9] = [
        NumericFeature::Age,
        NumericFeature::AnnualIncome,
        NumericFeature::LoanAmount,
        NumericFeature::LoanTenureMonths,
        NumericFeature::AvgDpdPerDelinquency,
        NumericFeature::DelinquencyRatio,
        NumericFeature::CreditUtilizationRatio,
        NumericFeature::NumberOfOpenAccounts,
        NumericFeature::LoanToIncomeRatio,
    ];

    pub fn key(self) -> &'static str {
        match self {
            NumericFeature::Age => "age",
            NumericFeature::AnnualIncome => "annual_income",
            NumericFeature::LoanAmount => "loan_amount",
            NumericFeature::LoanTenureMonths => "loan_tenure_months",
            NumericFeature::AvgDpdPerDelinquency => "avg_dpd_per_delinquency",
            NumericFeature::DelinquencyRatio => "delinquency_ratio",
            NumericFeature::CreditUtilizationRatio => "credit_utilization_ratio",
            NumericFeature::NumberOfOpenAccounts => "number_of_open_accounts",
            NumericFeature::LoanToIncomeRatio => "loan_to_income_ratio",
        }
    }
}

/// One category of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryValue {
    Residence(ResidenceType),
    Purpose(LoanPurpose),
    LoanType(LoanType),
}

impl CategoryValue {
    pub fn attribute(self) -> Attribute {
        match self {
            CategoryValue::Residence(_) => Attribute::ResidenceType,
            CategoryValue::Purpose(_) => Attribute::LoanPurpose,
            CategoryValue::LoanType(_) => Attribute::LoanType,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            CategoryValue::Residence(c) => c.key(),
            CategoryValue::Purpose(c) => c.key(),
            CategoryValue::LoanType(c) => c.key(),
        }
    }
}

impl From<ResidenceType> for CategoryValue {
    fn from(value: ResidenceType) -> Self {
        CategoryValue::Residence(value)
    }
}

impl From<LoanPurpose> for CategoryValue {
    fn from(value: LoanPurpose) -> Self {
        CategoryValue::Purpose(value)
    }
}

impl From<LoanType> for CategoryValue {
    fn from(value: LoanType) -> Self {
        CategoryValue::LoanType(value)
    }
}

/// A column of the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeatureKey {
    Numeric(NumericFeature),
    Indicator(CategoryValue),
}

impl FeatureKey {
    pub fn is_indicator(self) -> bool {
        matches!(self, FeatureKey::Indicator(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature '{0}'")]
pub struct UnknownFeature(pub String);

impl FromStr for FeatureKey {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownFeature(s.to_string());

        let Some((attribute, category)) = s.split_once('=') else {
            return NumericFeature::ALL
                .into_iter()
                .find(|f| f.key() == s)
                .map(FeatureKey::Numeric)
                .ok_or_else(unknown);
        };

        let value = match Attribute::from_key(attribute).ok_or_else(unknown)? {
            Attribute::ResidenceType => ResidenceType::parse_category(category).map(CategoryValue::from),
            Attribute::LoanPurpose => LoanPurpose::parse_category(category).map(CategoryValue::from),
            Attribute::LoanType => LoanType::parse_category(category).map(CategoryValue::from),
        };
        value.map(FeatureKey::Indicator).map_err(|_| unknown())
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = UnknownFeature;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeatureKey> for String {
    fn from(value: FeatureKey) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Numeric(n) => f.write_str(n.key()),
            FeatureKey::Indicator(c) => write!(f, "{}={}", c.attribute(), c.key()),
        }
    }
}
