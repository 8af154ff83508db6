//! Shared domain types.
//!
//! These are the typed records the scoring engine consumes:
//!
//! - categorical attributes as closed enums (`ResidenceType`, `LoanPurpose`, `LoanType`)
//! - the three input groups (`BorrowerProfile`, `LoanApplication`, `CreditBehavior`)
//! - the ordered rating labels (`Rating`)
//!
//! Categorical values serialize as snake_case keys (`"owned"`, `"unsecured"`) and
//! display with the capitalized labels borrowers see (`"Owned"`, `"Unsecured"`).

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// The categorical attributes known to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    ResidenceType,
    LoanPurpose,
    LoanType,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::ResidenceType, Attribute::LoanPurpose, Attribute::LoanType];

    /// Key used in feature names (`residence_type=rented`) and artifact vocabularies.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::ResidenceType => "residence_type",
            Attribute::LoanPurpose => "loan_purpose",
            Attribute::LoanType => "loan_type",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A closed categorical domain.
///
/// Implemented by every categorical input enum so vocabularies, feature keys and
/// string parsing can be written once.
pub trait Categorical: Copy + Eq + fmt::Debug + 'static {
    const ATTRIBUTE: Attribute;
    const ALL: &'static [Self];

    /// Stable snake_case key.
    fn key(self) -> &'static str;

    /// Human-readable label.
    fn label(self) -> &'static str;

    /// Parse a key or label, ignoring ASCII case and surrounding whitespace.
    fn parse_category(value: &str) -> Result<Self, EncodingError> {
        let needle = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| EncodingError::UnknownCategory {
                attribute: Self::ATTRIBUTE,
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResidenceType {
    Owned,
    Rented,
    Mortgage,
}

impl Categorical for ResidenceType {
    const ATTRIBUTE: Attribute = Attribute::ResidenceType;
    const ALL: &'static [Self] = &[ResidenceType::Owned, ResidenceType::Rented, ResidenceType::Mortgage];

    fn key(self) -> &'static str {
        match self {
            ResidenceType::Owned => "owned",
            ResidenceType::Rented => "rented",
            ResidenceType::Mortgage => "mortgage",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ResidenceType::Owned => "Owned",
            ResidenceType::Rented => "Rented",
            ResidenceType::Mortgage => "Mortgage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    Education,
    Home,
    Auto,
    Personal,
}

impl Categorical for LoanPurpose {
    const ATTRIBUTE: Attribute = Attribute::LoanPurpose;
    const ALL: &'static [Self] = &[
        LoanPurpose::Education,
        LoanPurpose::Home,
        LoanPurpose::Auto,
        LoanPurpose::Personal,
    ];

    fn key(self) -> &'static str {
        match self {
            LoanPurpose::Education => "education",
            LoanPurpose::Home => "home",
            LoanPurpose::Auto => "auto",
            LoanPurpose::Personal => "personal",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LoanPurpose::Education => "Education",
            LoanPurpose::Home => "Home",
            LoanPurpose::Auto => "Auto",
            LoanPurpose::Personal => "Personal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Unsecured,
    Secured,
}

impl Categorical for LoanType {
    const ATTRIBUTE: Attribute = Attribute::LoanType;
    const ALL: &'static [Self] = &[LoanType::Unsecured, LoanType::Secured];

    fn key(self) -> &'static str {
        match self {
            LoanType::Unsecured => "unsecured",
            LoanType::Secured => "secured",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LoanType::Unsecured => "Unsecured",
            LoanType::Secured => "Secured",
        }
    }
}

impl FromStr for ResidenceType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_category(s)
    }
}

impl FromStr for LoanPurpose {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_category(s)
    }
}

impl FromStr for LoanType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_category(s)
    }
}

impl fmt::Display for ResidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered risk-rating labels, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Poor, Rating::Average, Rating::Good, Rating::Excellent];

    pub fn label(self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::Average => "Average",
            Rating::Good => "Good",
            Rating::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who is borrowing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub age: u32,
    pub annual_income: f64,
    pub residence_type: ResidenceType,
}

/// What is being borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub loan_amount: f64,
    pub tenure_months: u32,
    pub purpose: LoanPurpose,
    pub loan_type: LoanType,
}

/// Repayment history and current credit usage.
///
/// Ratios are percentages in `0..=100` as entered by the borrower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditBehavior {
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio_pct: f64,
    pub credit_utilization_pct: f64,
    pub open_accounts: u32,
}

/// The three input groups of a single application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub profile: BorrowerProfile,
    pub loan: LoanApplication,
    pub behavior: CreditBehavior,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_category_ignores_case_and_whitespace() {
        assert_eq!(" Owned ".parse::<ResidenceType>().unwrap(), ResidenceType::Owned);
        assert_eq!("MORTGAGE".parse::<ResidenceType>().unwrap(), ResidenceType::Mortgage);
        assert_eq!("auto".parse::<LoanPurpose>().unwrap(), LoanPurpose::Auto);
        assert_eq!("Secured".parse::<LoanType>().unwrap(), LoanType::Secured);
    }

    fn parses_keys_and_labels<C: Categorical>() {
        for &c in C::ALL {
            assert_eq!(C::parse_category(c.key()).unwrap(), c);
            assert_eq!(C::parse_category(c.label()).unwrap(), c);
        }
    }

    #[test]
    fn parse_category_accepts_key_and_label() {
        parses_keys_and_labels::<ResidenceType>();
        parses_keys_and_labels::<LoanPurpose>();
        parses_keys_and_labels::<LoanType>();
    }

    #[test]
    fn parse_category_rejects_unknown_values() {
        let err = "Leased".parse::<ResidenceType>().unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnknownCategory {
                attribute: Attribute::ResidenceType,
                value: "Leased".to_string(),
            }
        );
    }

    #[test]
    fn ratings_are_ordered_worst_first() {
        assert!(Rating::Poor < Rating::Average);
        assert!(Rating::Good < Rating::Excellent);
        assert_eq!(Rating::ALL.iter().max(), Some(&Rating::Excellent));
    }

    #[test]
    fn attribute_keys_round_trip() {
        for attribute in Attribute::ALL {
            assert_eq!(Attribute::from_key(attribute.key()), Some(attribute));
        }
        assert_eq!(Attribute::from_key("residence"), None);
    }
}
