//! Boundary validation for the eleven loosely-typed form scalars.
//!
//! The scoring engine assumes numeric inputs are already within their business
//! ranges; this is where those ranges are enforced. Out-of-training-range but
//! legal values (a very high income, say) pass through untouched.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Applicant, BorrowerProfile, CreditBehavior, LoanApplication, LoanPurpose, LoanType, ResidenceType,
};
use crate::error::ValidationError;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 100;
pub const MIN_OPEN_ACCOUNTS: i64 = 1;
pub const MAX_OPEN_ACCOUNTS: i64 = 10;

/// Raw application as collected from a form or CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInput {
    pub age: i64,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: i64,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub number_of_open_accounts: i64,
    pub residence_type: ResidenceType,
    pub loan_purpose: LoanPurpose,
    pub loan_type: LoanType,
}

impl ApplicationInput {
    /// Check every numeric range and build the typed input records.
    pub fn validate(&self) -> Result<Applicant, ValidationError> {
        let age = integer_in("age", self.age, MIN_AGE, MAX_AGE)?;
        let income = non_negative("income", self.income)?;
        let loan_amount = non_negative("loan_amount", self.loan_amount)?;
        let tenure = integer_in("loan_tenure_months", self.loan_tenure_months, 0, i64::from(u32::MAX))?;
        let dpd = non_negative("avg_dpd_per_delinquency", self.avg_dpd_per_delinquency)?;
        let delinquency = percentage("delinquency_ratio", self.delinquency_ratio)?;
        let utilization = percentage("credit_utilization_ratio", self.credit_utilization_ratio)?;
        let open_accounts = integer_in(
            "number_of_open_accounts",
            self.number_of_open_accounts,
            MIN_OPEN_ACCOUNTS,
            MAX_OPEN_ACCOUNTS,
        )?;

        Ok(Applicant {
            profile: BorrowerProfile {
                age,
                annual_income: income,
                residence_type: self.residence_type,
            },
            loan: LoanApplication {
                loan_amount,
                tenure_months: tenure,
                purpose: self.loan_purpose,
                loan_type: self.loan_type,
            },
            behavior: CreditBehavior {
                avg_dpd_per_delinquency: dpd,
                delinquency_ratio_pct: delinquency,
                credit_utilization_pct: utilization,
                open_accounts,
            },
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            expected: "a finite number >= 0".to_string(),
            value: value.to_string(),
        })
    }
}

fn percentage(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            expected: "a percentage in 0..=100".to_string(),
            value: value.to_string(),
        })
    }
}

fn integer_in(field: &'static str, value: i64, min: i64, max: i64) -> Result<u32, ValidationError> {
    if (min..=max).contains(&value) {
        if let Ok(v) = u32::try_from(value) {
            return Ok(v);
        }
    }
    Err(ValidationError::OutOfRange {
        field,
        expected: format!("an integer in {min}..={max}"),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_defaults() -> ApplicationInput {
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
    fn accepts_form_defaults() {
        let applicant = form_defaults().validate().unwrap();
        assert_eq!(applicant.profile.age, 28);
        assert_eq!(applicant.loan.tenure_months, 36);
        assert_eq!(applicant.behavior.open_accounts, 2);
        assert_eq!(applicant.loan.loan_type, LoanType::Unsecured);
    }

    #[test]
    fn zero_income_and_zero_tenure_are_legal() {
        let mut input = form_defaults();
        input.income = 0.0;
        input.loan_tenure_months = 0;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn rejects_underage_borrower() {
        let mut input = form_defaults();
        input.age = 17;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn rejects_percentages_outside_0_100() {
        let mut input = form_defaults();
        input.credit_utilization_ratio = 100.5;
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::OutOfRange { field: "credit_utilization_ratio", .. }
        ));

        let mut input = form_defaults();
        input.delinquency_ratio = -1.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_negative_or_non_finite_money() {
        let mut input = form_defaults();
        input.income = -5.0;
        assert!(input.validate().is_err());

        let mut input = form_defaults();
        input.loan_amount = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn open_accounts_must_be_between_1_and_10() {
        for bad in [0, 11] {
            let mut input = form_defaults();
            input.number_of_open_accounts = bad;
            assert!(input.validate().is_err(), "{bad} accounts should be rejected");
        }
        let mut input = form_defaults();
        input.number_of_open_accounts = 10;
        assert!(input.validate().is_ok());
    }
}
