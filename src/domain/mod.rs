//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - closed categorical enums (`ResidenceType`, `LoanPurpose`, `LoanType`)
//! - the typed input records (`BorrowerProfile`, `LoanApplication`, `CreditBehavior`)
//! - ordered rating labels (`Rating`)
//! - boundary validation of raw form input (`ApplicationInput`)

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::*;
