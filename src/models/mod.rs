//! Trained parameters and the linear log-odds probability model.
//!
//! Parameters are loaded once and borrowed immutably; the model itself is a pure
//! function of a feature vector.

pub mod logistic;
pub mod params;

pub use logistic::*;
pub use params::*;
