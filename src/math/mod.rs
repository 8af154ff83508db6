//! Numeric primitives: the logistic link and min-max scaling.

pub mod logistic;
pub mod scaling;

pub use logistic::*;
pub use scaling::*;
