//! Terminal reports for assessments, batches and model artifacts.

pub mod format;

pub use format::*;
