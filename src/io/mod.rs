//! Input/output helpers.
//!
//! - model artifact loading (`artifact`)
//! - application CSV ingest + validation (`ingest`)
//! - result exports (`export`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::*;
pub use export::*;
pub use ingest::*;
