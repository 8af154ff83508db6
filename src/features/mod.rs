//! Raw attributes → model-ready feature vector.
//!
//! - feature naming and parsing (`key`)
//! - derived ratios, categorical indicators and min-max scaling (`encoder`)

pub mod encoder;
pub mod key;

pub use encoder::*;
pub use key::*;
