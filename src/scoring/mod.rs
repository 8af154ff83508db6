//! Probability → score → rating, and the pipeline that ties the engine together.

pub mod pipeline;
pub mod rating;
pub mod score;

pub use pipeline::*;
pub use rating::*;
pub use score::*;
