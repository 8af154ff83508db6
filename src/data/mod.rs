//! Synthetic application data.

pub mod sample;

pub use sample::*;
