//! `credit-scoring` library crate.
//!
//! The binary (`credit`) is a thin wrapper around this library so that:
//!
//! - the scoring engine is testable without spawning processes
//! - the pipeline can be embedded in other services
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod scoring;
pub mod telemetry;
