//! Candidate screener library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use processing::criteria::{CriterionId, CriterionSpec};
pub use processing::screener::{Screener, Screening};
