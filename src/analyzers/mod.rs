//! Aggregation of the observation log.
//!
//! This module loads the persisted CSV history, sums delay indices per road
//! and per hour of day, picks the peak hours, and exports the summaries as
//! CSV.

pub mod aggregate;
pub mod analyzer;
pub mod error;
pub mod types;
pub mod utility;
