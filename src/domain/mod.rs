//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod signal;
pub mod analysis;
pub mod params;
pub mod portfolio;
pub mod execution;
pub mod simulator;
pub mod summary;
pub mod error;
