//! sigdash: trading signal dashboard core.
//!
//! Hexagonal architecture: indicators, signal rules and the portfolio
//! simulator in [`domain`], port traits in [`ports`], file and network
//! implementations in [`adapters`], command-line entry points in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
