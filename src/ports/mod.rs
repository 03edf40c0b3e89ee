//! Port traits: the boundary between the domain and I/O.

pub mod config_port;
pub mod data_port;
pub mod report_port;
