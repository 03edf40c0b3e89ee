//! Configuration access port trait.
//!
//! Lookups distinguish an absent key (`Ok(None)`) from a present but
//! malformed one (`Err`), so callers can layer file values under explicit
//! parameters without silently defaulting bad input.

use crate::domain::error::SigdashError;

pub trait ConfigPort {
    fn has_section(&self, section: &str) -> bool;
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_float(&self, section: &str, key: &str) -> Result<Option<f64>, SigdashError>;
    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, SigdashError>;
}
