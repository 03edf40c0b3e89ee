//! Technical indicator implementations.
//!
//! - `IndicatorPoint`: one timestamped value, `None` while warming up
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: indicator values aligned index-for-index with the
//!   `PriceSeries` they were derived from

pub mod rsi;
pub mod sma;

use chrono::{DateTime, Utc};
use std::fmt;

use super::price::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn empty(indicator_type: IndicatorType) -> Self {
        IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// Pair each price timestamp with a computed value.
    pub(crate) fn from_values(
        indicator_type: IndicatorType,
        prices: &PriceSeries,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let values = prices
            .points()
            .iter()
            .zip(values)
            .map(|(p, value)| IndicatorPoint {
                timestamp: p.timestamp,
                value,
            })
            .collect();
        IndicatorSeries {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at index `i`; `None` when out of range or still warming up.
    pub fn value_at(&self, i: usize) -> Option<f64> {
        self.values.get(i).and_then(|p| p.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }

    pub fn all_undefined(&self) -> bool {
        self.values.iter().all(|p| p.value.is_none())
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
        }
    }
}
