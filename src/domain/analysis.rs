//! Dashboard signal overlay.
//!
//! Computes the moving average and oscillator for a series and classifies
//! every point with the cross rule. Nothing here mutates the input; each
//! derived series is returned by value.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::error::SigdashError;
use super::indicator::IndicatorSeries;
use super::indicator::rsi::compute_oscillator;
use super::indicator::sma::compute_moving_average;
use super::params::{
    DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_RSI_WINDOW, DEFAULT_SMA_WINDOW, StrategyParams,
};
use super::price::PriceSeries;
use super::signal::{Signal, classify_cross};

const SECTION: &str = "analysis";

#[derive(Debug, Clone, PartialEq)]
pub struct CrossParams {
    pub sma_window: usize,
    pub rsi_window: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for CrossParams {
    fn default() -> Self {
        CrossParams {
            sma_window: DEFAULT_SMA_WINDOW,
            rsi_window: DEFAULT_RSI_WINDOW,
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

impl From<&StrategyParams> for CrossParams {
    fn from(params: &StrategyParams) -> Self {
        CrossParams {
            sma_window: params.sma_window,
            rsi_window: params.rsi_window,
            oversold: params.oversold,
            overbought: params.overbought,
        }
    }
}

impl CrossParams {
    pub fn validate(&self) -> Result<(), SigdashError> {
        if self.sma_window == 0 {
            return Err(SigdashError::invalid(SECTION, "sma_window", "sma_window must be at least 1"));
        }
        if self.rsi_window == 0 {
            return Err(SigdashError::invalid(SECTION, "rsi_window", "rsi_window must be at least 1"));
        }
        if !(self.oversold < self.overbought) {
            return Err(SigdashError::invalid(
                SECTION,
                "oversold",
                "oversold must be below overbought",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub moving_average: IndicatorSeries,
    pub oscillator: IndicatorSeries,
    pub signals: Vec<SignalPoint>,
}

/// Most recent price and indicator readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestReading {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub moving_average: Option<f64>,
    pub oscillator: Option<f64>,
}

pub fn analyze(prices: &PriceSeries, params: &CrossParams) -> Analysis {
    let moving_average = compute_moving_average(prices, params.sma_window);
    let oscillator = compute_oscillator(prices, params.rsi_window);

    if !prices.is_empty() && (moving_average.all_undefined() || oscillator.all_undefined()) {
        warn!(
            symbol = prices.symbol(),
            points = prices.len(),
            sma_window = params.sma_window,
            rsi_window = params.rsi_window,
            "indicators entirely undefined, check data length or window sizes"
        );
    }

    let signals = prices
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| SignalPoint {
            timestamp: p.timestamp,
            price: p.price,
            signal: classify_cross(
                p.price,
                moving_average.value_at(i),
                oscillator.value_at(i),
                params.oversold,
                params.overbought,
            ),
        })
        .collect();

    Analysis {
        moving_average,
        oscillator,
        signals,
    }
}

impl Analysis {
    pub fn latest(&self) -> Option<LatestReading> {
        let last = self.signals.last()?;
        Some(LatestReading {
            timestamp: last.timestamp,
            price: last.price,
            moving_average: self.moving_average.last_value(),
            oscillator: self.oscillator.last_value(),
        })
    }

    pub fn points_with(&self, signal: Signal) -> impl Iterator<Item = &SignalPoint> {
        self.signals.iter().filter(move |p| p.signal == signal)
    }
}

pub fn format_date_for_display(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}
