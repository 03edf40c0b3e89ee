//! Simple moving average.
//!
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n
//! Warmup: first (n-1) points are undefined. Each value is summed from its
//! own window, so no value depends on later prices.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::PriceSeries;

pub fn compute_moving_average(prices: &PriceSeries, window: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(window);
    if window == 0 || prices.is_empty() {
        return IndicatorSeries::empty(indicator_type);
    }

    let closes = prices.prices();
    let warmup = (window - 1).min(closes.len());
    let values = std::iter::repeat_n(None, warmup).chain(
        closes
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
    );

    IndicatorSeries::from_values(indicator_type, prices, values)
}
