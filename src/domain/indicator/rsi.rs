//! RSI-style momentum oscillator with exponential smoothing.
//!
//! Gains and losses are smoothed with a recursive EWMA whose center of mass
//! is n-1, i.e. alpha = 1/n:
//! - avg[0] = x[0]
//! - avg[i] = (1 - alpha) * avg[i-1] + alpha * x[i]
//!
//! The first change has no predecessor and counts as zero gain and loss.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first n points are undefined even when the recursion has
//! already produced a number.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::price::PriceSeries;

pub fn compute_oscillator(prices: &PriceSeries, window: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(window);
    if window == 0 || prices.is_empty() {
        return IndicatorSeries::empty(indicator_type);
    }

    let closes = prices.prices();
    let alpha = 1.0 / window as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut values = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
            avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;
        }

        if i < window {
            values.push(None);
        } else {
            values.push(Some(oscillator_value(avg_gain, avg_loss)));
        }
    }

    IndicatorSeries::from_values(indicator_type, prices, values)
}

fn oscillator_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn make_series(prices: &[f64]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i as i64),
                price,
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn rsi_empty_input() {
        let series = compute_oscillator(&PriceSeries::empty("TEST"), 14);
        assert!(series.is_empty());
    }

    #[test]
    fn rsi_zero_window() {
        let series = compute_oscillator(&make_series(&[1.0, 2.0]), 0);
        assert!(series.is_empty());
    }

    #[test]
    fn rsi_warmup_covers_first_window_points() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let series = compute_oscillator(&make_series(&prices), 14);

        assert_eq!(series.len(), 20);
        for i in 0..14 {
            assert_eq!(series.value_at(i), None, "point {} should be undefined", i);
        }
        for i in 14..20 {
            assert!(series.value_at(i).is_some(), "point {} should be defined", i);
        }
    }

    #[test]
    fn rsi_series_no_longer_than_window_is_undefined() {
        let series = compute_oscillator(&make_series(&[1.0, 2.0, 3.0]), 3);
        assert!(series.all_undefined());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let series = compute_oscillator(&make_series(&prices), 5);
        assert_relative_eq!(series.value_at(9).unwrap(), 100.0);
    }

    #[test]
    fn rsi_flat_prices_forced_to_100() {
        let series = compute_oscillator(&make_series(&[50.0; 8]), 3);
        for i in 3..8 {
            assert_eq!(series.value_at(i), Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        let series = compute_oscillator(&make_series(&prices), 5);
        assert_relative_eq!(series.value_at(9).unwrap(), 0.0);
    }

    #[test]
    fn rsi_known_values() {
        // alpha = 0.5
        // gains  0, 1, 0, 1   -> avg 0, 0.5, 0.25, 0.625
        // losses 0, 0, 1, 0   -> avg 0, 0,   0.5,  0.25
        let series = compute_oscillator(&make_series(&[1.0, 2.0, 1.0, 2.0]), 2);

        assert_eq!(series.value_at(0), None);
        assert_eq!(series.value_at(1), None);
        assert_relative_eq!(series.value_at(2).unwrap(), 100.0 - 100.0 / 1.5, epsilon = 1e-9);
        assert_relative_eq!(series.value_at(3).unwrap(), 100.0 - 100.0 / 3.5, epsilon = 1e-9);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + ((i % 7) as f64 - 3.0) * 2.0)
            .collect();
        let series = compute_oscillator(&make_series(&prices), 14);

        for value in series.values.iter().filter_map(|p| p.value) {
            assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
        }
    }

    #[test]
    fn rsi_indicator_type() {
        let series = compute_oscillator(&make_series(&[1.0]), 14);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }
}
