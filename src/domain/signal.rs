//! Discrete trading signals and the two classification rules.
//!
//! Both rules are pure functions of their inputs. The cross rule drives the
//! dashboard overlay; the deviation rule drives the simulator.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Overlay encoding: 1 buy, -1 sell, 0 hold.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price vs moving average combined with oscillator extremes.
///
/// BUY when price is above the average while the oscillator is oversold,
/// SELL when price is below the average while the oscillator is overbought.
/// Missing or NaN indicators always give HOLD.
pub fn classify_cross(
    price: f64,
    ma: Option<f64>,
    oscillator: Option<f64>,
    oversold: f64,
    overbought: f64,
) -> Signal {
    let (Some(ma), Some(osc)) = (
        ma.filter(|v| v.is_finite()),
        oscillator.filter(|v| v.is_finite()),
    ) else {
        return Signal::Hold;
    };

    if price > ma && osc < oversold {
        Signal::Buy
    } else if price < ma && osc > overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Percentage band around the moving average.
///
/// BUY when price < ma * (1 - buy_fraction), SELL when
/// price > ma * (1 + sell_fraction), HOLD otherwise.
pub fn classify_deviation(price: f64, ma: f64, buy_fraction: f64, sell_fraction: f64) -> Signal {
    if price < ma * (1.0 - buy_fraction) {
        Signal::Buy
    } else if price > ma * (1.0 + sell_fraction) {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
