//! Strategy and simulation parameters.
//!
//! Precedence for every field: explicit caller value, then the strategy's
//! section in the parameter file, then the documented default. The merged
//! record is validated once and is immutable for the run.

use super::error::SigdashError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_BUY_FRACTION: f64 = 0.02;
pub const DEFAULT_SELL_FRACTION: f64 = 0.03;
pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const DEFAULT_SMA_WINDOW: usize = 20;
pub const DEFAULT_RSI_WINDOW: usize = 14;
pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;
pub const DEFAULT_ACCOUNT: &str = "demo_user";

/// Section holding run-level settings in the parameter file.
pub const SIMULATION_SECTION: &str = "simulation";

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub buy_fraction: f64,
    pub sell_fraction: f64,
    /// Moving-average window used by the simulator.
    pub window_size: usize,
    /// Moving-average window of the dashboard overlay.
    pub sma_window: usize,
    pub rsi_window: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            buy_fraction: DEFAULT_BUY_FRACTION,
            sell_fraction: DEFAULT_SELL_FRACTION,
            window_size: DEFAULT_WINDOW_SIZE,
            sma_window: DEFAULT_SMA_WINDOW,
            rsi_window: DEFAULT_RSI_WINDOW,
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

/// Caller-supplied values. `None` leaves the field to the file or default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyOverrides {
    pub buy_fraction: Option<f64>,
    pub sell_fraction: Option<f64>,
    pub window_size: Option<usize>,
    pub sma_window: Option<usize>,
    pub rsi_window: Option<usize>,
    pub oversold: Option<f64>,
    pub overbought: Option<f64>,
}

impl StrategyParams {
    /// Merge explicit overrides, the `[strategy_name]` file section and
    /// defaults, then validate.
    pub fn resolve(
        strategy_name: &str,
        overrides: &StrategyOverrides,
        file: Option<&dyn ConfigPort>,
    ) -> Result<Self, SigdashError> {
        let section = strategy_name.to_lowercase();
        let float = |value: Option<f64>, key: &str, default: f64| -> Result<f64, SigdashError> {
            if let Some(v) = value {
                return Ok(v);
            }
            let from_file = match file {
                Some(cfg) => cfg.get_float(&section, key)?,
                None => None,
            };
            Ok(from_file.unwrap_or(default))
        };
        let window = |value: Option<usize>, key: &str, default: usize| -> Result<usize, SigdashError> {
            if let Some(v) = value {
                return Ok(v);
            }
            let from_file = match file {
                Some(cfg) => cfg.get_uint(&section, key)?,
                None => None,
            };
            match from_file {
                Some(v) => usize::try_from(v)
                    .map_err(|_| SigdashError::invalid(&section, key, "window too large")),
                None => Ok(default),
            }
        };

        let params = StrategyParams {
            buy_fraction: float(overrides.buy_fraction, "buy", DEFAULT_BUY_FRACTION)?,
            sell_fraction: float(overrides.sell_fraction, "sell", DEFAULT_SELL_FRACTION)?,
            window_size: window(overrides.window_size, "window_size", DEFAULT_WINDOW_SIZE)?,
            sma_window: window(overrides.sma_window, "sma_window", DEFAULT_SMA_WINDOW)?,
            rsi_window: window(overrides.rsi_window, "rsi_window", DEFAULT_RSI_WINDOW)?,
            oversold: float(overrides.oversold, "oversold", DEFAULT_OVERSOLD)?,
            overbought: float(overrides.overbought, "overbought", DEFAULT_OVERBOUGHT)?,
        };
        params.validate(&section)?;
        Ok(params)
    }

    /// Fractions and windows strictly positive, oversold < overbought.
    pub fn validate(&self, section: &str) -> Result<(), SigdashError> {
        for (key, value) in [("buy", self.buy_fraction), ("sell", self.sell_fraction)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SigdashError::invalid(section, key, format!("{key} must be positive")));
            }
        }
        for (key, value) in [
            ("window_size", self.window_size),
            ("sma_window", self.sma_window),
            ("rsi_window", self.rsi_window),
        ] {
            if value == 0 {
                return Err(SigdashError::invalid(section, key, format!("{key} must be at least 1")));
            }
        }
        if !(self.oversold.is_finite() && self.overbought.is_finite()) {
            return Err(SigdashError::invalid(
                section,
                "oversold",
                "oscillator levels must be finite",
            ));
        }
        if self.oversold >= self.overbought {
            return Err(SigdashError::invalid(
                section,
                "oversold",
                "oversold must be below overbought",
            ));
        }
        Ok(())
    }
}

/// Run-level settings: starting cash and the identifiers stamped on records.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub initial_balance: f64,
    pub account: String,
    pub symbol: Option<String>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            account: DEFAULT_ACCOUNT.to_string(),
            symbol: None,
        }
    }
}

impl SimulationSettings {
    /// Same precedence as `StrategyParams::resolve`, reading `[simulation]`.
    pub fn resolve(
        initial_balance: Option<f64>,
        account: Option<&str>,
        symbol: Option<&str>,
        file: Option<&dyn ConfigPort>,
    ) -> Result<Self, SigdashError> {
        let initial_balance = match (initial_balance, file) {
            (Some(v), _) => v,
            (None, Some(cfg)) => cfg
                .get_float(SIMULATION_SECTION, "initial_balance")?
                .unwrap_or(DEFAULT_INITIAL_BALANCE),
            (None, None) => DEFAULT_INITIAL_BALANCE,
        };
        if !(initial_balance.is_finite() && initial_balance > 0.0) {
            return Err(SigdashError::invalid(
                SIMULATION_SECTION,
                "initial_balance",
                "initial_balance must be positive",
            ));
        }

        let from_file = |key: &str| file.and_then(|cfg| cfg.get_string(SIMULATION_SECTION, key));
        let account = account
            .map(str::to_string)
            .or_else(|| from_file("user_id"))
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());
        let symbol = symbol.map(str::to_string).or_else(|| from_file("symbol"));

        Ok(SimulationSettings {
            initial_balance,
            account,
            symbol,
        })
    }
}
