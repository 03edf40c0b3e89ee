//! Event-by-event portfolio simulator.
//!
//! One pass over the price series in timestamp order. Each step:
//! 1. Look up the trailing moving average; undefined -> HOLD
//! 2. Classify with the deviation rule
//! 3. Execute one unit if balance/position constraints allow, else HOLD
//! 4. Value the portfolio at the current price
//! 5. Emit a `DecisionRecord`
//!
//! Strategy names without a classifier still run to completion, recording
//! HOLD at every step.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::execution::{ExecutionOutcome, execute_buy, execute_sell};
use super::indicator::sma::compute_moving_average;
use super::params::{DEFAULT_ACCOUNT, SimulationSettings, StrategyParams};
use super::portfolio::SimulationState;
use super::price::PriceSeries;
use super::signal::{Signal, classify_deviation};

/// Strategies with a classifier mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Deviation band around the trailing moving average.
    Simple,
}

impl StrategyKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "simple" => Some(StrategyKind::Simple),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub timestamp: DateTime<Utc>,
    pub account: String,
    pub symbol: String,
    pub action: Signal,
    pub quantity: u32,
    pub strategy: String,
    pub reason: String,
    pub balance: f64,
    pub position: u32,
    pub portfolio_value: f64,
}

/// Complete decision log for one run. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub strategy: String,
    pub symbol: String,
    pub account: String,
    pub initial_balance: f64,
    pub records: Vec<DecisionRecord>,
}

impl SimulationReport {
    /// Records where a trade was executed.
    pub fn trades(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.records.iter().filter(|r| r.action != Signal::Hold)
    }

    pub fn equity_curve(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.records
            .iter()
            .map(|r| (r.timestamp, r.portfolio_value))
            .collect()
    }

    pub fn final_record(&self) -> Option<&DecisionRecord> {
        self.records.last()
    }
}

pub struct Simulator {
    strategy_name: String,
    kind: Option<StrategyKind>,
    params: StrategyParams,
    settings: SimulationSettings,
}

impl Simulator {
    pub fn new(strategy_name: &str, params: StrategyParams, settings: SimulationSettings) -> Self {
        Simulator {
            strategy_name: strategy_name.to_string(),
            kind: StrategyKind::from_name(strategy_name),
            params,
            settings,
        }
    }

    /// Replay `prices` and return the decision log, or `None` when there is
    /// nothing to simulate or the parameters fail validation.
    pub fn run(&self, prices: &PriceSeries) -> Option<SimulationReport> {
        if let Err(e) = self.params.validate(&self.strategy_name.to_lowercase()) {
            warn!(strategy = %self.strategy_name, error = %e, "invalid strategy parameters");
            return None;
        }
        if prices.is_empty() {
            warn!(symbol = prices.symbol(), "empty price series, nothing to simulate");
            return None;
        }

        let symbol = self
            .settings
            .symbol
            .clone()
            .unwrap_or_else(|| prices.symbol().to_string());

        info!(
            strategy = %self.strategy_name,
            symbol = %symbol,
            points = prices.len(),
            initial_balance = self.settings.initial_balance,
            "starting simulation"
        );
        if self.kind.is_none() {
            warn!(strategy = %self.strategy_name, "strategy not implemented, every step will HOLD");
        }

        let ma = compute_moving_average(prices, self.params.window_size);
        let mut state = SimulationState::new(self.settings.initial_balance);
        let mut records = Vec::with_capacity(prices.len());

        for (i, point) in prices.points().iter().enumerate() {
            let (action, quantity) = self.step(&mut state, point.price, ma.value_at(i));
            records.push(DecisionRecord {
                timestamp: point.timestamp,
                account: self.settings.account.clone(),
                symbol: symbol.clone(),
                action,
                quantity,
                strategy: self.strategy_name.clone(),
                reason: state.last_reason.clone(),
                balance: state.balance,
                position: state.position,
                portfolio_value: state.portfolio_value(point.price),
            });
        }

        info!(
            records = records.len(),
            final_balance = state.balance,
            final_position = state.position,
            "simulation finished"
        );

        Some(SimulationReport {
            strategy: self.strategy_name.clone(),
            symbol,
            account: self.settings.account.clone(),
            initial_balance: self.settings.initial_balance,
            records,
        })
    }

    /// Apply one timestamp. Returns the recorded action and executed quantity;
    /// the reason is left in `state.last_reason`.
    fn step(&self, state: &mut SimulationState, price: f64, ma: Option<f64>) -> (Signal, u32) {
        let Some(kind) = self.kind else {
            state.last_reason = format!("Strategy '{}' not implemented in simulator.", self.strategy_name);
            return (Signal::Hold, 0);
        };
        let Some(ma) = ma else {
            state.last_reason = format!(
                "Insufficient data for moving average (window={})",
                self.params.window_size
            );
            return (Signal::Hold, 0);
        };

        let proposed = match kind {
            StrategyKind::Simple => classify_deviation(
                price,
                ma,
                self.params.buy_fraction,
                self.params.sell_fraction,
            ),
        };
        let quote = format!("Price={price:.2}, MA={ma:.2}");

        match proposed {
            Signal::Hold => {
                state.last_reason = format!("HOLD: {quote}");
                (Signal::Hold, 0)
            }
            Signal::Buy => {
                let outcome = execute_buy(state, price);
                self.record_outcome(state, Signal::Buy, outcome, &quote)
            }
            Signal::Sell => {
                let outcome = execute_sell(state, price);
                self.record_outcome(state, Signal::Sell, outcome, &quote)
            }
        }
    }

    fn record_outcome(
        &self,
        state: &mut SimulationState,
        proposed: Signal,
        outcome: ExecutionOutcome,
        quote: &str,
    ) -> (Signal, u32) {
        let (action, reason) = match outcome {
            ExecutionOutcome::Executed { quantity, .. } => {
                debug!(action = %proposed, quantity, balance = state.balance, "trade executed");
                (proposed, format!("{proposed} executed: {quote}"))
            }
            ExecutionOutcome::InsufficientBalance { balance, cost } => (
                Signal::Hold,
                format!(
                    "{proposed} recommended, but HOLD: insufficient balance \
                     (balance={balance:.2} < cost={cost:.2}). {quote}"
                ),
            ),
            ExecutionOutcome::PositionHeld { position } => (
                Signal::Hold,
                format!(
                    "{proposed} recommended, but HOLD: position already held \
                     (position={position}). {quote}"
                ),
            ),
            ExecutionOutcome::NoPosition => (
                Signal::Hold,
                format!("{proposed} recommended, but HOLD: no position to sell. {quote}"),
            ),
        };
        state.last_reason = reason;
        (action, outcome.executed_quantity())
    }
}

/// Run one simulation with default account settings.
///
/// Returns `None` for an empty price series or invalid parameters.
pub fn run_simulation(
    prices: &PriceSeries,
    strategy_name: &str,
    params: &StrategyParams,
    initial_balance: f64,
) -> Option<SimulationReport> {
    let settings = SimulationSettings {
        initial_balance,
        account: DEFAULT_ACCOUNT.to_string(),
        symbol: None,
    };
    Simulator::new(strategy_name, params.clone(), settings).run(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use chrono::TimeZone;

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
        PriceSeries::new("AAPL", points).unwrap()
    }

    #[test]
    fn strategy_kind_from_name() {
        assert_eq!(StrategyKind::from_name("simple"), Some(StrategyKind::Simple));
        assert_eq!(StrategyKind::from_name(" Simple "), Some(StrategyKind::Simple));
        assert_eq!(StrategyKind::from_name("unknown_x"), None);
    }

    #[test]
    fn empty_series_is_no_result() {
        let result = run_simulation(
            &PriceSeries::empty("AAPL"),
            "simple",
            &StrategyParams::default(),
            1000.0,
        );
        assert!(result.is_none());
    }

    #[test]
    fn invalid_params_are_no_result() {
        let prices = make_series(&[100.0, 98.0, 96.0, 94.0, 92.0, 150.0]);
        let zero_window = StrategyParams {
            window_size: 0,
            ..Default::default()
        };
        assert!(run_simulation(&prices, "simple", &zero_window, 1000.0).is_none());

        let negative_buy = StrategyParams {
            buy_fraction: -0.02,
            ..Default::default()
        };
        assert!(run_simulation(&prices, "simple", &negative_buy, 1000.0).is_none());

        let inverted = StrategyParams {
            oversold: 80.0,
            overbought: 20.0,
            ..Default::default()
        };
        let settings = SimulationSettings::default();
        assert!(Simulator::new("simple", inverted, settings).run(&prices).is_none());
    }

    #[test]
    fn buy_then_sell_scenario() {
        let prices = make_series(&[100.0, 98.0, 96.0, 94.0, 92.0, 150.0]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0).unwrap();

        assert_eq!(report.records.len(), 6);
        for r in &report.records[..4] {
            assert_eq!(r.action, Signal::Hold);
            assert!(r.reason.contains("Insufficient data"), "{}", r.reason);
            assert_eq!(r.balance, 1000.0);
        }

        let buy = &report.records[4];
        assert_eq!(buy.action, Signal::Buy);
        assert_eq!(buy.quantity, 1);
        assert_eq!(buy.balance, 908.0);
        assert_eq!(buy.position, 1);
        assert_eq!(buy.portfolio_value, 1000.0);
        assert_eq!(buy.reason, "BUY executed: Price=92.00, MA=96.00");

        let sell = &report.records[5];
        assert_eq!(sell.action, Signal::Sell);
        assert_eq!(sell.quantity, 1);
        assert_eq!(sell.balance, 1058.0);
        assert_eq!(sell.position, 0);
        assert_eq!(sell.portfolio_value, 1058.0);

        assert_eq!(report.trades().count(), 2);
    }

    #[test]
    fn records_carry_identifiers() {
        let prices = make_series(&[1.0, 2.0]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 10.0).unwrap();
        let first = &report.records[0];
        assert_eq!(first.account, "demo_user");
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first.strategy, "simple");
        assert_eq!(first.timestamp, prices.points()[0].timestamp);
    }

    #[test]
    fn settings_symbol_overrides_series_symbol() {
        let prices = make_series(&[1.0]);
        let settings = SimulationSettings {
            symbol: Some("MSFT".into()),
            account: "alice".into(),
            ..Default::default()
        };
        let report = Simulator::new("simple", StrategyParams::default(), settings)
            .run(&prices)
            .unwrap();
        assert_eq!(report.symbol, "MSFT");
        assert_eq!(report.records[0].symbol, "MSFT");
        assert_eq!(report.records[0].account, "alice");
    }

    #[test]
    fn unknown_strategy_holds_everywhere() {
        let prices = make_series(&[100.0, 98.0, 96.0, 94.0, 92.0, 150.0]);
        let report =
            run_simulation(&prices, "unknown_x", &StrategyParams::default(), 1000.0).unwrap();

        assert_eq!(report.records.len(), 6);
        for r in &report.records {
            assert_eq!(r.action, Signal::Hold);
            assert_eq!(r.quantity, 0);
            assert!(r.reason.contains("not implemented"), "{}", r.reason);
            assert_eq!(r.balance, 1000.0);
            assert_eq!(r.position, 0);
            assert_eq!(r.portfolio_value, 1000.0);
        }
    }

    #[test]
    fn insufficient_balance_downgrades_buy() {
        // MA = 108, 100 < 108 * 0.98
        let prices = make_series(&[110.0, 110.0, 110.0, 110.0, 100.0]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 5.0).unwrap();

        let last = report.final_record().unwrap();
        assert_eq!(last.action, Signal::Hold);
        assert_eq!(last.quantity, 0);
        assert!(last.reason.contains("insufficient balance"), "{}", last.reason);
        assert_eq!(last.balance, 5.0);
        assert_eq!(last.position, 0);
    }

    #[test]
    fn held_position_downgrades_second_buy() {
        // step 4: MA 98, buy at 90; step 5: MA 95, 85 < 93.1 but already long
        let prices = make_series(&[100.0, 100.0, 100.0, 100.0, 90.0, 85.0]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0).unwrap();

        assert_eq!(report.records[4].action, Signal::Buy);
        let last = &report.records[5];
        assert_eq!(last.action, Signal::Hold);
        assert!(last.reason.contains("position already held"), "{}", last.reason);
        assert_eq!(last.balance, 910.0);
        assert_eq!(last.position, 1);
        assert_eq!(last.portfolio_value, 995.0);
    }

    #[test]
    fn sell_without_position_downgrades() {
        // MA = 102, 110 > 102 * 1.03
        let prices = make_series(&[100.0, 100.0, 100.0, 100.0, 110.0]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0).unwrap();

        let last = report.final_record().unwrap();
        assert_eq!(last.action, Signal::Hold);
        assert!(last.reason.contains("no position to sell"), "{}", last.reason);
        assert_eq!(last.balance, 1000.0);
    }

    #[test]
    fn hold_inside_band_reports_quote() {
        let prices = make_series(&[100.0; 5]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0).unwrap();
        assert_eq!(
            report.final_record().unwrap().reason,
            "HOLD: Price=100.00, MA=100.00"
        );
    }

    #[test]
    fn window_follows_params() {
        let params = StrategyParams {
            window_size: 2,
            ..Default::default()
        };
        let prices = make_series(&[100.0, 100.0, 90.0]);
        let report = run_simulation(&prices, "simple", &params, 1000.0).unwrap();

        assert!(report.records[0].reason.contains("window=2"));
        // MA = 95, 90 < 93.1
        assert_eq!(report.records[2].action, Signal::Buy);
    }

    #[test]
    fn equity_curve_tracks_portfolio_value() {
        let prices = make_series(&[100.0, 98.0, 96.0, 94.0, 92.0, 150.0]);
        let report = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0).unwrap();
        let curve = report.equity_curve();
        assert_eq!(curve.len(), 6);
        assert_eq!(curve[5].1, 1058.0);
        assert_eq!(curve[0].0, prices.points()[0].timestamp);
    }

    #[test]
    fn deterministic_runs() {
        let prices = make_series(&[100.0, 98.0, 96.0, 94.0, 92.0, 150.0, 120.0, 80.0]);
        let a = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0);
        let b = run_simulation(&prices, "simple", &StrategyParams::default(), 1000.0);
        assert_eq!(a, b);
    }
}
