//! Run-level statistics over a decision log.

use super::signal::Signal;
use super::simulator::SimulationReport;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub steps: usize,
    pub buys: usize,
    pub sells: usize,
    pub final_balance: f64,
    pub final_position: u32,
    pub final_value: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
}

impl SimulationSummary {
    pub fn compute(report: &SimulationReport) -> Self {
        let initial = report.initial_balance;
        let (final_balance, final_position, final_value) = report
            .final_record()
            .map(|r| (r.balance, r.position, r.portfolio_value))
            .unwrap_or((initial, 0, initial));

        let buys = report.trades().filter(|r| r.action == Signal::Buy).count();
        let sells = report.trades().filter(|r| r.action == Signal::Sell).count();

        let total_return = if initial > 0.0 {
            (final_value - initial) / initial
        } else {
            0.0
        };

        let values: Vec<f64> = report.records.iter().map(|r| r.portfolio_value).collect();

        SimulationSummary {
            steps: report.records.len(),
            buys,
            sells,
            final_balance,
            final_position,
            final_value,
            total_return,
            max_drawdown: max_drawdown(&values),
        }
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &v in values {
        if v > peak {
            peak = v;
        }
        if peak > 0.0 {
            worst = worst.max((peak - v) / peak);
        }
    }
    worst
}
