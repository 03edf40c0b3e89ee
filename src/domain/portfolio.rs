//! Single-instrument account state evolved by the simulator.

/// Cash, units held and the reason behind the most recent decision.
///
/// Owned by one simulation run. Position is never negative and never exceeds
/// one unit because every trade is a single unit and buys require a flat
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub balance: f64,
    pub position: u32,
    pub last_reason: String,
}

impl SimulationState {
    pub fn new(initial_balance: f64) -> Self {
        SimulationState {
            balance: initial_balance,
            position: 0,
            last_reason: String::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position == 0
    }

    /// balance + position * price
    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.balance + self.position as f64 * price
    }
}
