//! Fixed-quantity trade execution against a `SimulationState`.
//!
//! Every fill is exactly `TRADE_QUANTITY` units at the current price. A
//! proposed trade that breaks a constraint leaves the state untouched and
//! reports why.

use super::portfolio::SimulationState;

pub const TRADE_QUANTITY: u32 = 1;

/// Result of a buy or sell attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExecutionOutcome {
    Executed { quantity: u32, cost: f64 },
    InsufficientBalance { balance: f64, cost: f64 },
    PositionHeld { position: u32 },
    NoPosition,
}

impl ExecutionOutcome {
    pub fn executed_quantity(&self) -> u32 {
        match self {
            ExecutionOutcome::Executed { quantity, .. } => *quantity,
            _ => 0,
        }
    }
}

/// Buy one unit when flat and the cash covers quantity * price.
///
/// An existing position is checked first, so a held unit is reported even
/// when cash is also short.
pub fn execute_buy(state: &mut SimulationState, price: f64) -> ExecutionOutcome {
    if !state.is_flat() {
        return ExecutionOutcome::PositionHeld {
            position: state.position,
        };
    }

    let cost = TRADE_QUANTITY as f64 * price;
    if state.balance < cost {
        return ExecutionOutcome::InsufficientBalance {
            balance: state.balance,
            cost,
        };
    }

    state.balance -= cost;
    state.position += TRADE_QUANTITY;
    ExecutionOutcome::Executed {
        quantity: TRADE_QUANTITY,
        cost,
    }
}

/// Sell one unit when at least one is held.
pub fn execute_sell(state: &mut SimulationState, price: f64) -> ExecutionOutcome {
    if state.position < TRADE_QUANTITY {
        return ExecutionOutcome::NoPosition;
    }

    let revenue = TRADE_QUANTITY as f64 * price;
    state.balance += revenue;
    state.position -= TRADE_QUANTITY;
    ExecutionOutcome::Executed {
        quantity: TRADE_QUANTITY,
        cost: revenue,
    }
}
