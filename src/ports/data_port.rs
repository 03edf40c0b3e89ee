//! Price history port trait.

use crate::domain::error::SigdashError;
use crate::domain::price::{PricePoint, PriceSeries};

pub trait PriceDataPort {
    /// Fetch the price history for `symbol` over a lookback `period`
    /// (`1d`, `5d`, `1mo`, `3mo`, `6mo`, `1y`, `2y`, `5y`, `max`).
    ///
    /// Implementations return `DataUnavailable` rather than an empty or
    /// partially populated series.
    fn fetch_prices(&self, symbol: &str, period: &str) -> Result<PriceSeries, SigdashError>;

    /// Most recent available price.
    fn latest_price(&self, symbol: &str) -> Result<PricePoint, SigdashError> {
        let series = self.fetch_prices(symbol, "5d")?;
        series
            .last()
            .copied()
            .ok_or_else(|| SigdashError::no_data(symbol, "no latest price"))
    }
}
