#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sigdash::domain::error::SigdashError;
use sigdash::domain::price::{PricePoint, PriceSeries};
use sigdash::ports::data_port::PriceDataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

pub struct MockPriceDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, String)>>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: &[f64]) -> Self {
        self.data.insert(symbol.to_string(), make_series(symbol, prices));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(&self, symbol: &str, period: &str) -> Result<PriceSeries, SigdashError> {
        self.requests
            .borrow_mut()
            .push((symbol.to_string(), period.to_string()));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SigdashError::no_data(symbol, reason.clone()));
        }
        match self.data.get(symbol) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(SigdashError::no_data(symbol, "no data")),
        }
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Daily points starting 2024-01-01.
pub fn make_series(symbol: &str, prices: &[f64]) -> PriceSeries {
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint {
            timestamp: base_time() + Duration::days(i as i64),
            price,
        })
        .collect();
    PriceSeries::new(symbol, points).unwrap()
}

/// Price CSV text with daily `YYYY-MM-DD` timestamps.
pub fn price_csv(prices: &[f64]) -> String {
    let mut out = String::from("timestamp,price\n");
    for (i, price) in prices.iter().enumerate() {
        let ts = base_time() + Duration::days(i as i64);
        out.push_str(&format!("{},{}\n", ts.format("%Y-%m-%d"), price));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// The canonical buy-then-sell scenario: warm-up of four holds, a buy at 92
/// against MA 96, a sell at 150 against MA 106.
pub const ROUND_TRIP: [f64; 6] = [100.0, 98.0, 96.0, 94.0, 92.0, 150.0];
