//! CSV file price adapter.
//!
//! Files live at `<base_path>/<SYMBOL>.csv` and need a timestamp column
//! (`timestamp`, `date` or `datetime`) and a price column (`price` or
//! `close`). Header names are matched case-insensitively; other columns are
//! ignored.

use crate::domain::error::SigdashError;
use crate::domain::price::{PricePoint, PriceSeries, parse_timestamp, period_lookback};
use crate::ports::data_port::PriceDataPort;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_COLUMNS: [&str; 3] = ["timestamp", "date", "datetime"];
const PRICE_COLUMNS: [&str; 2] = ["price", "close"];

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(&self, symbol: &str, period: &str) -> Result<PriceSeries, SigdashError> {
        let lookback = period_lookback(period)?;
        let series = load_price_file(symbol, &self.csv_path(symbol))?;
        let series = match lookback {
            Some(lookback) => series.tail(lookback),
            None => series,
        };
        debug!(symbol, period, points = series.len(), "loaded price file");
        Ok(series)
    }
}

/// Load a price file from an explicit path.
pub fn load_price_file(symbol: &str, path: &Path) -> Result<PriceSeries, SigdashError> {
    let file = File::open(path).map_err(|e| {
        SigdashError::no_data(symbol, format!("failed to read {}: {}", path.display(), e))
    })?;
    read_price_csv(symbol, file)
}

/// Parse price rows from any reader.
///
/// Missing columns and unparsable cells fail before any series is built;
/// a file with a header but no rows is reported as no data.
pub fn read_price_csv<R: Read>(symbol: &str, reader: R) -> Result<PriceSeries, SigdashError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let (ts_idx, price_idx) = match (find(&TIMESTAMP_COLUMNS), find(&PRICE_COLUMNS)) {
        (Some(t), Some(p)) => (t, p),
        (t, p) => {
            let mut missing = Vec::new();
            if t.is_none() {
                missing.push("timestamp");
            }
            if p.is_none() {
                missing.push("price");
            }
            return Err(SigdashError::malformed(format!(
                "CSV must contain 'timestamp' and 'price' columns, missing: {}",
                missing.join(", ")
            )));
        }
    };

    let mut points = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = row + 2;

        let ts_raw = record
            .get(ts_idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SigdashError::malformed(format!("line {line}: missing timestamp")))?;
        let price_raw = record
            .get(price_idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SigdashError::malformed(format!("line {line}: missing price")))?;

        let timestamp = parse_timestamp(ts_raw)
            .map_err(|e| SigdashError::malformed(format!("line {line}: {e}")))?;
        let price: f64 = price_raw.parse().map_err(|e| {
            SigdashError::malformed(format!("line {line}: invalid price '{price_raw}': {e}"))
        })?;

        points.push(PricePoint { timestamp, price });
    }

    if points.is_empty() {
        return Err(SigdashError::no_data(symbol, "price file has no rows"));
    }

    PriceSeries::new(symbol, points)
}
