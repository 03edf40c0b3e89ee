//! Price series representation.
//!
//! A `PriceSeries` is the only input the indicator engine and the simulator
//! consume. Construction sorts by timestamp and rejects duplicates and
//! non-finite prices, so every downstream consumer can assume a clean,
//! strictly increasing time index.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use super::error::SigdashError;

/// Output format for timestamps in decision logs.
pub const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points.
    ///
    /// Points are sorted chronologically. Duplicate timestamps and
    /// non-finite prices are rejected as malformed input.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Result<Self, SigdashError> {
        if let Some(bad) = points.iter().find(|p| !p.price.is_finite()) {
            return Err(SigdashError::malformed(format!(
                "non-finite price {} at {}",
                bad.price,
                bad.timestamp.format(ISO_UTC_FORMAT)
            )));
        }

        points.sort_by_key(|p| p.timestamp);

        if let Some(pair) = points.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(SigdashError::malformed(format!(
                "duplicate timestamp {}",
                pair[0].timestamp.format(ISO_UTC_FORMAT)
            )));
        }

        Ok(PriceSeries {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        PriceSeries {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Keep only points within `lookback` of the latest timestamp.
    pub fn tail(&self, lookback: Duration) -> PriceSeries {
        let Some(last) = self.last() else {
            return self.clone();
        };
        let cutoff = last.timestamp - lookback;
        PriceSeries {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= cutoff)
                .copied()
                .collect(),
        }
    }
}

/// Lookback for a period string; `None` means the full history.
pub fn period_lookback(period: &str) -> Result<Option<Duration>, SigdashError> {
    let days = match period.trim() {
        "max" => return Ok(None),
        "1d" => 1,
        "5d" => 5,
        "1mo" => 30,
        "3mo" => 91,
        "6mo" => 182,
        "1y" => 365,
        "2y" => 730,
        "5y" => 1826,
        other => {
            return Err(SigdashError::malformed(format!(
                "unsupported period '{other}'"
            )));
        }
    };
    Ok(Some(Duration::days(days)))
}

/// Parse a timestamp as found in price files.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` with or without a `+HH:MM`
/// offset, `YYYY-MM-DDTHH:MM:SS`, and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SigdashError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(SigdashError::malformed(format!("invalid timestamp '{s}'")))
}
