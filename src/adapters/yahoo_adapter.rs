//! Yahoo Finance price adapter.
//!
//! Daily closes from the v8 chart API. Any transport, HTTP or payload
//! problem is reported as `DataUnavailable`; the adapter never hands back a
//! partial series.

use crate::domain::error::SigdashError;
use crate::domain::price::{PricePoint, PriceSeries, period_lookback};
use crate::ports::data_port::PriceDataPort;
use chrono::DateTime;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, SigdashError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| SigdashError::no_data("*", format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Chart URL with `symbol` as a single encoded path segment.
    fn chart_url(symbol: &str, period: &str) -> Result<Url, SigdashError> {
        let bad_url =
            || SigdashError::no_data(symbol, format!("cannot build chart URL from {BASE_URL}"));
        let mut url = Url::parse(BASE_URL).map_err(|_| bad_url())?;
        url.path_segments_mut().map_err(|_| bad_url())?.push(symbol);
        url.query_pairs_mut()
            .append_pair("range", period)
            .append_pair("interval", "1d");
        Ok(url)
    }

    fn parse_body(symbol: &str, body: &str) -> Result<PriceSeries, SigdashError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            SigdashError::no_data(symbol, format!("failed to parse response: {e}"))
        })?;
        Self::parse_response(symbol, resp)
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, SigdashError> {
        let unavailable = |reason: String| SigdashError::no_data(symbol, reason);

        let data = match resp.chart.result {
            Some(results) => results
                .into_iter()
                .next()
                .ok_or_else(|| unavailable("result array is empty".into()))?,
            None => {
                return Err(unavailable(match resp.chart.error {
                    Some(err) => format!("{}: {}", err.code, err.description),
                    None => "empty result with no error".into(),
                }));
            }
        };

        let timestamps = data
            .timestamp
            .ok_or_else(|| unavailable("no timestamps".into()))?;
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| unavailable("no quote data".into()))?;

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            // Non-trading days come back with a null close.
            let Some(price) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let timestamp = DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| unavailable(format!("invalid timestamp: {ts}")))?;
            points.push(PricePoint { timestamp, price });
        }

        if points.is_empty() {
            return Err(unavailable("no close prices returned".into()));
        }

        PriceSeries::new(symbol, points)
    }
}

impl PriceDataPort for YahooAdapter {
    fn fetch_prices(&self, symbol: &str, period: &str) -> Result<PriceSeries, SigdashError> {
        period_lookback(period)?;
        let url = Self::chart_url(symbol, period)?;
        debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| SigdashError::no_data(symbol, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SigdashError::no_data(symbol, format!("HTTP {status}")));
        }

        let body = resp
            .text()
            .map_err(|e| SigdashError::no_data(symbol, format!("failed to read response: {e}")))?;

        Self::parse_body(symbol, &body)
    }
}
