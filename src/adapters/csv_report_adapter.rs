//! CSV export of simulation decision logs.

use crate::domain::error::SigdashError;
use crate::domain::price::ISO_UTC_FORMAT;
use crate::domain::signal::Signal;
use crate::domain::simulator::{DecisionRecord, SimulationReport};
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct DecisionRow<'a> {
    timestamp: String,
    user_id: &'a str,
    symbol: &'a str,
    side: Signal,
    quantity: u32,
    strategy: &'a str,
    reason: &'a str,
    balance: f64,
    position: u32,
    portfolio_value: f64,
}

impl<'a> From<&'a DecisionRecord> for DecisionRow<'a> {
    fn from(r: &'a DecisionRecord) -> Self {
        DecisionRow {
            timestamp: r.timestamp.format(ISO_UTC_FORMAT).to_string(),
            user_id: &r.account,
            symbol: &r.symbol,
            side: r.action,
            quantity: r.quantity,
            strategy: &r.strategy,
            reason: &r.reason,
            balance: r.balance,
            position: r.position,
            portfolio_value: r.portfolio_value,
        }
    }
}

/// Writes one row per decision record with a header line.
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn write_to<W: Write>(report: &SimulationReport, writer: W) -> Result<(), SigdashError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in &report.records {
            wtr.serialize(DecisionRow::from(record))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), SigdashError> {
        let file = File::create(output_path)?;
        Self::write_to(report, file)?;
        info!(
            path = %output_path.display(),
            rows = report.records.len(),
            "decision log written"
        );
        Ok(())
    }
}
