//! Decision log output port trait.

use crate::domain::error::SigdashError;
use crate::domain::simulator::SimulationReport;
use std::path::Path;

/// Port for persisting a simulation's decision log.
pub trait ReportPort {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), SigdashError>;
}
