//! Report generation modules for different output formats
//!
//! This module contains report generators for a finished batch:
//! - human: Human-readable console output
//! - json: JSON format for programmatic use

pub mod human;
pub mod json;

use crate::batch::BatchReport;
use crate::error::DiagramError;

/// Common trait for all report generators
pub trait ReportGenerator {
    /// Generate a report from the outcomes of a batch
    fn generate_report(&self, report: &BatchReport) -> Result<String, DiagramError>;
}

// Re-export for convenience
pub use human::{HumanReportGenerator, status_line};
pub use json::JsonReportGenerator;
