//! JSON format report generation

use serde_json::json;

use super::ReportGenerator;
use crate::batch::BatchReport;
use crate::error::DiagramError;

pub struct JsonReportGenerator;

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate_report(&self, report: &BatchReport) -> Result<String, DiagramError> {
        let output = json!({
            "diagrams": report.outcomes(),
            "summary": {
                "total": report.total(),
                "rendered": report.rendered_count(),
                "source_only": report.source_only_count(),
                "failed": report.failure_count(),
            }
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let output = JsonReportGenerator::new()
            .generate_report(&BatchReport::default())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["diagrams"], json!([]));
        assert_eq!(parsed["summary"]["total"], 0);
        assert_eq!(parsed["summary"]["failed"], 0);
    }
}
