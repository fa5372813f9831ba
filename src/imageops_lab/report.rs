use crate::error::Error;
use crate::imageops_lab::benchmark::BenchmarkReport;
use std::fmt;

const RULE_WIDTH: usize = 65;

/// Extension of the stored sample files named in the Image column
const SAMPLE_EXTENSION: &str = "bmp";

/// Renders the report as a fixed-width console table
///
/// ```text
/// Image      | Filter Name               | Type       | MSE
/// -----------------------------------------------------------------
/// 1.bmp      | Box Blur (3x3)            | Linear     | 41.27
/// ```
///
/// Skipped samples are listed after the rows.
#[must_use]
pub fn render_table(report: &BenchmarkReport) -> String {
    report.to_string()
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);

        writeln!(
            f,
            "{:<10} | {:<25} | {:<10} | {:<10}",
            "Image", "Filter Name", "Type", "MSE"
        )?;
        writeln!(f, "{}", rule)?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<10} | {:<25} | {:<10} | {:.2}",
                sample_file_name(&row.source_label),
                row.filter_name,
                row.category.to_string(),
                row.mse
            )?;
        }

        for skipped in &self.skipped {
            let file_name = sample_file_name(&skipped.label);
            match &skipped.filter_name {
                Some(filter) => {
                    writeln!(f, "Skipped {} / {}: {}", file_name, filter, skipped.reason)?;
                }
                None => writeln!(f, "Skipped {}: {}", file_name, skipped.reason)?,
            }
        }

        writeln!(f, "{}", rule)
    }
}

fn sample_file_name(label: &str) -> String {
    format!("{}.{}", label, SAMPLE_EXTENSION)
}

/// Serializes the report (rows and skipped samples) as pretty-printed JSON
///
/// # Errors
///
/// * `Error::Serialization` - serde_json failed to encode the report
pub fn to_json(report: &BenchmarkReport) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(report)?)
}
