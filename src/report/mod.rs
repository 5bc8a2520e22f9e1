// SPDX-License-Identifier: PMPL-1.0-or-later

//! Campaign report output

pub mod formatter;
pub mod output;

use crate::types::*;
use anyhow::Result;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Save report to file; the extension picks JSON or YAML.
pub fn save_report<P: AsRef<Path>>(report: &CampaignReport, path: P) -> Result<()> {
    let formatter = ReportFormatter::new();
    formatter.save(report, path)
}

/// Print report to console
pub fn print_report(report: &CampaignReport) {
    let formatter = ReportFormatter::new();
    formatter.print(report);
}
