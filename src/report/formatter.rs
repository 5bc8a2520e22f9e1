// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::report::output::ReportOutputFormat;
use crate::types::*;
use anyhow::{anyhow, Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &CampaignReport) {
        println!("\n{}", "=== MEMORY MODEL PROBE REPORT ===".bold().cyan());
        println!();

        self.print_summary(report);
        println!();

        self.print_outcomes(report);
        println!();
    }

    fn print_summary(&self, report: &CampaignReport) {
        println!("{}", "CAMPAIGN".bold().yellow());
        println!("  Probe: {} ({})", report.probe, report.probe.description());
        println!("  Seed: {}", report.seed);
        println!("  Started: {}", report.started_at);
        println!("  Duration: {:.2}s", report.duration.as_secs_f64());
        println!("  Iterations: {}", report.iterations);

        let detections = format!(
            "{} ({:.4}%)",
            report.detections,
            report.detection_rate() * 100.0
        );
        if report.detections > 0 {
            println!("  Detections: {}", detections.red().bold());
        } else {
            println!("  Detections: {}", detections.green());
        }
        if let Some(first) = &report.first_detection {
            println!("  First detection: {}", first);
        }
        if let Some(last) = &report.last_detection {
            println!("  Last detection: {}", last);
        }
    }

    fn print_outcomes(&self, report: &CampaignReport) {
        println!("{}", "OUTCOMES".bold().yellow());
        println!("  Target: {}", report.target.bold());
        if report.outcomes.is_empty() {
            println!("  (no iterations ran)");
            return;
        }
        for entry in &report.outcomes {
            let line = format!("{:<24} {:>12}", entry.outcome, entry.count);
            if entry.target {
                println!("  {}  {}", line.red().bold(), "<- target".red());
            } else {
                println!("  {}", line);
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, report: &CampaignReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ReportOutputFormat::from_path(path).ok_or_else(|| {
            anyhow!(
                "unsupported report extension for {} (use .{} or .{})",
                path.display(),
                ReportOutputFormat::Json.extension(),
                ReportOutputFormat::Yaml.extension()
            )
        })?;
        let content = format.serialize(report)?;
        fs::write(path, content)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Report saved to: {}", path.display());
        Ok(())
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
