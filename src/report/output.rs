// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for exported campaign reports

use crate::types::CampaignReport;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutputFormat {
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            _ => None,
        }
    }

    /// Format implied by a file extension, JSON when there is none.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::parse(ext),
            None => Some(ReportOutputFormat::Json),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportOutputFormat::Json => "json",
            ReportOutputFormat::Yaml => "yaml",
        }
    }

    pub fn serialize(&self, report: &CampaignReport) -> Result<String> {
        match self {
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ReportOutputFormat::from_path(Path::new("out.yml")),
            Some(ReportOutputFormat::Yaml)
        );
        assert_eq!(
            ReportOutputFormat::from_path(Path::new("out")),
            Some(ReportOutputFormat::Json)
        );
        assert_eq!(ReportOutputFormat::from_path(Path::new("out.ncl")), None);
        assert_eq!(ReportOutputFormat::Yaml.extension(), "yaml");
    }
}
