// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run profile loading.

use crate::types::Probe;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Campaign settings read from a JSON or YAML file. Every field is optional;
/// command-line flags win over anything set here.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunProfile {
    #[serde(default)]
    pub probe: Option<Probe>,
    #[serde(default)]
    pub iterations: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub stop_on_detect: bool,
    #[serde(default)]
    pub report: Option<PathBuf>,
    #[serde(default)]
    pub progress_every: Option<u64>,
}

impl RunProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading run profile {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json run profile {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml run profile {}", path.display())),
            _ => Err(anyhow!(
                "unsupported run profile extension for {}",
                path.display()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_profile(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp profile");
        file.write_all(body.as_bytes()).expect("write profile");
        file
    }

    #[test]
    fn test_load_yaml_profile() {
        let file = write_profile(
            ".yaml",
            "probe: iriw\niterations: 5000\nseed: 42\nstop_on_detect: true\nreport: out.json\n",
        );
        let profile = RunProfile::load(file.path()).expect("load yaml");
        assert_eq!(profile.probe, Some(Probe::Iriw));
        assert_eq!(profile.iterations, Some(5000));
        assert_eq!(profile.seed, Some(42));
        assert!(profile.stop_on_detect);
        assert_eq!(profile.report, Some(PathBuf::from("out.json")));
        assert_eq!(profile.progress_every, None);
    }

    #[test]
    fn test_load_json_profile_defaults() {
        let file = write_profile(".json", r#"{"probe": "mp"}"#);
        let profile = RunProfile::load(file.path()).expect("load json");
        assert_eq!(profile.probe, Some(Probe::MessagePassing));
        assert_eq!(profile.iterations, None);
        assert!(!profile.stop_on_detect);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let file = write_profile(".toml", "probe = \"mp\"\n");
        let err = RunProfile::load(file.path()).expect_err("toml unsupported");
        assert!(err.to_string().contains("unsupported run profile extension"));
    }

    #[test]
    fn test_rejects_unknown_probe() {
        let file = write_profile(".json", r#"{"probe": "sb"}"#);
        assert!(RunProfile::load(file.path()).is_err());
    }
}
