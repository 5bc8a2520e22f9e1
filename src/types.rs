// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for probe-memory-model

use crate::memory::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The litmus tests this tool knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Probe {
    #[serde(rename = "mp", alias = "message-passing")]
    MessagePassing,
    #[serde(rename = "bw", alias = "buffered-writes")]
    BufferedWrites,
    #[serde(rename = "iriw")]
    Iriw,
    #[serde(rename = "n6")]
    N6,
    #[serde(rename = "rb", alias = "read-buffering")]
    ReadBuffering,
}

impl Probe {
    pub fn all() -> Vec<Probe> {
        vec![
            Probe::MessagePassing,
            Probe::BufferedWrites,
            Probe::Iriw,
            Probe::N6,
            Probe::ReadBuffering,
        ]
    }

    /// Short command name.
    pub fn name(&self) -> &'static str {
        match self {
            Probe::MessagePassing => "mp",
            Probe::BufferedWrites => "bw",
            Probe::Iriw => "iriw",
            Probe::N6 => "n6",
            Probe::ReadBuffering => "rb",
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One observed register (or final memory value) of an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    pub name: &'static str,
    pub value: Value,
}

impl Register {
    pub fn new(name: &'static str, value: Value) -> Self {
        Self { name, value }
    }
}

/// Result of a single race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub probe: Probe,
    pub registers: Vec<Register>,
    pub detected: bool,
}

impl Outcome {
    /// Stable textual form, e.g. `r1=1 r2=0`.
    pub fn signature(&self) -> String {
        self.registers
            .iter()
            .map(|reg| format!("{}={}", reg.name, reg.value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        self.registers
            .iter()
            .find(|reg| reg.name == name)
            .map(|reg| reg.value)
    }
}

/// How often a particular outcome was seen during a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub outcome: String,
    pub count: u64,
    pub target: bool,
}

/// Summary of a repeated run of one probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignReport {
    pub probe: Probe,
    pub seed: u64,
    pub iterations: u64,
    pub detections: u64,
    pub target: String,
    pub outcomes: Vec<OutcomeCount>,
    pub started_at: String,
    pub first_detection: Option<String>,
    pub last_detection: Option<String>,
    pub duration: Duration,
}

impl CampaignReport {
    pub fn detection_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.detections as f64 / self.iterations as f64
        }
    }
}
