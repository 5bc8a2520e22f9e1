// SPDX-License-Identifier: PMPL-1.0-or-later

//! Campaign driver: repeat one probe, tally what the races produced, and
//! announce every detection.

pub mod profile;

pub use profile::RunProfile;

use crate::memory::{Racy, SharedCell};
use crate::notify;
use crate::race::Runner;
use crate::types::*;
use anyhow::{bail, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignConfig {
    pub probe: Probe,
    /// `None` runs until the process is killed.
    pub iterations: Option<u64>,
    /// `None` seeds the runner from OS entropy.
    pub seed: Option<u64>,
    /// A profile can switch this on but never off again.
    pub stop_on_detect: bool,
    /// Print a progress line every N iterations. `Some(0)` disables it;
    /// `None` leaves it to the profile.
    pub progress_every: Option<u64>,
    /// Announce detections on stderr.
    pub announce: bool,
}

impl CampaignConfig {
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            iterations: None,
            seed: None,
            stop_on_detect: false,
            progress_every: None,
            announce: true,
        }
    }

    /// Fill anything not already set from a run profile.
    pub fn merge_profile(&mut self, profile: &RunProfile) {
        if self.iterations.is_none() {
            self.iterations = profile.iterations;
        }
        if self.seed.is_none() {
            self.seed = profile.seed;
        }
        self.stop_on_detect |= profile.stop_on_detect;
        if self.progress_every.is_none() {
            self.progress_every = profile.progress_every;
        }
    }

    /// Runs with no iteration limit and no stop-on-detect never end on
    /// their own.
    pub fn is_unbounded(&self) -> bool {
        self.iterations.is_none() && !self.stop_on_detect
    }

    /// An unbounded run never reaches the point where a report is written,
    /// so asking for one is a usage error.
    pub fn check_report_target(&self, report: Option<&Path>) -> Result<()> {
        if let Some(path) = report {
            if self.is_unbounded() {
                bail!(
                    "report {} would never be written: set --iterations or --stop-on-detect",
                    path.display()
                );
            }
        }
        Ok(())
    }
}

pub struct Campaign {
    config: CampaignConfig,
    runner: Runner,
    tally: BTreeMap<String, u64>,
    iterations: u64,
    detections: u64,
    started_at: String,
    first_detection: Option<String>,
    last_detection: Option<String>,
    clock: Instant,
}

impl Campaign {
    pub fn new(config: CampaignConfig) -> Result<Self> {
        let runner = match config.seed {
            Some(seed) => Runner::with_seed(seed),
            None => Runner::new()?,
        };
        Ok(Self {
            config,
            runner,
            tally: BTreeMap::new(),
            iterations: 0,
            detections: 0,
            started_at: Utc::now().to_rfc3339(),
            first_detection: None,
            last_detection: None,
            clock: Instant::now(),
        })
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.runner.seed()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn detections(&self) -> u64 {
        self.detections
    }

    /// One race over cells of type `C`, folded into the tally.
    pub fn step<C: SharedCell>(&mut self) -> Result<Outcome> {
        let outcome = self.config.probe.run_once::<C>(&mut self.runner)?;
        self.iterations += 1;
        *self.tally.entry(outcome.signature()).or_insert(0) += 1;

        if outcome.detected {
            self.detections += 1;
            let now = Utc::now().to_rfc3339();
            if self.first_detection.is_none() {
                self.first_detection = Some(now.clone());
            }
            self.last_detection = Some(now);
            if self.config.announce {
                notify::detection(self.config.probe.detection_message());
            }
        }

        let progress_every = self.config.progress_every.filter(|&every| every > 0);
        if progress_every.is_some_and(|every| self.iterations % every == 0) {
            println!(
                "  {} iterations, {} detections ({:.1}s)",
                self.iterations,
                self.detections,
                self.clock.elapsed().as_secs_f64()
            );
        }

        Ok(outcome)
    }

    /// Race the real, unordered probe until the configured limit.
    pub fn run(&mut self) -> Result<CampaignReport> {
        self.run_with::<Racy>()
    }

    pub fn run_with<C: SharedCell>(&mut self) -> Result<CampaignReport> {
        loop {
            if let Some(limit) = self.config.iterations {
                if self.iterations >= limit {
                    break;
                }
            }
            let outcome = self.step::<C>()?;
            if outcome.detected && self.config.stop_on_detect {
                break;
            }
        }
        Ok(self.report())
    }

    /// Snapshot of everything seen so far, most frequent outcome first.
    pub fn report(&self) -> CampaignReport {
        let target = self.config.probe.target();
        let mut outcomes: Vec<OutcomeCount> = self
            .tally
            .iter()
            .map(|(outcome, count)| OutcomeCount {
                outcome: outcome.clone(),
                count: *count,
                target: outcome == target,
            })
            .collect();
        outcomes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.outcome.cmp(&b.outcome)));

        CampaignReport {
            probe: self.config.probe,
            seed: self.runner.seed(),
            iterations: self.iterations,
            detections: self.detections,
            target: target.to_string(),
            outcomes,
            started_at: self.started_at.clone(),
            first_detection: self.first_detection.clone(),
            last_detection: self.last_detection.clone(),
            duration: self.clock.elapsed(),
        }
    }
}
