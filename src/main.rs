// SPDX-License-Identifier: PMPL-1.0-or-later

//! probe-memory-model: run memory-model litmus probes
//!
//! Implements a few of the probes discussed in Russ Cox's "Hardware Memory
//! Models". Every variable starts at zero in every iteration.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use probe_memory_model::campaign::{Campaign, CampaignConfig, RunProfile};
use probe_memory_model::report;
use probe_memory_model::types::Probe;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "probe-memory-model")]
#[command(version)]
#[command(about = "A tool for running various memory model probes.")]
#[command(
    long_about = "This is a tool which implements a few of the memory model probes\n\
                  discussed in Russ Cox's \"Hardware Memory Models\" blog post.\n\n\
                  Note that variables are initialized to zero in all probes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe for message passing.
    #[command(long_about = long_help(Probe::MessagePassing))]
    Mp(RunArgs),

    /// Probe for buffered writes.
    #[command(long_about = long_help(Probe::BufferedWrites))]
    Bw(RunArgs),

    /// Probe for independent reads of independent writes.
    #[command(long_about = long_help(Probe::Iriw))]
    Iriw(RunArgs),

    /// Probe by Paul Loewenstein to show x86 violates TLO+CC memory model.
    #[command(long_about = long_help(Probe::N6))]
    N6(RunArgs),

    /// Probe for read buffering.
    #[command(long_about = long_help(Probe::ReadBuffering))]
    Rb(RunArgs),

    /// Run a probe chosen by name (or by the profile's `probe` field)
    Run {
        /// Probe to run
        #[arg(value_name = "PROBE", value_enum)]
        probe: Option<ProbeArg>,

        #[command(flatten)]
        args: RunArgs,
    },

    /// List the available probes
    List,
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Stop after this many iterations (default: run forever)
    #[arg(short = 'n', long)]
    iterations: Option<u64>,

    /// Seed for the launch-order shuffle (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop at the first detection
    #[arg(long)]
    stop_on_detect: bool,

    /// Print progress every N iterations
    #[arg(long, value_name = "N")]
    progress_every: Option<u64>,

    /// Write a JSON or YAML campaign report to this file
    #[arg(short = 'o', long)]
    report: Option<PathBuf>,

    /// Load settings from a JSON or YAML run profile
    #[arg(short, long)]
    profile: Option<PathBuf>,
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProbeArg {
    Mp,
    Bw,
    Iriw,
    N6,
    Rb,
}

impl From<ProbeArg> for Probe {
    fn from(arg: ProbeArg) -> Self {
        match arg {
            ProbeArg::Mp => Probe::MessagePassing,
            ProbeArg::Bw => Probe::BufferedWrites,
            ProbeArg::Iriw => Probe::Iriw,
            ProbeArg::N6 => Probe::N6,
            ProbeArg::Rb => Probe::ReadBuffering,
        }
    }
}

fn long_help(probe: Probe) -> String {
    let intro = match probe {
        Probe::MessagePassing => {
            "This probe runs the following test to determine whether message passing is happening:"
        }
        Probe::BufferedWrites => {
            "This probe runs the following test to determine whether writes are buffered in a queue:"
        }
        Probe::Iriw => {
            "This probe runs the following test to determine whether independent reads occur for independent writes:"
        }
        Probe::N6 => {
            "This probe runs the following test to determine whether memory write queues:"
        }
        Probe::ReadBuffering => {
            "This probe runs the following test to determine whether read buffering can happen:"
        }
    };
    format!("{}\n\n{}\n", intro, probe.diagram())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mp(args) => run_probe(Some(Probe::MessagePassing), args),
        Commands::Bw(args) => run_probe(Some(Probe::BufferedWrites), args),
        Commands::Iriw(args) => run_probe(Some(Probe::Iriw), args),
        Commands::N6(args) => run_probe(Some(Probe::N6), args),
        Commands::Rb(args) => run_probe(Some(Probe::ReadBuffering), args),
        Commands::Run { probe, args } => run_probe(probe.map(Probe::from), args),
        Commands::List => {
            for probe in Probe::all() {
                println!("{:<6} {}", probe.name().bold(), probe.description());
                println!("       target: {}", probe.target());
            }
            Ok(())
        }
    }
}

fn run_probe(probe: Option<Probe>, args: RunArgs) -> Result<()> {
    let profile = match &args.profile {
        Some(path) => RunProfile::load(path)?,
        None => RunProfile::default(),
    };

    let probe = probe
        .or(profile.probe)
        .ok_or_else(|| anyhow!("no probe given on the command line or in the profile"))?;

    let mut config = CampaignConfig::new(probe);
    config.iterations = args.iterations;
    config.seed = args.seed;
    config.stop_on_detect = args.stop_on_detect;
    config.progress_every = args.progress_every;
    config.merge_profile(&profile);

    let report_path = args.report.or(profile.report);
    config.check_report_target(report_path.as_deref())?;

    let mut campaign = Campaign::new(config)?;
    println!(
        "Probing {} ({}), seed {}",
        probe.name(),
        probe.description(),
        campaign.seed()
    );
    if campaign.config().iterations.is_none() {
        println!("Running until interrupted.");
    }

    let result = campaign.run()?;
    report::print_report(&result);

    if let Some(path) = report_path {
        report::save_report(&result, path)?;
    }

    Ok(())
}
