// SPDX-License-Identifier: PMPL-1.0-or-later

//! The litmus probes.
//!
//! Every probe follows the same shape: fresh zeroed variables, fresh result
//! slots, one race through the [`Runner`], then the detection predicate over
//! what the bodies reported. One call is one iteration; looping is up to the
//! caller.

pub mod buffered_writes;
pub mod iriw;
pub mod message_passing;
pub mod n6;
pub mod read_buffering;

use crate::memory::{Racy, SharedCell};
use crate::notify;
use crate::race::Runner;
use crate::types::{Outcome, Probe};
use anyhow::Result;
use std::cell::RefCell;

impl Probe {
    /// Run one iteration over cells of type `C`.
    pub fn run_once<C: SharedCell>(self, runner: &mut Runner) -> Result<Outcome> {
        match self {
            Probe::MessagePassing => message_passing::run::<C>(runner),
            Probe::BufferedWrites => buffered_writes::run::<C>(runner),
            Probe::Iriw => iriw::run::<C>(runner),
            Probe::N6 => n6::run::<C>(runner),
            Probe::ReadBuffering => read_buffering::run::<C>(runner),
        }
    }

    /// Line logged when the anomaly shows up.
    pub fn detection_message(&self) -> &'static str {
        match self {
            Probe::MessagePassing => "message passing detected!",
            Probe::BufferedWrites => "write buffering detected!",
            Probe::Iriw => "iriw: detected!",
            Probe::N6 => "n6: detected!",
            Probe::ReadBuffering => "read buffering detected!",
        }
    }

    /// Outcome signature that counts as a detection.
    pub fn target(&self) -> &'static str {
        match self {
            Probe::MessagePassing => "r1=1 r2=0",
            Probe::BufferedWrites => "r1=0 r2=0",
            Probe::Iriw => "r1=1 r2=0 r3=1 r4=0",
            Probe::N6 => "r1=1 r2=0 x=1",
            Probe::ReadBuffering => "r1=1 r2=1",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Probe::MessagePassing => "Probe for message passing.",
            Probe::BufferedWrites => "Probe for buffered writes.",
            Probe::Iriw => "Probe for independent reads of independent writes.",
            Probe::N6 => "Probe by Paul Loewenstein to show x86 violates TLO+CC memory model.",
            Probe::ReadBuffering => "Probe for read buffering.",
        }
    }

    /// Litmus table plus the outcome being hunted, as shown in `--help`.
    pub fn diagram(&self) -> &'static str {
        match self {
            Probe::MessagePassing => {
                "Proc 1        Proc 2\n\
                 x = 1         r1 = y\n\
                 y = 1         r2 = x\n\
                 \n\
                 Can we see?\n\
                 r1 = 1\n\
                 r2 = 0"
            }
            Probe::BufferedWrites => {
                "Proc 1        Proc 2\n \
                 x = 1         y = 1\n\
                 r1 = y        r2 = x\n\
                 \n\
                 Can we see?\n\
                 r1 = 0\n\
                 r2 = 0"
            }
            Probe::Iriw => {
                "Proc 1        Proc 2        Proc 3        Proc 4\n\
                 x = 1         y = 1         r1 = x        r3 = y\n                            \
                 r2 = y        r4 = x\n\
                 \n\
                 Can we see?\n\
                 r1 = 1\n\
                 r2 = 0\n\
                 r3 = 1\n\
                 r4 = 0"
            }
            Probe::N6 => {
                "Proc 1        Proc 2\n \
                 x = 1         y = 1\n\
                 r1 = x        x = 2\n\
                 r2 = y\n\
                 \n\
                 Can we see?\n\
                 r1 = 1\n\
                 r2 = 0\n \
                 x = 1"
            }
            Probe::ReadBuffering => {
                "Proc 1        Proc 2\n\
                 r1 = x        r2 = y\n \
                 y = 1         x = 1\n\
                 \n\
                 Can we see?\n\
                 r1 = 1\n\
                 r2 = 1"
            }
        }
    }
}

thread_local! {
    static RUNNER: RefCell<Option<Runner>> = const { RefCell::new(None) };
}

/// Run one racy iteration of `probe` on this thread's runner and log a
/// detection line if the anomaly appeared.
pub fn execute(probe: Probe) -> Result<()> {
    let outcome = RUNNER.with(|slot| -> Result<Outcome> {
        let mut slot = slot.borrow_mut();
        let runner = match slot.take() {
            Some(runner) => runner,
            None => Runner::new()?,
        };
        let runner = slot.insert(runner);
        probe.run_once::<Racy>(runner)
    })?;

    if outcome.detected {
        notify::detection(probe.detection_message());
    }
    Ok(())
}

pub fn message_passing() -> Result<()> {
    execute(Probe::MessagePassing)
}

pub fn buffered_writes() -> Result<()> {
    execute(Probe::BufferedWrites)
}

pub fn iriw() -> Result<()> {
    execute(Probe::Iriw)
}

pub fn n6() -> Result<()> {
    execute(Probe::N6)
}

pub fn read_buffering() -> Result<()> {
    execute(Probe::ReadBuffering)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Serialized;

    #[test]
    fn test_target_matches_predicate() {
        let mut runner = Runner::with_seed(11);
        for probe in Probe::all() {
            for _ in 0..200 {
                let outcome = probe.run_once::<Racy>(&mut runner).expect("iteration");
                assert_eq!(outcome.probe, probe);
                assert_eq!(outcome.detected, outcome.signature() == probe.target());
            }
        }
    }

    #[test]
    fn test_serialized_cells_never_detect() {
        let mut runner = Runner::with_seed(12);
        for probe in Probe::all() {
            for _ in 0..500 {
                let outcome = probe.run_once::<Serialized>(&mut runner).expect("iteration");
                assert!(!outcome.detected, "{} fired under locking: {}", probe, outcome.signature());
            }
        }
    }

    #[test]
    fn test_entry_points_complete() {
        message_passing().expect("mp");
        buffered_writes().expect("bw");
        iriw().expect("iriw");
        n6().expect("n6");
        read_buffering().expect("rb");
    }

    #[test]
    fn test_diagrams_show_target_question() {
        for probe in Probe::all() {
            assert!(probe.diagram().contains("Can we see?"));
            assert!(!probe.description().is_empty());
        }
    }
}
