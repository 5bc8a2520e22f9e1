// SPDX-License-Identifier: PMPL-1.0-or-later

//! Store buffering.
//!
//! ```text
//! Proc 1        Proc 2
//!  x = 1         y = 1
//! r1 = y        r2 = x
//! ```
//!
//! `r1 = 0, r2 = 0` means both writes were still sitting in per-core write
//! buffers when the other side read.

use crate::memory::{ResultSlot, SharedCell, Value};
use crate::race::{Body, Runner};
use crate::types::{Outcome, Probe, Register};
use anyhow::Result;

pub fn detected(r1: Value, r2: Value) -> bool {
    r1 == 0 && r2 == 0
}

pub fn run<C: SharedCell>(runner: &mut Runner) -> Result<Outcome> {
    let (x, y) = (C::default(), C::default());
    let (r1, r2) = (ResultSlot::new("r1"), ResultSlot::new("r2"));

    let bodies: Vec<Body<'_>> = vec![
        Box::new(|| {
            x.store(1);
            let seen_y = y.load();
            r1.write(seen_y);
        }),
        Box::new(|| {
            y.store(1);
            let seen_x = x.load();
            r2.write(seen_x);
        }),
    ];
    runner.run(bodies);

    let (r1, r2) = (r1.read()?, r2.read()?);
    Ok(Outcome {
        probe: Probe::BufferedWrites,
        registers: vec![Register::new("r1", r1), Register::new("r2", r2)],
        detected: detected(r1, r2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_both_miss() {
        assert!(detected(0, 0));
        assert!(!detected(0, 1));
        assert!(!detected(1, 0));
        assert!(!detected(1, 1));
    }
}
