// SPDX-License-Identifier: PMPL-1.0-or-later

//! Load buffering.
//!
//! ```text
//! Proc 1        Proc 2
//! r1 = x        r2 = y
//!  y = 1         x = 1
//! ```
//!
//! `r1 = 1, r2 = 1` means each read saw a write that comes after the other
//! side's read in program order.

use crate::memory::{ResultSlot, SharedCell, Value};
use crate::race::{Body, Runner};
use crate::types::{Outcome, Probe, Register};
use anyhow::Result;

pub fn detected(r1: Value, r2: Value) -> bool {
    r1 == 1 && r2 == 1
}

pub fn run<C: SharedCell>(runner: &mut Runner) -> Result<Outcome> {
    let (x, y) = (C::default(), C::default());
    let (r1, r2) = (ResultSlot::new("r1"), ResultSlot::new("r2"));

    let bodies: Vec<Body<'_>> = vec![
        Box::new(|| {
            let seen_x = x.load();
            y.store(1);
            r1.write(seen_x);
        }),
        Box::new(|| {
            let seen_y = y.load();
            x.store(1);
            r2.write(seen_y);
        }),
    ];
    runner.run(bodies);

    let (r1, r2) = (r1.read()?, r2.read()?);
    Ok(Outcome {
        probe: Probe::ReadBuffering,
        registers: vec![Register::new("r1", r1), Register::new("r2", r2)],
        detected: detected(r1, r2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_both_see_later_writes() {
        assert!(detected(1, 1));
        assert!(!detected(0, 0));
        assert!(!detected(0, 1));
        assert!(!detected(1, 0));
    }
}
