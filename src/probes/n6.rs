// SPDX-License-Identifier: PMPL-1.0-or-later

//! Paul Loewenstein's n6, which shows x86 does not implement a total lock
//! order plus cache coherence.
//!
//! ```text
//! Proc 1        Proc 2
//!  x = 1         y = 1
//! r1 = x         x = 2
//! r2 = y
//! ```
//!
//! `r1 = 1, r2 = 0` with a final `x = 1`: Proc 1 read its own write early
//! from its store buffer, yet that write landed in memory after Proc 2's
//! `x = 2`.

use crate::memory::{ResultSlot, SharedCell, Value};
use crate::race::{Body, Runner};
use crate::types::{Outcome, Probe, Register};
use anyhow::Result;

pub fn detected(r1: Value, r2: Value, final_x: Value) -> bool {
    r1 == 1 && r2 == 0 && final_x == 1
}

pub fn run<C: SharedCell>(runner: &mut Runner) -> Result<Outcome> {
    let (x, y) = (C::default(), C::default());
    let (r1, r2) = (ResultSlot::new("r1"), ResultSlot::new("r2"));

    let bodies: Vec<Body<'_>> = vec![
        Box::new(|| {
            x.store(1);
            let own_x = x.load();
            let seen_y = y.load();
            r1.write(own_x);
            r2.write(seen_y);
        }),
        Box::new(|| {
            y.store(1);
            x.store(2);
        }),
    ];
    runner.run(bodies);

    // Only meaningful once the runner has joined both bodies.
    let final_x = x.load();

    let (r1, r2) = (r1.read()?, r2.read()?);
    Ok(Outcome {
        probe: Probe::N6,
        registers: vec![
            Register::new("r1", r1),
            Register::new("r2", r2),
            Register::new("x", final_x),
        ],
        detected: detected(r1, r2, final_x),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_all_three_conditions() {
        for r1 in 0..=2 {
            for r2 in 0..=1 {
                for x in 0..=2 {
                    assert_eq!(
                        detected(r1, r2, x),
                        (r1, r2, x) == (1, 0, 1),
                        "r1={} r2={} x={}",
                        r1,
                        r2,
                        x
                    );
                }
            }
        }
    }
}
