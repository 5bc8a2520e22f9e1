// SPDX-License-Identifier: PMPL-1.0-or-later

//! Message passing.
//!
//! ```text
//! Proc 1        Proc 2
//! x = 1         r1 = y
//! y = 1         r2 = x
//! ```
//!
//! Seeing `r1 = 1, r2 = 0` means the second write became visible before the
//! first one.

use crate::memory::{ResultSlot, SharedCell, Value};
use crate::race::{Body, Runner};
use crate::types::{Outcome, Probe, Register};
use anyhow::Result;

pub fn detected(r1: Value, r2: Value) -> bool {
    r1 == 1 && r2 == 0
}

pub fn run<C: SharedCell>(runner: &mut Runner) -> Result<Outcome> {
    let (x, y) = (C::default(), C::default());
    let (r1, r2) = (ResultSlot::new("r1"), ResultSlot::new("r2"));

    let bodies: Vec<Body<'_>> = vec![
        Box::new(|| {
            x.store(1);
            y.store(1);
        }),
        Box::new(|| {
            let seen_y = y.load();
            let seen_x = x.load();
            r1.write(seen_y);
            r2.write(seen_x);
        }),
    ];
    runner.run(bodies);

    let (r1, r2) = (r1.read()?, r2.read()?);
    Ok(Outcome {
        probe: Probe::MessagePassing,
        registers: vec![Register::new("r1", r1), Register::new("r2", r2)],
        detected: detected(r1, r2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_one_zero_fires() {
        for r1 in 0..=1 {
            for r2 in 0..=1 {
                assert_eq!(detected(r1, r2), (r1, r2) == (1, 0), "r1={} r2={}", r1, r2);
            }
        }
    }
}
