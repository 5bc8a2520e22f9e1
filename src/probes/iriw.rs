// SPDX-License-Identifier: PMPL-1.0-or-later

//! Independent reads of independent writes.
//!
//! ```text
//! Proc 1    Proc 2    Proc 3     Proc 4
//! x = 1     y = 1     r1 = x     r3 = y
//!                     r2 = y     r4 = x
//! ```
//!
//! `r1 = 1, r2 = 0, r3 = 1, r4 = 0` means the two observers disagree about
//! which write happened first: there is no single global store order.

use crate::memory::{ResultSlot, SharedCell, Value};
use crate::race::{Body, Runner};
use crate::types::{Outcome, Probe, Register};
use anyhow::Result;

pub fn detected(r1: Value, r2: Value, r3: Value, r4: Value) -> bool {
    r1 == 1 && r2 == 0 && r3 == 1 && r4 == 0
}

pub fn run<C: SharedCell>(runner: &mut Runner) -> Result<Outcome> {
    let (x, y) = (C::default(), C::default());
    let (r1, r2) = (ResultSlot::new("r1"), ResultSlot::new("r2"));
    let (r3, r4) = (ResultSlot::new("r3"), ResultSlot::new("r4"));

    let bodies: Vec<Body<'_>> = vec![
        Box::new(|| x.store(1)),
        Box::new(|| y.store(1)),
        Box::new(|| {
            let seen_x = x.load();
            let seen_y = y.load();
            r1.write(seen_x);
            r2.write(seen_y);
        }),
        Box::new(|| {
            let seen_y = y.load();
            let seen_x = x.load();
            r3.write(seen_y);
            r4.write(seen_x);
        }),
    ];
    runner.run(bodies);

    let (r1, r2, r3, r4) = (r1.read()?, r2.read()?, r3.read()?, r4.read()?);
    Ok(Outcome {
        probe: Probe::Iriw,
        registers: vec![
            Register::new("r1", r1),
            Register::new("r2", r2),
            Register::new("r3", r3),
            Register::new("r4", r4),
        ],
        detected: detected(r1, r2, r3, r4),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_opposite_orders_fire() {
        let mut hits = Vec::new();
        for bits in 0..16_usize {
            let (r1, r2, r3, r4) = ((bits >> 3) & 1, (bits >> 2) & 1, (bits >> 1) & 1, bits & 1);
            if detected(r1, r2, r3, r4) {
                hits.push((r1, r2, r3, r4));
            }
        }
        assert_eq!(hits, vec![(1, 0, 1, 0)]);
    }
}
