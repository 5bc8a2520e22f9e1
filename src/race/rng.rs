// SPDX-License-Identifier: PMPL-1.0-or-later

//! Small deterministic PRNG used to shuffle launch order.
//!
//! XorShift64 is plenty for permuting a handful of thread indices. The
//! generator is instance-scoped so tests can pin a seed; production runners
//! seed it from OS entropy.

use anyhow::{anyhow, Result};

#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a generator from `seed`. Seed 0 is remapped to avoid the
    /// all-zero lockup state.
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, upper)` via Lemire's multiply-high reduction.
    pub fn next_usize(&mut self, upper: usize) -> usize {
        debug_assert!(upper > 0, "upper bound must be > 0");
        let upper = upper as u64;
        let threshold = upper.wrapping_neg() % upper;
        loop {
            let m = (self.next_u64() as u128) * (upper as u128);
            if (m as u64) >= threshold {
                return (m >> 64) as usize;
            }
        }
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }

    /// A uniformly random permutation of `0..n`.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        self.shuffle(&mut order);
        order
    }
}

/// Draw a 64-bit seed from the OS.
pub fn entropy_seed() -> Result<u64> {
    let mut buf = [0_u8; 8];
    getrandom::getrandom(&mut buf)
        .map_err(|err| anyhow!("seeding runner from OS entropy: {}", err))?;
    Ok(u64::from_le_bytes(buf))
}
