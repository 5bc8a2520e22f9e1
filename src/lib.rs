// SPDX-License-Identifier: PMPL-1.0-or-later

//! probe-memory-model — empirical memory-model litmus testing.
//!
//! Races a handful of threads against shared variables that carry no
//! ordering guarantees and watches for the outcomes that classic litmus
//! tests use to tell memory models apart.
//!
//! ENGINE PILLARS:
//! 1. **Race**: a barrier-synchronized runner that launches bodies in a
//!    shuffled order and releases them together.
//! 2. **Probes**: message passing, store buffering, IRIW, n6 and load
//!    buffering, each with its detection predicate.
//! 3. **Campaign**: repeats a probe, tallies outcomes and reports them.

pub mod campaign;
pub mod memory;
pub mod notify;
pub mod probes;
pub mod race;
pub mod report;
pub mod types;
