// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared variables and result slots for litmus bodies.
//!
//! ```text
//!  !!! DO NOT "FIX" `Racy` BY ADDING LOCKS, FENCES OR STRONGER ORDERINGS !!!
//! ```
//!
//! The probes exist to observe what the compiler and CPU do when nothing
//! orders the accesses. `Racy` is the closest Rust gets to a plain,
//! unsynchronized variable: every access is a `Relaxed` atomic, which lowers
//! to an ordinary load or store on mainstream hardware and promises nothing
//! about ordering with respect to other locations. (A genuine data race on a
//! non-atomic is undefined behavior, so a raw `static mut` is not an option.)
//! Upgrading any access to `Acquire`/`Release`/`SeqCst`, or wrapping the
//! value in a `Mutex`, makes the anomalies impossible and every probe
//! silently useless.
//!
//! `Serialized` is the opposite: a lock around every access. It exists so the
//! harness itself can be checked under sequential consistency.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Values held by shared variables and registers.
pub type Value = usize;

/// A shared variable of a litmus test. `Default` must read as zero.
pub trait SharedCell: Default + Sync {
    fn load(&self) -> Value;
    fn store(&self, value: Value);
}

/// Unordered shared variable used by the real probes.
#[derive(Debug, Default)]
pub struct Racy(AtomicUsize);

impl SharedCell for Racy {
    #[inline(always)]
    fn load(&self) -> Value {
        self.0.load(Ordering::Relaxed)
    }

    #[inline(always)]
    fn store(&self, value: Value) {
        self.0.store(value, Ordering::Relaxed)
    }
}

/// Shared variable with a lock around every access. Each cell is then
/// linearizable, so a whole probe over `Serialized` cells is sequentially
/// consistent and can never show a reordering.
#[derive(Debug, Default)]
pub struct Serialized(Mutex<Value>);

impl SharedCell for Serialized {
    fn load(&self) -> Value {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, value: Value) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// Write-once register a body uses to hand an observed value back to the
/// orchestrator. Read only after the runner has joined every body.
#[derive(Debug)]
pub struct ResultSlot {
    name: &'static str,
    value: OnceLock<Value>,
}

impl ResultSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: OnceLock::new(),
        }
    }

    /// Record the observed value. Each slot is written exactly once; a
    /// second write trips a debug assertion and is otherwise ignored.
    pub fn write(&self, value: Value) {
        let first = self.value.set(value).is_ok();
        debug_assert!(first, "register {} written twice", self.name);
    }

    pub fn read(&self) -> Result<Value> {
        self.value
            .get()
            .copied()
            .ok_or_else(|| anyhow!("register {} read before any body wrote it", self.name))
    }
}
