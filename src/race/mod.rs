// SPDX-License-Identifier: PMPL-1.0-or-later

//! Barrier-synchronized race runner.
//!
//! Every body gets its own OS thread. Threads are spawned in a shuffled
//! order, each one parks on a shared start-line barrier, and all of them are
//! released together once the last has arrived. The caller regains control
//! only after every thread has been joined, so anything a body wrote
//! happens-before whatever the caller reads next.
//!
//! Without the start line a body could finish before its siblings were even
//! scheduled and the race would never happen.

pub mod rng;

pub use rng::XorShift64;

use anyhow::Result;
use std::sync::{Barrier, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// One "processor" of a litmus test.
pub type Body<'a> = Box<dyn FnOnce() + Send + 'a>;

pub struct Runner {
    seed: u64,
    rng: XorShift64,
}

impl Runner {
    /// Runner seeded from OS entropy.
    pub fn new() -> Result<Self> {
        Ok(Self::with_seed(rng::entropy_seed()?))
    }

    /// Runner with a fixed shuffle seed, for reproducible launch orders.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: XorShift64::new(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next launch order for `n` bodies.
    pub fn launch_order(&mut self, n: usize) -> Vec<usize> {
        self.rng.permutation(n)
    }

    /// Race `bodies` against each other and return once all have finished.
    pub fn run(&mut self, bodies: Vec<Body<'_>>) {
        let order = self.launch_order(bodies.len());
        race(&order, bodies, None);
    }

    /// Same as [`Runner::run`] but records when each body reached the start
    /// line and when it was let go.
    pub fn run_timed(&mut self, bodies: Vec<Body<'_>>) -> RaceTiming {
        let order = self.launch_order(bodies.len());
        let stamps: Vec<Stamp> = (0..bodies.len()).map(|_| Stamp::default()).collect();

        let launched = Instant::now();
        race(&order, bodies, Some(stamps.as_slice()));
        let finished = Instant::now();

        RaceTiming {
            order,
            arrivals: stamps.iter().filter_map(|s| s.arrived.get().copied()).collect(),
            starts: stamps.iter().filter_map(|s| s.started.get().copied()).collect(),
            launched,
            finished,
        }
    }
}

#[derive(Default)]
struct Stamp {
    arrived: OnceLock<Instant>,
    started: OnceLock<Instant>,
}

fn race(order: &[usize], bodies: Vec<Body<'_>>, stamps: Option<&[Stamp]>) {
    let parties = bodies.len();
    if parties == 0 {
        return;
    }

    let start_line = Barrier::new(parties);
    let mut bodies: Vec<Option<Body<'_>>> = bodies.into_iter().map(Some).collect();

    // Leaving the scope joins every thread: that join is the completion barrier.
    thread::scope(|scope| {
        for &index in order {
            let Some(body) = bodies[index].take() else {
                continue;
            };
            let start_line = &start_line;
            let stamp = stamps.map(|stamps| &stamps[index]);
            scope.spawn(move || {
                if let Some(stamp) = stamp {
                    let _ = stamp.arrived.set(Instant::now());
                }
                start_line.wait();
                if let Some(stamp) = stamp {
                    let _ = stamp.started.set(Instant::now());
                }
                body();
            });
        }
    });
}

/// Timestamps captured by [`Runner::run_timed`], indexed by body.
#[derive(Debug, Clone)]
pub struct RaceTiming {
    /// Launch order that was used.
    pub order: Vec<usize>,
    pub arrivals: Vec<Instant>,
    pub starts: Vec<Instant>,
    pub launched: Instant,
    pub finished: Instant,
}

impl RaceTiming {
    /// When the last body reached the start line.
    pub fn release(&self) -> Option<Instant> {
        self.arrivals.iter().max().copied()
    }

    /// Spread between the first and last body leaving the start line.
    pub fn start_skew(&self) -> Duration {
        match (self.starts.iter().min(), self.starts.iter().max()) {
            (Some(first), Some(last)) => last.saturating_duration_since(*first),
            _ => Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.finished.saturating_duration_since(self.launched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_every_body_runs_once() {
        let hits: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(0)).collect();
        let mut runner = Runner::with_seed(1);
        let bodies: Vec<Body<'_>> = hits
            .iter()
            .map(|hit| {
                Box::new(move || {
                    hit.fetch_add(1, Ordering::SeqCst);
                }) as Body<'_>
            })
            .collect();
        runner.run(bodies);
        for hit in &hits {
            assert_eq!(hit.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_empty_race_returns() {
        let mut runner = Runner::with_seed(1);
        runner.run(Vec::new());
        let timing = runner.run_timed(Vec::new());
        assert!(timing.release().is_none());
        assert_eq!(timing.start_skew(), Duration::ZERO);
    }

    #[test]
    fn test_launch_order_is_seeded() {
        let mut a = Runner::with_seed(99);
        let mut b = Runner::with_seed(99);
        assert_eq!(a.seed(), 99);
        for _ in 0..16 {
            assert_eq!(a.launch_order(4), b.launch_order(4));
        }
    }

    #[test]
    fn test_no_body_starts_before_all_arrive() {
        let mut runner = Runner::with_seed(5);
        for _ in 0..200 {
            let bodies: Vec<Body<'_>> = (0..3).map(|_| Box::new(|| {}) as Body<'_>).collect();
            let timing = runner.run_timed(bodies);
            let release = timing.release().expect("bodies arrived");
            assert_eq!(timing.starts.len(), 3);
            assert!(timing.starts.iter().all(|start| *start >= release));
            assert!(timing.finished >= release);
            assert!(timing.elapsed() >= timing.start_skew());

            let mut order = timing.order.clone();
            order.sort_unstable();
            assert_eq!(order, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_writes_visible_after_run() {
        let seen = Mutex::new(Vec::new());
        let mut runner = Runner::with_seed(3);
        let bodies: Vec<Body<'_>> = vec![
            Box::new(|| seen.lock().expect("seen lock").push('a')),
            Box::new(|| seen.lock().expect("seen lock").push('b')),
        ];
        runner.run(bodies);
        let mut seen = seen.into_inner().expect("seen lock");
        seen.sort_unstable();
        assert_eq!(seen, vec!['a', 'b']);
    }
}
