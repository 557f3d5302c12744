//! Shared best-so-far tracking across concurrent searches.
//!
//! A [`ProgressTracker`] is the only state shared between a search and the
//! copies produced by its `split` method. It keeps a single best
//! solution-cost pair and accepts a proposal only when it is strictly
//! better than the current record. The tracker also carries the cooperative
//! stop flag checked by every search loop between iterations.

use crate::problem::{Cost, SolutionCostPair};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Record<T, C> {
    best: Option<SolutionCostPair<T, C>>,
    time_to_best: Duration,
}

/// Thread-safe record of the best solution found by one or more searches.
///
/// # Examples
///
/// ```
/// use u_evosearch::ProgressTracker;
///
/// let tracker = ProgressTracker::<Vec<usize>, i32>::new();
/// assert!(tracker.update(10, &vec![1, 0], false));
/// assert!(!tracker.update(12, &vec![0, 1], false));
/// assert_eq!(tracker.cost(), 10);
/// ```
#[derive(Debug)]
pub struct ProgressTracker<T, C> {
    record: Mutex<Record<T, C>>,
    found_best: AtomicBool,
    stopped: AtomicBool,
    started_at: Instant,
}

impl<T, C: Cost> Default for ProgressTracker<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Cost> ProgressTracker<T, C> {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(Record {
                best: None,
                time_to_best: Duration::ZERO,
            }),
            found_best: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            started_at: Instant::now(),
        }
    }

    /// Creates a tracker ready to be shared between searches.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, Record<T, C>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Proposes a new best solution.
    ///
    /// The solution is cloned and recorded only if `cost` is strictly lower
    /// than the recorded cost (or nothing has been recorded yet). When
    /// `is_min_cost` is true and the proposal is accepted, the tracker also
    /// remembers that a provably optimal solution was found.
    ///
    /// Returns whether the proposal was accepted.
    pub fn update(&self, cost: C, solution: &T, is_min_cost: bool) -> bool
    where
        T: Clone,
    {
        let mut record = self.lock();
        let accept = match &record.best {
            Some(best) => cost < best.cost(),
            None => true,
        };
        if accept {
            record.best = Some(SolutionCostPair::new(solution.clone(), cost));
            record.time_to_best = self.started_at.elapsed();
            if is_min_cost {
                self.found_best.store(true, Ordering::Release);
            }
            tracing::debug!(cost = cost.to_f64(), "progress tracker accepted new best");
        }
        accept
    }

    /// Proposes an owned solution-cost pair; see [`update`](Self::update).
    pub fn update_pair(&self, pair: SolutionCostPair<T, C>, is_min_cost: bool) -> bool {
        let mut record = self.lock();
        let accept = match &record.best {
            Some(best) => pair.is_better_than(best),
            None => true,
        };
        if accept {
            record.best = Some(pair);
            record.time_to_best = self.started_at.elapsed();
            if is_min_cost {
                self.found_best.store(true, Ordering::Release);
            }
        }
        accept
    }

    /// A consistent snapshot of the best pair recorded so far.
    pub fn best(&self) -> Option<SolutionCostPair<T, C>>
    where
        T: Clone,
    {
        self.lock().best.clone()
    }

    /// Clone of the best solution recorded so far.
    pub fn solution(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().best.as_ref().map(|p| p.solution().clone())
    }

    /// Cost of the best solution, or [`Cost::worst`] if none was recorded.
    pub fn cost(&self) -> C {
        self.lock()
            .best
            .as_ref()
            .map_or_else(C::worst, SolutionCostPair::cost)
    }

    pub fn cost_f64(&self) -> f64 {
        self.cost().to_f64()
    }

    /// Whether a solution with the problem's minimum cost has been recorded.
    pub fn did_find_best(&self) -> bool {
        self.found_best.load(Ordering::Acquire)
    }

    /// Asks every search sharing this tracker to stop at its next check.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Clears a previous [`stop`](Self::stop) request.
    pub fn start(&self) {
        self.stopped.store(false, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Time since the tracker was created.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Time from creation until the current best was recorded.
    pub fn time_to_best(&self) -> Duration {
        self.lock().time_to_best
    }
}
