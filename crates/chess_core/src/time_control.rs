//! Search limits handed to a strongest-move oracle.
//!
//! A limit is either a ply depth or a wall-clock budget (or both). The
//! budget bounds how long an oracle *should* think; it is not a cancellation
//! contract, an oracle that ignores it stalls its caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Depth and/or time budget for one oracle query.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum search depth in plies (half-moves)
    pub depth: u8,
    /// Maximum time allowed for this move (None = no time budget)
    pub move_time: Option<Duration>,
    /// Clock shared with the searcher so it can stop itself
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Depth-limited query, e.g. `depth(5)` for a 5-ply search.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
            time_control: TimeControl::new(None),
        }
    }

    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Time-limited query with unbounded depth.
    pub fn time(move_time: Duration) -> Self {
        Self {
            depth: u8::MAX,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// True when depth is the only budget.
    pub fn is_depth_only(&self) -> bool {
        self.move_time.is_none()
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    pub fn start(&self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Stop flag plus start instant, cloneable across a searcher's threads.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    start_time: Arc<Mutex<Option<Instant>>>,
    time_limit: Option<Duration>,
    /// Clock reads happen once per this many nodes.
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(Mutex::new(None)),
            time_limit,
            check_interval: 1024,
        }
    }

    pub fn start(&self) {
        *self.start_guard() = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Reads the clock and raises the stop flag once the budget is spent.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.time_limit
            && let Some(start) = *self.start_guard()
            && start.elapsed() >= limit
        {
            self.stop();
            return true;
        }

        false
    }

    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(self.check_interval)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_guard()
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Remaining budget; `None` when there is no time limit.
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    fn start_guard(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.start_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
