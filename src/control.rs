//! Shared control state
//!
//! The generator loop reads the state once per tick while the console mutates
//! it from the main thread. All three fields live behind one mutex so a tick
//! always sees a consistent snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// `faster` only acts above this interval and subtracts exactly this much.
pub const FASTER_STEP: Duration = Duration::from_millis(5000);
/// `slower` adds exactly this much.
pub const SLOWER_STEP: Duration = Duration::from_millis(10000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub interval: Duration,
    pub paused: bool,
    /// Unvalidated; only 0, 1 and 2 select a tier.
    pub verbosity_level: i32,
}

impl ControlState {
    pub fn new(interval: Duration, verbosity_level: i32) -> Self {
        Self {
            interval,
            paused: false,
            verbosity_level,
        }
    }

    /// Shorten the interval by [`FASTER_STEP`] if it is strictly above it.
    /// Returns the new interval, or `None` when nothing changed.
    pub fn faster(&mut self) -> Option<Duration> {
        if self.interval > FASTER_STEP {
            self.interval -= FASTER_STEP;
            Some(self.interval)
        } else {
            None
        }
    }

    /// Lengthen the interval by [`SLOWER_STEP`].
    pub fn slower(&mut self) -> Duration {
        self.interval = self.interval.saturating_add(SLOWER_STEP);
        self.interval
    }
}

/// Thread-safe handle to the control state
#[derive(Debug, Clone)]
pub struct ControlHandle {
    inner: Arc<Mutex<ControlState>>,
}

impl ControlHandle {
    pub fn new(state: ControlState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    // The state is plain data, a panic mid-update cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ControlState {
        *self.lock()
    }

    pub fn faster(&self) -> Option<Duration> {
        let changed = self.lock().faster();
        match changed {
            Some(interval) => info!(
                interval_ms = interval.as_millis() as u64,
                "Interval decreased"
            ),
            None => debug!("Interval already at or below the faster step, unchanged"),
        }
        changed
    }

    pub fn slower(&self) -> Duration {
        let interval = self.lock().slower();
        info!(interval_ms = interval.as_millis() as u64, "Interval increased");
        interval
    }

    pub fn set_interval(&self, interval: Duration) {
        self.lock().interval = interval;
        info!(interval_ms = interval.as_millis() as u64, "Interval set");
    }

    pub fn pause(&self) {
        self.lock().paused = true;
        info!("Generator paused");
    }

    pub fn resume(&self) {
        self.lock().paused = false;
        info!("Generator resumed");
    }

    pub fn set_verbosity_level(&self, level: i32) {
        self.lock().verbosity_level = level;
        info!(verbosity_level = level, "Verbosity level set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_ms(ms: u64) -> ControlState {
        ControlState::new(Duration::from_millis(ms), 1)
    }

    #[test]
    fn test_faster_subtracts_step_above_threshold() {
        for ms in [5001, 6000, 10_000, 24_000, 1_000_000] {
            let mut state = state_ms(ms);
            assert_eq!(state.faster(), Some(Duration::from_millis(ms - 5000)));
            assert_eq!(state.interval, Duration::from_millis(ms - 5000));
        }
    }

    #[test]
    fn test_faster_is_noop_at_or_below_threshold() {
        for ms in [1, 1000, 4000, 5000] {
            let mut state = state_ms(ms);
            assert_eq!(state.faster(), None);
            assert_eq!(state.interval, Duration::from_millis(ms));
        }
    }

    #[test]
    fn test_repeated_faster_never_reaches_zero() {
        let mut state = state_ms(23_000);
        for _ in 0..10 {
            state.faster();
        }
        assert_eq!(state.interval, Duration::from_millis(3000));
    }

    #[test]
    fn test_slower_adds_step() {
        for ms in [1, 4000, 5000, 60_000] {
            let mut state = state_ms(ms);
            assert_eq!(state.slower(), Duration::from_millis(ms + 10_000));
        }
    }

    #[test]
    fn test_initial_4000ms_scenario() {
        let handle = ControlHandle::new(state_ms(4000));

        assert_eq!(handle.faster(), None);
        assert_eq!(handle.snapshot().interval, Duration::from_millis(4000));

        handle.slower();
        handle.slower();
        assert_eq!(handle.snapshot().interval, Duration::from_millis(24_000));
    }

    #[test]
    fn test_pause_resume_and_level() {
        let handle = ControlHandle::new(state_ms(4000));
        let other = handle.clone();

        other.pause();
        assert!(handle.snapshot().paused);
        other.resume();
        assert!(!handle.snapshot().paused);

        // out-of-range levels are stored as-is
        other.set_verbosity_level(7);
        assert_eq!(handle.snapshot().verbosity_level, 7);
        other.set_verbosity_level(0);
        assert_eq!(handle.snapshot().verbosity_level, 0);
    }

    #[test]
    fn test_handle_shared_across_threads() {
        let handle = ControlHandle::new(state_ms(4000));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        handle.slower();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(
            handle.snapshot().interval,
            Duration::from_millis(4000 + 100 * 10_000)
        );
    }
}
