//! Cancellable fixed-interval repetition
//!
//! Both the live dashboard refresh and run-status polling are a body run
//! every `interval` until it reports completion, a deadline passes, or the
//! user interrupts. [`RepeatingTask`] owns that loop so neither caller
//! juggles sleeps and flags itself.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Longest single sleep; bounds how late a cancellation is noticed
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Shared interruption flag, set from a signal handler
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a [`RepeatingTask`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Completed(T),
    TimedOut,
    Cancelled,
}

/// Runs a body at a fixed interval
#[derive(Debug, Clone)]
pub struct RepeatingTask {
    interval: Duration,
    timeout: Option<Duration>,
    cancel: CancelFlag,
}

impl RepeatingTask {
    pub fn new(interval: Duration, cancel: CancelFlag) -> Self {
        Self {
            interval,
            timeout: None,
            cancel,
        }
    }

    /// Give up after `timeout` has elapsed since the first tick.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Call `body` with the tick number (starting at 0) until it breaks.
    ///
    /// The first tick runs immediately. The deadline is checked after each
    /// tick, so a body that completes on the final tick still wins.
    pub fn run<T, F>(&self, mut body: F) -> PollOutcome<T>
    where
        F: FnMut(u64) -> ControlFlow<T>,
    {
        let started = Instant::now();
        // a timeout too large to represent never expires
        let deadline = self.timeout.and_then(|t| started.checked_add(t));
        let mut tick = 0u64;
        loop {
            if self.cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }
            if let ControlFlow::Break(value) = body(tick) {
                return PollOutcome::Completed(value);
            }
            tick += 1;
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::debug!(ticks = tick, "repeating task timed out");
                return PollOutcome::TimedOut;
            }
            if !self.sleep_until_next(deadline) {
                return PollOutcome::Cancelled;
            }
        }
    }

    /// Sleep one interval in slices; false if cancelled meanwhile.
    fn sleep_until_next(&self, deadline: Option<Instant>) -> bool {
        let wake = match (Instant::now().checked_add(self.interval), deadline) {
            (Some(wake), Some(deadline)) => Some(wake.min(deadline)),
            (wake, deadline) => wake.or(deadline),
        };
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            match wake {
                Some(wake) if now >= wake => return true,
                Some(wake) => thread::sleep((wake - now).min(SLEEP_SLICE)),
                None => thread::sleep(SLEEP_SLICE),
            }
        }
    }
}
