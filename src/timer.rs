//! Recurring-tick scheduling.
//!
//! The loss detector stores its alarm target with full nanosecond precision
//! but polls it from a coarse recurring tick, so the timer never needs
//! reprogramming on the send/ack hot path. [`Scheduler`] is the seam:
//! production uses [`TokioScheduler`]; tests fire ticks by hand with
//! [`ManualScheduler`].

use core::time::Duration;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback invoked on every tick. Must be non-blocking.
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// Registers recurring ticks.
pub trait Scheduler: Send + Sync {
    /// Invoke `callback` every `period` until the returned handle is
    /// cancelled or dropped.
    fn schedule_every(&self, period: Duration, callback: TickCallback) -> Box<dyn TickHandle>;
}

/// Handle to a scheduled recurring tick.
///
/// Dropping the handle cancels the tick.
pub trait TickHandle: Send {
    /// Stop the tick. Idempotent; no callback starts after this returns.
    fn cancel(&mut self);
}

// ============================================================================
// Tokio-backed scheduler
// ============================================================================

/// Scheduler backed by a tokio runtime.
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Schedule on the current tokio runtime.
    ///
    /// # Panics
    /// Panics outside a tokio runtime context.
    pub fn new() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
        }
    }

    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_every(&self, period: Duration, callback: TickCallback) -> Box<dyn TickHandle> {
        let join = self.handle.spawn(async move {
            // First tick one full period out, not immediately.
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                callback();
            }
        });
        Box::new(TokioTickHandle { join: Some(join) })
    }
}

struct TokioTickHandle {
    join: Option<tokio::task::JoinHandle<()>>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Manual scheduler (tests, simulation)
// ============================================================================

struct ManualTick {
    callback: TickCallback,
    cancelled: Arc<AtomicBool>,
}

/// Scheduler whose ticks fire only when the caller says so.
#[derive(Default)]
pub struct ManualScheduler {
    ticks: Mutex<Vec<ManualTick>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live tick once.
    pub fn fire(&self) {
        // Snapshot under the lock, invoke outside it: a callback may
        // re-enter schedule_every.
        let callbacks: Vec<TickCallback> = {
            let mut ticks = self.ticks.lock();
            ticks.retain(|t| !t.cancelled.load(Ordering::SeqCst));
            ticks.iter().map(|t| Arc::clone(&t.callback)).collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    /// Number of ticks that have been scheduled and not cancelled.
    pub fn active_ticks(&self) -> usize {
        let mut ticks = self.ticks.lock();
        ticks.retain(|t| !t.cancelled.load(Ordering::SeqCst));
        ticks.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_every(&self, _period: Duration, callback: TickCallback) -> Box<dyn TickHandle> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.ticks.lock().push(ManualTick {
            callback,
            cancelled: Arc::clone(&cancelled),
        });
        Box::new(ManualTickHandle { cancelled })
    }
}

struct ManualTickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Drop for ManualTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
