//! Frame Scheduling
//!
//! The original client deferred batch dispatch to the browser's next
//! animation frame. This module replaces that with an explicit scheduler
//! seam: the dispatcher asks for a frame, and the host decides when
//! [`Dispatcher::on_frame`](crate::dispatch::Dispatcher::on_frame) runs.
//! Tests drive frames synchronously; async hosts run the tokio frame loop.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::error;

use crate::clock::ClockHandle;
use crate::dispatch::Dispatcher;

/// Requests animation-frame callbacks from the host
pub trait FrameScheduler: Send + Sync {
    /// Ask the host to run `Dispatcher::on_frame` on its next frame
    ///
    /// Must be cheap and idempotent: the dispatcher may request several
    /// frames before one is delivered.
    fn request_frame(&self);
}

/// Synchronous scheduler for tests and headless hosts
///
/// Counts requests; the caller delivers frames whenever it likes by calling
/// `Dispatcher::on_frame` itself.
#[derive(Debug, Default)]
pub struct ManualFrameScheduler {
    pending: AtomicUsize,
}

impl ManualFrameScheduler {
    /// Create a scheduler with no pending requests
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any frame requests are outstanding
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Take all outstanding requests, returning how many there were
    pub fn take_pending(&self) -> usize {
        self.pending.swap(0, Ordering::SeqCst)
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }
}

/// Tokio-backed scheduler that wakes the frame loop early
#[derive(Debug, Default)]
pub struct TokioFrameScheduler {
    notify: Notify,
}

impl TokioFrameScheduler {
    /// Create a scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for TokioFrameScheduler {
    fn request_frame(&self) {
        self.notify.notify_one();
    }
}

/// Drive the dispatcher at a fixed frame cadence
///
/// Each iteration advances the clock by the elapsed wall time and delivers a
/// frame. A `request_frame` on the paired [`TokioFrameScheduler`] wakes the
/// loop early instead of waiting out the tick. Runs until `shutdown` is set.
pub async fn run_frame_loop(
    dispatcher: Arc<Mutex<Dispatcher>>,
    clock: ClockHandle,
    scheduler: Arc<TokioFrameScheduler>,
    shutdown: Arc<AtomicBool>,
    tick: Duration,
) {
    let mut last = tokio::time::Instant::now();
    while !shutdown.load(Ordering::Relaxed) {
        tokio::select! {
            () = tokio::time::sleep(tick) => {}
            () = scheduler.notify.notified() => {}
        }

        let now = tokio::time::Instant::now();
        clock.advance(now.duration_since(last).as_secs_f64() * 1000.0);
        last = now;

        if let Err(err) = dispatcher.lock().on_frame() {
            // A bad batch must not take the frame loop down with it.
            error!(error = %err, "frame dispatch failed");
        }
    }
}
