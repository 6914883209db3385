//! Dispatcher
//!
//! Bridges the bursty authoritative update stream to animation scheduling.
//! For each new gamestate version it decides where the batch's animations
//! should begin relative to whatever is still playing, sequences the batch,
//! and appends it to the running queue, never replacing or reordering
//! entries already queued.
//!
//! # Scheduling Policy
//!
//! - Empty queue: start at the current clock.
//! - Queue tail still in the future: start strictly after it (`tail + 1`).
//! - Queue tail more than the configured threshold ahead of the clock: the
//!   client is catastrophically behind. Open a catch-up window (high playback
//!   speed for a bounded wall-time slice) instead of dropping events, and
//!   still queue strictly after the tail.
//!
//! # Suspension Points
//!
//! The initial batch (version −1) is dispatched synchronously during
//! construction. Every later batch is parked in a pending list and applied
//! on the next delivered frame, so a flurry of store updates never thrashes
//! mid-frame. All queue mutation happens inside `on_frame` /
//! the constructor, on the host's single dispatch thread.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::animation::AnimationQueue;
use crate::clock::ClockHandle;
use crate::config::MotionConfig;
use crate::error::DispatchError;
use crate::events::{BackendEvent, GameUpdate};
use crate::frame::FrameScheduler;
use crate::geometry::TableGeometry;
use crate::sequence::sequence;

/// Shared, renderer-readable handle to the animation queue
pub type QueueHandle = Arc<RwLock<AnimationQueue>>;

/// Everything the dispatcher needs from its host
///
/// Threaded explicitly rather than reached for as ambient globals so tests
/// can substitute a manual clock, scheduler, and layout.
pub struct SchedulerContext {
    /// The logical animation clock
    pub clock: ClockHandle,
    /// Frame-callback seam to the host's render loop
    pub scheduler: Arc<dyn FrameScheduler>,
    /// Screen layout provider
    pub geometry: Arc<dyn TableGeometry>,
    /// Timing configuration
    pub config: MotionConfig,
}

/// The per-session reconciliation scheduler
pub struct Dispatcher {
    ctx: SchedulerContext,
    queue: QueueHandle,
    last_version: i64,
    pending: VecDeque<GameUpdate>,
}

impl Dispatcher {
    /// Create a dispatcher, seeding the queue with an immediate full-state
    /// snapshot at time 0 (version −1: no catch-up, dispatched synchronously)
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Sequence`] if the seed snapshot cannot be
    /// sequenced, which would indicate a broken initial snapshot.
    pub fn new(ctx: SchedulerContext, initial_snapshot: serde_json::Value) -> Result<Self, DispatchError> {
        let mut dispatcher = Self {
            ctx,
            queue: Arc::new(RwLock::new(AnimationQueue::new())),
            last_version: -1,
            pending: VecDeque::new(),
        };
        let seed = GameUpdate::new(-1, Vec::new(), initial_snapshot);
        dispatcher.dispatch_at(seed, 0)?;
        Ok(dispatcher)
    }

    /// Shared handle to the animation queue for the renderer
    #[must_use]
    pub fn queue(&self) -> QueueHandle {
        Arc::clone(&self.queue)
    }

    /// Highest gamestate version dispatched or accepted so far
    #[must_use]
    pub fn last_version(&self) -> i64 {
        self.last_version
    }

    /// Accept a new authoritative update
    ///
    /// The batch is parked until the next frame; a frame is requested from
    /// the host. Receiving the current version again is a no-op (the store
    /// below us may deliver duplicates).
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::VersionRegression`] if `update.version` is
    /// lower than one already accepted.
    pub fn on_gamestate_update(&mut self, update: GameUpdate) -> Result<(), DispatchError> {
        if update.version == self.last_version {
            debug!(version = update.version, "duplicate gamestate version; ignoring");
            return Ok(());
        }
        if update.version < self.last_version {
            return Err(DispatchError::VersionRegression {
                last: self.last_version,
                received: update.version,
            });
        }
        self.last_version = update.version;
        self.pending.push_back(update);
        self.ctx.scheduler.request_frame();
        Ok(())
    }

    /// Apply all parked updates; called by the host on its frame boundary
    ///
    /// # Errors
    ///
    /// Propagates sequencing failures; the queue is left exactly as it was
    /// before the failing batch (batches are appended whole or not at all).
    pub fn on_frame(&mut self) -> Result<(), DispatchError> {
        while let Some(update) = self.pending.pop_front() {
            let start = self.next_start();
            self.dispatch_at(update, start)?;
        }
        Ok(())
    }

    /// Where the next batch should begin on the timeline
    fn next_start(&self) -> u64 {
        let now = self.ctx.clock.now();
        let Some(last_end) = self.queue.read().last_end_time() else {
            return now;
        };

        if last_end > now + self.ctx.config.catch_up_threshold_ms {
            // Catastrophically behind: compress playback rather than drop
            // events. The clock refuses to reopen an active window.
            if self.ctx.clock.begin_catch_up(
                self.ctx.config.catch_up_speed,
                self.ctx.config.catch_up_window_ms,
            ) {
                info!(
                    lag_ms = last_end - now,
                    speed = self.ctx.config.catch_up_speed,
                    window_ms = self.ctx.config.catch_up_window_ms,
                    "animation queue far behind; engaging catch-up"
                );
            }
            last_end + 1
        } else if last_end > now {
            last_end + 1
        } else {
            now
        }
    }

    /// Sequence and append one batch starting at `start`
    fn dispatch_at(&mut self, update: GameUpdate, start: u64) -> Result<(), DispatchError> {
        let mut events = update.events;
        // The queue invariant: every batch terminates in the authoritative
        // full-state snapshot, appended here by construction.
        events.push(BackendEvent::snap_to(update.snapshot));

        let batch = sequence(
            update.version,
            &events,
            start,
            self.ctx.geometry.as_ref(),
            &self.ctx.config,
        )?;
        debug!(
            version = update.version,
            start,
            entries = batch.len(),
            "appending animation batch"
        );
        self.queue.write().append_batch(batch);
        Ok(())
    }
}
