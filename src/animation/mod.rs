//! Animation Primitives
//!
//! The vocabulary the translator emits and the renderer consumes. An
//! animation describes WHAT changes and when, never how it is drawn.
//!
//! # Timing Invariants
//!
//! - Every scheduled animation has a definite `start_time` on the scheduler
//!   clock; duration-bearing animations end at `start_time + duration`,
//!   instantaneous ones end at `start_time`.
//! - A queue is terminated by a full-state `Become` at `Root` whose start
//!   time is at least the end time of every other entry (the snap-to
//!   guarantee), established by the sequencer before the batch is appended.
//! - Entries are never reordered or mutated once queued; the renderer
//!   consumes them as the clock passes their end time, and the host discards
//!   played-out entries between frames.

mod easing;

pub use easing::EasingCurve;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::paths::StatePath;

/// Visual property a tween interpolates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenProperty {
    /// Screen position (`from`/`to` are `{x, y}` points)
    Position,
    /// Opacity (`from`/`to` are 0.0..=1.0)
    Opacity,
    /// An arbitrary named style value
    Style,
}

/// A primitive UI animation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Animation {
    /// Instantaneous value assignment at the start time
    Become {
        /// The new value
        value: Value,
    },
    /// Interpolate a property between two values over a duration
    Tween {
        /// Property being animated
        property: TweenProperty,
        /// Starting value
        from: Value,
        /// Ending value
        to: Value,
        /// Duration in milliseconds
        duration_ms: u64,
        /// Interpolation curve
        easing: EasingCurve,
    },
    /// A canned renderer-side transition, referenced by name
    Css {
        /// Transition name (e.g. `"deal"`, `"flip"`)
        name: String,
        /// Duration in milliseconds
        duration_ms: u64,
    },
}

impl Animation {
    /// Duration of this animation; 0 for instantaneous assignments
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Become { .. } => 0,
            Self::Tween { duration_ms, .. } | Self::Css { duration_ms, .. } => *duration_ms,
        }
    }

    /// Whether this is an instantaneous value assignment
    #[must_use]
    pub fn is_become(&self) -> bool {
        matches!(self, Self::Become { .. })
    }
}

/// An animation placed on the timeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAnimation {
    /// State-tree address this animation targets
    pub target: StatePath,
    /// Start time on the scheduler clock, in milliseconds
    pub start_time: u64,
    /// The animation itself
    pub animation: Animation,
    /// Provenance tag (`"{version}:{kind}"`) for debugging dropped frames
    pub source: String,
}

impl ScheduledAnimation {
    /// Schedule an animation with an empty provenance tag
    ///
    /// The sequencer fills `source` in; translators don't know the batch
    /// version.
    pub fn new(target: StatePath, start_time: u64, animation: Animation) -> Self {
        Self {
            target,
            start_time,
            animation,
            source: String::new(),
        }
    }

    /// Convenience constructor for an instantaneous assignment
    pub fn become_at(target: StatePath, start_time: u64, value: Value) -> Self {
        Self::new(target, start_time, Animation::Become { value })
    }

    /// When this animation stops affecting the screen
    #[must_use]
    pub fn end_time(&self) -> u64 {
        self.start_time + self.animation.duration_ms()
    }
}

/// The ordered timeline of scheduled animations
///
/// Appended to one whole batch at a time by the dispatcher; read-only for
/// everyone else. Entries are never reordered or mutated after append; the
/// host prunes played-out entries with [`AnimationQueue::discard_finished`].
#[derive(Clone, Debug, Default)]
pub struct AnimationQueue {
    entries: Vec<ScheduledAnimation>,
}

impl AnimationQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sequenced batch
    ///
    /// The batch arrives already snap-to corrected; this only concatenates.
    pub fn append_batch(&mut self, batch: Vec<ScheduledAnimation>) {
        self.entries.extend(batch);
    }

    /// Number of queued entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in append order
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledAnimation> {
        self.entries.iter()
    }

    /// All animations active at clock time `t`
    ///
    /// Instantaneous assignments are active exactly at their start time.
    pub fn active_at(&self, t: u64) -> Vec<&ScheduledAnimation> {
        self.entries
            .iter()
            .filter(|a| a.start_time <= t && t <= a.end_time())
            .collect()
    }

    /// All animations whose end time is at or before clock time `t`
    ///
    /// The renderer uses this to consume played-out entries.
    pub fn finished_by(&self, t: u64) -> Vec<&ScheduledAnimation> {
        self.entries.iter().filter(|a| a.end_time() <= t).collect()
    }

    /// Drop every entry whose end time is at or before clock time `t`,
    /// returning how many were removed
    ///
    /// Called by the host once the renderer has consumed a frame; the live
    /// tail keeps its append order. Entries still in flight are never
    /// touched.
    pub fn discard_finished(&mut self, t: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|a| a.end_time() > t);
        before - self.entries.len()
    }

    /// Largest end time across all queued entries
    #[must_use]
    pub fn last_end_time(&self) -> Option<u64> {
        self.entries.iter().map(ScheduledAnimation::end_time).max()
    }
}
