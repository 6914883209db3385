//! Felt Core - Table Animation Scheduling for Poker Clients
//!
//! This crate turns the authoritative event stream of a poker backend into a
//! timestamped animation plan, completely independent of any rendering
//! framework. It can drive a TUI table, a GPU renderer, a replayer, or run
//! headless for testing and simulation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Renderers                             │
//! │   ┌─────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//! │   │   TUI   │   │  Canvas  │   │ Replayer │   │ Headless  │  │
//! │   └────┬────┘   └────┬─────┘   └────┬─────┘   └─────┬─────┘  │
//! │        └─────────────┴───── reads ──┴───────────────┘        │
//! │                          │                                   │
//! └──────────────────────────┼───────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼───────────────────────────────────┐
//! │                  ANIMATION QUEUE (append-only)               │
//! └──────────────────────────▲───────────────────────────────────┘
//!                            │ appends batches
//! ┌──────────────────────────┴───────────────────────────────────┐
//! │                       Dispatcher                             │
//! │  ┌───────────┐  ┌────────────┐  ┌─────────┐  ┌────────────┐  │
//! │  │ Sequencer │  │ Translator │  │  Clock  │  │  Geometry  │  │
//! │  │ (stagger, │  │ (event →   │  │ (logical│  │  (screen   │  │
//! │  │  snap-to) │  │  motion)   │  │  time)  │  │  layout)   │  │
//! │  └───────────┘  └────────────┘  └─────────┘  └────────────┘  │
//! └──────────────────────────▲───────────────────────────────────┘
//!                            │ versioned GameUpdate batches
//!                       poker backend
//! ```
//!
//! # Key Types
//!
//! - [`Dispatcher`]: accepts versioned updates and appends animation batches
//! - [`Translator`]: pure per-event choreography
//! - [`AnimationQueue`]: the append-only timeline renderers read
//! - [`ClockHandle`]: the logical scheduler clock with catch-up support
//! - [`TableGeometry`]: screen-layout seam supplied by the host
//! - [`MotionConfig`]: every duration and patch timing in one place
//!
//! # Module Overview
//!
//! - [`animation`]: primitive animations, easing curves, the queue
//! - [`clock`]: logical scheduler clock and catch-up windows
//! - [`config`]: motion timing configuration (TOML-loadable)
//! - [`delays`]: inter-event stagger table
//! - [`dispatch`]: state reconciliation and batch scheduling
//! - [`events`]: the backend event vocabulary
//! - [`frame`]: frame-callback seam between dispatcher and host
//! - [`geometry`]: pixel-space layout provider interface
//! - [`paths`]: typed addresses into the game-state tree
//! - [`sequence`]: batch walking, stagger, and snap-to correction
//! - [`sounds`]: sound cues and their fixed durations
//! - [`state`]: the renderer-facing game-state tree
//! - [`translate`]: event-to-choreography translation
//!
//! # No Renderer Dependencies
//!
//! This crate has **zero** dependencies on any drawing or audio library. It
//! plans motion; hosts render it.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod clock;
pub mod config;
pub mod delays;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod paths;
pub mod sequence;
pub mod sounds;
pub mod state;
pub mod translate;

// Re-exports for convenience
pub use animation::{Animation, AnimationQueue, EasingCurve, ScheduledAnimation, TweenProperty};
pub use clock::ClockHandle;
pub use config::{ConfigError, MotionConfig, PatchTimings};
pub use delays::delay_for;
pub use dispatch::{Dispatcher, QueueHandle, SchedulerContext};
pub use error::{DispatchError, SequenceError, TranslateError};
pub use events::{BackendEvent, EventKind, GameUpdate, StatePatch};
pub use frame::{FrameScheduler, ManualFrameScheduler, TokioFrameScheduler};
pub use geometry::{PixelPoint, StaticGeometry, TableGeometry};
pub use paths::{PlayerId, StatePath};
pub use sequence::sequence;
pub use sounds::SoundKind;
pub use state::GameState;
pub use translate::Translator;
