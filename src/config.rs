//! Motion Configuration
//!
//! Timing knobs for the translation and scheduling pipeline, loadable from a
//! TOML file at `$XDG_CONFIG_HOME/felt/motion.toml`. Every value has a tuned
//! default; the file only overrides what it names.
//!
//! # Example Configuration
//!
//! ```toml
//! action_duration_ms = 500
//! win_duration_ms = 2000
//! catch_up_threshold_ms = 8000
//! catch_up_speed = 500.0
//!
//! [patch_timings]
//! stack_ms = 250
//! pot_ms = 400
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::StatePath;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Per-prefix timing offsets for timed patch application
///
/// The translator matches each patch path against this table and schedules
/// the patch's Become at `base + offset`. A patch addressing a path with no
/// entry here raises [`crate::TranslateError::NoStartTime`]; defaulting
/// silently would desync visuals from state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchTimings {
    /// Offset for `players/{id}/stack` patches
    pub stack_ms: u64,
    /// Offset for `players/{id}/uncollected_bets` patches
    pub uncollected_bets_ms: u64,
    /// Offset for `players/{id}/cards` patches
    pub cards_ms: u64,
    /// Offset for `players/{id}/last_action` patches
    pub last_action_ms: u64,
    /// Offset for `table/pot` patches
    pub pot_ms: u64,
    /// Offset for `table/board` patches
    pub board_ms: u64,
    /// Offset for `table/sidepot_summary` patches
    pub sidepot_summary_ms: u64,
}

impl Default for PatchTimings {
    fn default() -> Self {
        Self {
            stack_ms: 250,
            uncollected_bets_ms: 0,
            cards_ms: 150,
            last_action_ms: 0,
            pot_ms: 400,
            board_ms: 200,
            sidepot_summary_ms: 400,
        }
    }
}

impl PatchTimings {
    /// Offset for a patch addressing `path`, or `None` if unconfigured
    #[must_use]
    pub fn offset_for(&self, path: &StatePath) -> Option<u64> {
        match path {
            StatePath::PlayerStack(_) => Some(self.stack_ms),
            StatePath::PlayerUncollectedBets(_) => Some(self.uncollected_bets_ms),
            StatePath::PlayerCards(_) => Some(self.cards_ms),
            StatePath::PlayerLastAction(_) => Some(self.last_action_ms),
            StatePath::TablePot => Some(self.pot_ms),
            StatePath::TableBoard => Some(self.board_ms),
            StatePath::TableSidepotSummary => Some(self.sidepot_summary_ms),
            _ => None,
        }
    }
}

/// Timing configuration for the animation pipeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Base duration for betting-action choreography (ms)
    pub action_duration_ms: u64,

    /// Total duration of the pot-award choreography (ms);
    /// split 75% move / 25% fade
    pub win_duration_ms: u64,

    /// Duration of a card deal/flip transition (ms)
    pub deal_duration_ms: u64,

    /// Duration of the reveal-hand phase that precedes a shown fold's
    /// discard (ms)
    pub cards_duration_ms: u64,

    /// Uniform offset for untimed patch application (ms); keeps the
    /// authoritative value change just behind the visual motion
    pub patch_offset_ms: u64,

    /// Per-prefix offsets for timed patch application
    pub patch_timings: PatchTimings,

    /// How far the queue tail may run ahead of the clock before the
    /// catch-up policy engages (ms)
    pub catch_up_threshold_ms: u64,

    /// Playback speed multiplier while catching up
    pub catch_up_speed: f64,

    /// Wall-clock duration of the catch-up window before speed reverts (ms)
    pub catch_up_window_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            action_duration_ms: 500,
            win_duration_ms: 2000,
            deal_duration_ms: 300,
            cards_duration_ms: 400,
            patch_offset_ms: 250,
            patch_timings: PatchTimings::default(),
            catch_up_threshold_ms: 8000,
            catch_up_speed: 500.0,
            catch_up_window_ms: 1000,
        }
    }
}

impl MotionConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base action duration
    #[must_use]
    pub fn with_action_duration_ms(mut self, ms: u64) -> Self {
        self.action_duration_ms = ms;
        self
    }

    /// Set the win choreography duration
    #[must_use]
    pub fn with_win_duration_ms(mut self, ms: u64) -> Self {
        self.win_duration_ms = ms;
        self
    }

    /// Set the catch-up threshold
    #[must_use]
    pub fn with_catch_up_threshold_ms(mut self, ms: u64) -> Self {
        self.catch_up_threshold_ms = ms;
        self
    }

    /// Duration of the win move phase (75% of the total)
    #[must_use]
    pub fn win_move_ms(&self) -> u64 {
        self.win_duration_ms * 3 / 4
    }

    /// Duration of the win fade phase (the remaining 25%)
    #[must_use]
    pub fn win_fade_ms(&self) -> u64 {
        self.win_duration_ms - self.win_move_ms()
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read and
    /// [`ConfigError::ParseError`] if it is not valid TOML.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from the default XDG path, falling back to
    /// defaults if no file exists
    ///
    /// # Errors
    ///
    /// Returns an error only for an existing-but-unreadable or malformed
    /// file; a missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Default configuration file path (`$XDG_CONFIG_HOME/felt/motion.toml`)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("felt").join("motion.toml"))
}
