//! Table Sounds
//!
//! Sounds are modeled as state values, not fire-and-forget events: the
//! renderer reads `table/sound` reactively, so every sound Become must be
//! paired with a clearing Become at `start + duration`. This module is the
//! authoritative duration table for that pairing.

use serde::{Deserialize, Serialize};

/// A transient table sound effect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundKind {
    /// Knuckle tap for a check
    Check,
    /// Chip clatter for a bet or raise
    Chips,
    /// Softer chip sound for a call or post
    ChipsSoft,
    /// Cards sliding to the muck
    Fold,
    /// Card being dealt or flipped
    Deal,
    /// Pot award fanfare
    Win,
    /// Bounty knockout sting
    Bounty,
}

impl SoundKind {
    /// How long the renderer keeps this sound "on" before the clearing
    /// Become lands, in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Check => 300,
            Self::Chips => 450,
            Self::ChipsSoft => 350,
            Self::Fold => 400,
            Self::Deal => 250,
            Self::Win => 1200,
            Self::Bounty => 900,
        }
    }

    /// Wire name stored in the `table/sound` field
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Chips => "chips",
            Self::ChipsSoft => "chips_soft",
            Self::Fold => "fold",
            Self::Deal => "deal",
            Self::Win => "win",
            Self::Bounty => "bounty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sound_has_nonzero_duration() {
        for sound in [
            SoundKind::Check,
            SoundKind::Chips,
            SoundKind::ChipsSoft,
            SoundKind::Fold,
            SoundKind::Deal,
            SoundKind::Win,
            SoundKind::Bounty,
        ] {
            assert!(sound.duration_ms() > 0, "{} has zero duration", sound.name());
        }
    }

    #[test]
    fn test_wire_names_are_snake_case() {
        assert_eq!(SoundKind::ChipsSoft.name(), "chips_soft");
        assert_eq!(
            serde_json::to_string(&SoundKind::ChipsSoft).unwrap(),
            "\"chips_soft\""
        );
    }
}
