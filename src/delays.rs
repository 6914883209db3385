//! Inter-Event Stagger
//!
//! How long the sequencer waits after an event's start before starting the
//! next event in the same batch. This is NOT an animation duration: a
//! fold's full choreography should visually finish before the next event
//! begins, and these values are tuned for that pacing. Unlisted kinds
//! stagger by 0 (their animations overlap the next event).

use crate::events::EventKind;

/// Stagger in milliseconds applied after `kind` before the next event starts
#[must_use]
pub fn delay_for(kind: EventKind) -> u64 {
    match kind {
        EventKind::Post => 100,
        EventKind::DealPlayer => 80,
        EventKind::DealBoard => 300,
        EventKind::Bet | EventKind::RaiseTo | EventKind::Call | EventKind::Check => 400,
        EventKind::Fold => 600,
        EventKind::Win => 2000,
        EventKind::ReturnChips | EventKind::ReturnBet => 300,
        EventKind::RevealHand => 500,
        EventKind::Muck => 300,
        EventKind::BountyWin => 800,
        EventKind::NewStreet => 600,
        _ => 0,
    }
}
