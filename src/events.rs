//! Backend Events
//!
//! Authoritative game-action records sent by the server. The core treats
//! payloads as opaque JSON: game rules live server-side, and this library
//! only decides how each event should look and when.
//!
//! # Design Philosophy
//!
//! The backend event vocabulary evolves independently of the client. The
//! kind union is closed for everything we choreograph, but unknown wire tags
//! deserialize into [`EventKind::Unhandled`] and translate to an empty
//! animation list rather than failing, so old clients stay forward
//! compatible.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::paths::PlayerId;

/// Kind of a backend event
///
/// Covers the full event vocabulary the animation core understands. Kinds in
/// the "no choreography" group are acknowledged no-ops: the server sends
/// them, and the renderer reacts to their state patches without motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Blind or ante posted
    Post,
    /// Hole cards dealt to one player
    DealPlayer,
    /// Community cards dealt
    DealBoard,
    /// Opening bet
    Bet,
    /// Raise to a total amount
    RaiseTo,
    /// Call of the current bet
    Call,
    /// Check
    Check,
    /// Fold (may include revealing previously shown cards first)
    Fold,
    /// Pot awarded to a winner
    Win,
    /// Uncalled chips returned to a player's stack
    ReturnChips,
    /// A single uncalled bet pushed back
    ReturnBet,
    /// Player shows their hand
    RevealHand,
    /// Player mucks their hand
    Muck,
    /// Knockout bounty awarded
    BountyWin,
    /// Betting round ended; bets sweep into the pot
    NewStreet,
    /// Full-state resynchronization snapshot
    SnapTo,
    /// Table reset between hands
    Reset,
    /// Dealer button moved
    SetBlindPos,

    // No choreography for these; they still carry patches.
    /// Player took a seat
    TakeSeat,
    /// Player left their seat
    LeaveSeat,
    /// Player sat out
    SitOut,
    /// Player returned from sitting out
    SitIn,
    /// Time-bank activated
    TimeBank,
    /// Chat line (never animated)
    ChatLine,
    /// Any wire tag this client does not know yet
    #[serde(other)]
    Unhandled,
}

impl EventKind {
    /// Wire-style name, used for provenance tags and log lines
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::DealPlayer => "DEAL_PLAYER",
            Self::DealBoard => "DEAL_BOARD",
            Self::Bet => "BET",
            Self::RaiseTo => "RAISE_TO",
            Self::Call => "CALL",
            Self::Check => "CHECK",
            Self::Fold => "FOLD",
            Self::Win => "WIN",
            Self::ReturnChips => "RETURN_CHIPS",
            Self::ReturnBet => "RETURN_BET",
            Self::RevealHand => "REVEAL_HAND",
            Self::Muck => "MUCK",
            Self::BountyWin => "BOUNTY_WIN",
            Self::NewStreet => "NEW_STREET",
            Self::SnapTo => "SNAPTO",
            Self::Reset => "RESET",
            Self::SetBlindPos => "SET_BLIND_POS",
            Self::TakeSeat => "TAKE_SEAT",
            Self::LeaveSeat => "LEAVE_SEAT",
            Self::SitOut => "SIT_OUT",
            Self::SitIn => "SIT_IN",
            Self::TimeBank => "TIME_BANK",
            Self::ChatLine => "CHAT_LINE",
            Self::Unhandled => "UNHANDLED",
        }
    }
}

/// A state patch carried by an event
///
/// Patches address the game-state tree with slash-delimited paths and are
/// re-timed by the translator; they are never applied at arrival time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatePatch {
    /// Slash-delimited address into the game-state tree
    pub path: String,
    /// New value at that address
    pub value: Value,
}

impl StatePatch {
    /// Create a patch
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// One authoritative game-action record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendEvent {
    /// What happened
    pub kind: EventKind,
    /// The acting player, when the event concerns one seat
    #[serde(default)]
    pub subj: Option<PlayerId>,
    /// Kind-specific payload (amount, cards, snapshot, ...)
    #[serde(default)]
    pub value: Value,
    /// State patches to apply alongside the animation
    #[serde(default)]
    pub patches: Vec<StatePatch>,
}

impl BackendEvent {
    /// Create an event with no subject, payload, or patches
    pub fn bare(kind: EventKind) -> Self {
        Self {
            kind,
            subj: None,
            value: Value::Null,
            patches: Vec::new(),
        }
    }

    /// Create an event for one seat
    pub fn for_player(kind: EventKind, subj: PlayerId) -> Self {
        Self {
            kind,
            subj: Some(subj),
            value: Value::Null,
            patches: Vec::new(),
        }
    }

    /// Set the payload
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Attach state patches
    #[must_use]
    pub fn with_patches(mut self, patches: Vec<StatePatch>) -> Self {
        self.patches = patches;
        self
    }

    /// Create the full-state snapshot event that terminates every batch
    pub fn snap_to(snapshot: Value) -> Self {
        Self::bare(EventKind::SnapTo).with_value(snapshot)
    }
}

/// One versioned batch of backend events
///
/// Versions increase monotonically per session; the initial batch uses
/// version −1 and is dispatched synchronously.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameUpdate {
    /// Monotonically increasing batch version
    pub version: i64,
    /// Events in arrival order
    pub events: Vec<BackendEvent>,
    /// Authoritative full state after this batch
    pub snapshot: Value,
}

impl GameUpdate {
    /// Create an update batch
    pub fn new(version: i64, events: Vec<BackendEvent>, snapshot: Value) -> Self {
        Self {
            version,
            events,
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_wire_tags() {
        let kind: EventKind = serde_json::from_str("\"RAISE_TO\"").unwrap();
        assert_eq!(kind, EventKind::RaiseTo);
        let kind: EventKind = serde_json::from_str("\"DEAL_BOARD\"").unwrap();
        assert_eq!(kind, EventKind::DealBoard);
    }

    #[test]
    fn test_unknown_wire_tag_is_unhandled() {
        let kind: EventKind = serde_json::from_str("\"SHOOT_THE_MOON\"").unwrap();
        assert_eq!(kind, EventKind::Unhandled);
    }

    #[test]
    fn test_event_deserializes_with_defaults() {
        let event: BackendEvent =
            serde_json::from_value(json!({ "kind": "CHECK", "subj": "p1" })).unwrap();
        assert_eq!(event.kind, EventKind::Check);
        assert_eq!(event.subj, Some(PlayerId::new("p1")));
        assert!(event.patches.is_empty());
        assert!(event.value.is_null());
    }

    #[test]
    fn test_snap_to_carries_snapshot() {
        let event = BackendEvent::snap_to(json!({"table": {"pot": 120}}));
        assert_eq!(event.kind, EventKind::SnapTo);
        assert_eq!(event.value["table"]["pot"], 120);
    }
}
