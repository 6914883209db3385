//! State Paths
//!
//! Typed addresses into the game-state tree. The backend addresses state with
//! slash-delimited strings (`players/p3/stack`, `table/sound`); this module
//! replaces raw string concatenation with a closed set of semantic paths so
//! patch-timing lookups can be matched exhaustively at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Seat identifier as sent by the backend (e.g. `"p3"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a player id from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A semantic address into the game-state tree
///
/// Every animation targets exactly one of these. `Root` addresses the whole
/// tree and is reserved for full-state snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatePath {
    /// The entire game-state subtree (snapshots only)
    Root,
    /// A player's chip stack (`players/{id}/stack`)
    PlayerStack(PlayerId),
    /// Chips a player has bet but that are not yet in the pot
    /// (`players/{id}/uncollected_bets`)
    PlayerUncollectedBets(PlayerId),
    /// A player's hole cards (`players/{id}/cards`)
    PlayerCards(PlayerId),
    /// The last action label shown at a seat (`players/{id}/last_action`)
    PlayerLastAction(PlayerId),
    /// The seat highlight ring (`players/{id}/highlight`)
    PlayerHighlight(PlayerId),
    /// The per-seat action timer bar (`players/{id}/progress_bar`)
    PlayerProgressBar(PlayerId),
    /// The table's transient sound field (`table/sound`)
    TableSound,
    /// The pot chip stack (`table/pot`)
    TablePot,
    /// The community cards (`table/board`)
    TableBoard,
    /// The dealer-button position (`table/dealer_pos`)
    TableDealerPos,
    /// The side-pot summary strip (`table/sidepot_summary`)
    TableSidepotSummary,
    /// The win/bounty notification slot (`table/notification`)
    TableNotification,
    /// An address outside the animated vocabulary, carried verbatim
    ///
    /// Never produced by [`StatePath::parse`]; the translator constructs it
    /// so patches addressing unanimated state still reach the renderer.
    Other(String),
}

impl StatePath {
    /// Parse a slash-delimited backend path
    ///
    /// Returns `None` for addresses outside the known vocabulary. A
    /// `players/...` path with a recognized field but no id segment also
    /// returns `None`; callers that treat that as an invariant violation
    /// raise their own error.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Root),
            ["players", id, field] => {
                let id = PlayerId::new(*id);
                match *field {
                    "stack" => Some(Self::PlayerStack(id)),
                    "uncollected_bets" => Some(Self::PlayerUncollectedBets(id)),
                    "cards" => Some(Self::PlayerCards(id)),
                    "last_action" => Some(Self::PlayerLastAction(id)),
                    "highlight" => Some(Self::PlayerHighlight(id)),
                    "progress_bar" => Some(Self::PlayerProgressBar(id)),
                    _ => None,
                }
            }
            ["table", field] => match *field {
                "sound" => Some(Self::TableSound),
                "pot" => Some(Self::TablePot),
                "board" => Some(Self::TableBoard),
                "dealer_pos" => Some(Self::TableDealerPos),
                "sidepot_summary" => Some(Self::TableSidepotSummary),
                "notification" => Some(Self::TableNotification),
                _ => None,
            },
            _ => None,
        }
    }

    /// The player this path belongs to, if it is a per-seat address
    #[must_use]
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            Self::PlayerStack(id)
            | Self::PlayerUncollectedBets(id)
            | Self::PlayerCards(id)
            | Self::PlayerLastAction(id)
            | Self::PlayerHighlight(id)
            | Self::PlayerProgressBar(id) => Some(id),
            _ => None,
        }
    }

    /// Render as the backend's slash-delimited form
    #[must_use]
    pub fn to_slash_path(&self) -> String {
        match self {
            Self::Root => String::new(),
            Self::PlayerStack(id) => format!("players/{id}/stack"),
            Self::PlayerUncollectedBets(id) => format!("players/{id}/uncollected_bets"),
            Self::PlayerCards(id) => format!("players/{id}/cards"),
            Self::PlayerLastAction(id) => format!("players/{id}/last_action"),
            Self::PlayerHighlight(id) => format!("players/{id}/highlight"),
            Self::PlayerProgressBar(id) => format!("players/{id}/progress_bar"),
            Self::TableSound => "table/sound".to_string(),
            Self::TablePot => "table/pot".to_string(),
            Self::TableBoard => "table/board".to_string(),
            Self::TableDealerPos => "table/dealer_pos".to_string(),
            Self::TableSidepotSummary => "table/sidepot_summary".to_string(),
            Self::TableNotification => "table/notification".to_string(),
            Self::Other(path) => path.clone(),
        }
    }
}

// Display uses the slash form so log lines match backend addresses.
impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.to_slash_path())
    }
}
