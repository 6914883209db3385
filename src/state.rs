//! Game-State Tree
//!
//! A thin wrapper over a JSON tree with slash-path patch application. The
//! renderer owns the real view state; this exists so hosts (and tests) can
//! replay `Become` assignments from a played-out queue and recover the
//! authoritative snapshot.

use serde_json::{Map, Value};

use crate::paths::StatePath;

/// The client-side mirror of the backend game state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameState(Value);

impl GameState {
    /// Create an empty state tree
    #[must_use]
    pub fn new() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Create from an existing snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: Value) -> Self {
        Self(snapshot)
    }

    /// Borrow the underlying tree
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Apply a value at a typed path, creating intermediate objects as needed
    ///
    /// `Root` replaces the entire tree; that is the snap-to semantic.
    pub fn apply(&mut self, path: &StatePath, value: Value) {
        if matches!(path, StatePath::Root) {
            self.0 = value;
            return;
        }
        self.apply_slash_path(&path.to_slash_path(), value);
    }

    /// Apply a value at a raw slash-delimited path
    pub fn apply_slash_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            self.0 = value;
            return;
        }

        let mut node = &mut self.0;
        for segment in &segments[..segments.len() - 1] {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return; // unreachable after the coercion above
            };
            node = map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        if let Value::Object(map) = node {
            map.insert(segments[segments.len() - 1].to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PlayerId;
    use serde_json::json;

    #[test]
    fn test_apply_creates_intermediate_objects() {
        let mut state = GameState::new();
        state.apply(
            &StatePath::PlayerStack(PlayerId::new("p1")),
            json!(1500),
        );
        assert_eq!(state.as_value()["players"]["p1"]["stack"], 1500);
    }

    #[test]
    fn test_root_replaces_tree() {
        let mut state = GameState::new();
        state.apply(&StatePath::TablePot, json!(300));
        state.apply(&StatePath::Root, json!({"table": {"pot": 0}}));
        assert_eq!(state.as_value(), &json!({"table": {"pot": 0}}));
    }

    #[test]
    fn test_apply_overwrites_existing_value() {
        let mut state = GameState::from_snapshot(json!({"table": {"pot": 50}}));
        state.apply(&StatePath::TablePot, json!(125));
        assert_eq!(state.as_value()["table"]["pot"], 125);
    }

    #[test]
    fn test_apply_slash_path_coerces_scalars() {
        let mut state = GameState::from_snapshot(json!({"players": 7}));
        state.apply_slash_path("players/p1/cards", json!(["Ah", "Kd"]));
        assert_eq!(state.as_value()["players"]["p1"]["cards"][0], "Ah");
    }
}
