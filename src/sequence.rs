//! Animation Sequencer
//!
//! Walks a batch of backend events in arrival order, assigns each a start
//! time, and concatenates the translated animations into one timestamped
//! list. After the walk it applies the snap-to correction: the terminal
//! full-state snapshot is pushed past the end of everything else so no
//! still-animating effect can visually overwrite it.
//!
//! A translation failure is fatal to its event only: it is logged with the
//! payload (a dropped animation is otherwise an invisible bug) and the event
//! contributes nothing, but the rest of the batch proceeds.

use tracing::warn;

use crate::animation::ScheduledAnimation;
use crate::config::MotionConfig;
use crate::delays::delay_for;
use crate::error::SequenceError;
use crate::events::BackendEvent;
use crate::geometry::TableGeometry;
use crate::paths::StatePath;
use crate::translate::Translator;

/// Sequence a batch of events starting at `batch_start`
///
/// Every produced animation is tagged with `"{version}:{kind}"` provenance;
/// when the batch has more than one entry the first is relabeled
/// `"{version}:init"` and the terminal snapshot `"{version}:end"`.
///
/// # Errors
///
/// Returns [`SequenceError::EmptyBatch`] if nothing was produced and
/// [`SequenceError::BadTerminal`] if the last entry is not an instantaneous
/// full-state snapshot. Both indicate the dispatcher contract was violated,
/// since the dispatcher always appends a terminal snapshot event.
pub fn sequence(
    version: i64,
    events: &[BackendEvent],
    batch_start: u64,
    geometry: &dyn TableGeometry,
    config: &MotionConfig,
) -> Result<Vec<ScheduledAnimation>, SequenceError> {
    let translator = Translator::new(geometry, config);
    let mut out: Vec<ScheduledAnimation> = Vec::new();
    let mut cursor = batch_start;

    for event in events {
        match translator.translate(cursor, event) {
            Ok(mut animations) => {
                for animation in &mut animations {
                    animation.source = format!("{version}:{}", event.kind.name());
                }
                out.extend(animations);
            }
            Err(err) => {
                warn!(
                    kind = event.kind.name(),
                    payload = %event.value,
                    error = %err,
                    "translation failed; event contributes no animations"
                );
            }
        }
        cursor += delay_for(event.kind);
    }

    snap_to_correction(version, out)
}

/// Force the terminal snapshot after every other animation's end
fn snap_to_correction(
    version: i64,
    mut out: Vec<ScheduledAnimation>,
) -> Result<Vec<ScheduledAnimation>, SequenceError> {
    let Some(last) = out.last() else {
        return Err(SequenceError::EmptyBatch);
    };
    if !(last.animation.is_become() && last.target == StatePath::Root) {
        return Err(SequenceError::BadTerminal {
            last: format!("{}:{:?}", last.target, last.source),
        });
    }

    let last_end = out
        .iter()
        .map(ScheduledAnimation::end_time)
        .max()
        .unwrap_or(0);

    if out.len() > 1 {
        let last_idx = out.len() - 1;
        out[0].source = format!("{version}:init");
        out[last_idx].source = format!("{version}:end");
        out[last_idx].start_time = last_end + 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::geometry::StaticGeometry;
    use crate::paths::PlayerId;
    use serde_json::json;

    fn terminal(snapshot: serde_json::Value) -> BackendEvent {
        BackendEvent::snap_to(snapshot)
    }

    #[test]
    fn test_stagger_uses_delay_table() {
        let geometry = StaticGeometry::new();
        let config = MotionConfig::default();
        let events = vec![
            BackendEvent::for_player(EventKind::Post, PlayerId::new("p1")),
            BackendEvent::for_player(EventKind::Post, PlayerId::new("p2")),
            BackendEvent::for_player(EventKind::DealPlayer, PlayerId::new("p1")),
            terminal(json!({})),
        ];
        let batch = sequence(3, &events, 0, &geometry, &config).unwrap();

        // Each event's first animation starts at the running cursor:
        // POST at 0, POST at 100, DEAL_PLAYER at 200. The very first entry
        // is relabeled as the init snapshot but keeps its start time.
        assert_eq!(batch[0].source, "3:init");
        assert_eq!(batch[0].start_time, 0);
        let post_starts: Vec<u64> = batch
            .iter()
            .filter(|a| a.source == "3:POST")
            .map(|a| a.start_time)
            .collect();
        assert!(post_starts.contains(&100));
        let deal_start = batch
            .iter()
            .filter(|a| a.source == "3:DEAL_PLAYER")
            .map(|a| a.start_time)
            .min()
            .unwrap();
        assert_eq!(deal_start, 200);
    }

    #[test]
    fn test_snap_to_terminal_starts_after_everything() {
        let geometry = StaticGeometry::new();
        let config = MotionConfig::default();
        let events = vec![
            BackendEvent::for_player(EventKind::Check, PlayerId::new("p1")),
            BackendEvent::for_player(EventKind::Fold, PlayerId::new("p2")),
            terminal(json!({"table": {"pot": 0}})),
        ];
        let batch = sequence(7, &events, 0, &geometry, &config).unwrap();

        let last = batch.last().unwrap();
        assert_eq!(last.source, "7:end");
        let others_end = batch[..batch.len() - 1]
            .iter()
            .map(ScheduledAnimation::end_time)
            .max()
            .unwrap();
        // The correction takes the max end over the whole list, terminal
        // included: here the terminal's cursor position (after the check and
        // fold staggers) is already past every other end time.
        let terminal_cursor = delay_for(EventKind::Check) + delay_for(EventKind::Fold);
        assert_eq!(last.start_time, terminal_cursor.max(others_end) + 1);
        assert!(last.start_time > others_end);
        assert_eq!(batch[0].source, "7:init");
    }

    #[test]
    fn test_single_entry_batch_is_not_relabeled() {
        let geometry = StaticGeometry::new();
        let config = MotionConfig::default();
        let events = vec![terminal(json!({}))];
        let batch = sequence(-1, &events, 0, &geometry, &config).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].start_time, 0);
        assert_eq!(batch[0].source, "-1:SNAPTO");
    }

    #[test]
    fn test_empty_batch_raises() {
        let geometry = StaticGeometry::new();
        let config = MotionConfig::default();
        let events = vec![BackendEvent::bare(EventKind::TakeSeat)];
        assert_eq!(
            sequence(1, &events, 0, &geometry, &config),
            Err(SequenceError::EmptyBatch)
        );
    }

    #[test]
    fn test_non_snapshot_terminal_raises() {
        let geometry = StaticGeometry::new();
        let config = MotionConfig::default();
        let events = vec![BackendEvent::for_player(EventKind::Check, PlayerId::new("p1"))];
        assert!(matches!(
            sequence(1, &events, 0, &geometry, &config),
            Err(SequenceError::BadTerminal { .. })
        ));
    }

    #[test]
    fn test_failing_event_degrades_to_empty_not_abort() {
        let geometry = StaticGeometry::new();
        let config = MotionConfig::default();
        let events = vec![
            // Win with an unconfigured patch path fails translation.
            BackendEvent::for_player(EventKind::Win, PlayerId::new("p1")).with_patches(vec![
                crate::events::StatePatch::new("tournament/level", json!(2)),
            ]),
            BackendEvent::for_player(EventKind::Check, PlayerId::new("p2")),
            terminal(json!({})),
        ];
        let batch = sequence(9, &events, 0, &geometry, &config).unwrap();
        assert!(batch.iter().all(|a| !a.source.contains("WIN")));
        // The check still starts at the cursor position after WIN's stagger.
        let check_start = batch
            .iter()
            .filter(|a| a.source == "9:CHECK")
            .map(|a| a.start_time)
            .min()
            .unwrap();
        assert_eq!(check_start, delay_for(EventKind::Win));
    }
}
