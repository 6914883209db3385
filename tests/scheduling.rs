//! End-to-end scheduling tests: wire-format updates in, timestamped
//! animation timeline out.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use felt_core::{
    delay_for, Animation, ClockHandle, Dispatcher, EventKind, FrameScheduler, GameState,
    GameUpdate, ManualFrameScheduler, MotionConfig, PixelPoint, PlayerId, ScheduledAnimation,
    SchedulerContext, StatePath, StaticGeometry,
};

fn table_geometry() -> StaticGeometry {
    let mut geometry = StaticGeometry::new()
        .with_point(StatePath::TablePot, PixelPoint::new(320.0, 200.0))
        .with_muck(PixelPoint::new(400.0, 240.0));
    for id in ["p1", "p2"] {
        let player = PlayerId::new(id);
        geometry = geometry
            .with_point(StatePath::PlayerStack(player.clone()), PixelPoint::new(40.0, 300.0))
            .with_point(
                StatePath::PlayerUncollectedBets(player.clone()),
                PixelPoint::new(120.0, 260.0),
            )
            .with_point(StatePath::PlayerCards(player), PixelPoint::new(60.0, 280.0));
    }
    geometry
}

struct Harness {
    dispatcher: Dispatcher,
    clock: ClockHandle,
    scheduler: Arc<ManualFrameScheduler>,
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn harness(initial_snapshot: serde_json::Value) -> Harness {
    init_tracing();
    let clock = ClockHandle::new();
    let scheduler = Arc::new(ManualFrameScheduler::new());
    let ctx = SchedulerContext {
        clock: clock.clone(),
        scheduler: Arc::clone(&scheduler) as Arc<dyn FrameScheduler>,
        geometry: Arc::new(table_geometry()),
        config: MotionConfig::default(),
    };
    let dispatcher = Dispatcher::new(ctx, initial_snapshot).unwrap();
    Harness {
        dispatcher,
        clock,
        scheduler,
    }
}

fn deliver(harness: &mut Harness, update: GameUpdate) {
    harness.dispatcher.on_gamestate_update(update).unwrap();
    harness.scheduler.take_pending();
    harness.dispatcher.on_frame().unwrap();
}

#[test]
fn test_wire_update_flows_to_timeline() {
    let update: GameUpdate = serde_json::from_value(json!({
        "version": 12,
        "events": [
            { "kind": "CHECK", "subj": "p1" },
            { "kind": "BET", "subj": "p2", "value": { "amount": 100 },
              "patches": [{ "path": "players/p2/stack", "value": 900 }] }
        ],
        "snapshot": { "table": { "pot": 100 }, "players": { "p2": { "stack": 900 } } }
    }))
    .unwrap();

    let mut harness = harness(json!({ "table": { "pot": 0 } }));
    deliver(&mut harness, update);

    let queue = harness.dispatcher.queue();
    let queue = queue.read();

    // The batch is bracketed: first entry relabeled init, terminal snapshot
    // relabeled end and forced past every other entry.
    let batch: Vec<&ScheduledAnimation> =
        queue.iter().filter(|a| a.source.starts_with("12:")).collect();
    assert_eq!(batch.first().unwrap().source, "12:init");
    let terminal = batch.last().unwrap();
    assert_eq!(terminal.source, "12:end");
    assert_eq!(terminal.target, StatePath::Root);
    let others_end = batch[..batch.len() - 1]
        .iter()
        .map(|a| a.end_time())
        .max()
        .unwrap();
    assert_eq!(terminal.start_time, others_end + 1);

    // Bet animations are staggered behind the check by its table delay.
    let bet_start = batch
        .iter()
        .filter(|a| a.source == "12:BET")
        .map(|a| a.start_time)
        .min()
        .unwrap();
    assert_eq!(bet_start, delay_for(EventKind::Check));
}

#[test]
fn test_deal_round_staggers_per_delay_table() {
    let update: GameUpdate = serde_json::from_value(json!({
        "version": 1,
        "events": [
            { "kind": "POST", "subj": "p1" },
            { "kind": "POST", "subj": "p2" },
            { "kind": "DEAL_PLAYER", "subj": "p1" },
            { "kind": "DEAL_PLAYER", "subj": "p2" }
        ],
        "snapshot": {}
    }))
    .unwrap();

    let mut harness = harness(json!({}));
    deliver(&mut harness, update);

    let queue = harness.dispatcher.queue();
    let queue = queue.read();
    // Cursor positions: POST 0, POST 100, DEAL_PLAYER 200, DEAL_PLAYER 280.
    let deal_starts: Vec<u64> = queue
        .iter()
        .filter(|a| a.source == "1:DEAL_PLAYER")
        .map(|a| a.start_time)
        .collect();
    assert_eq!(deal_starts.iter().min(), Some(&200));
    assert!(deal_starts.contains(&280));
}

#[test]
fn test_sound_cues_always_come_in_on_off_pairs() {
    let update: GameUpdate = serde_json::from_value(json!({
        "version": 2,
        "events": [
            { "kind": "CHECK", "subj": "p1" },
            { "kind": "FOLD", "subj": "p2" },
            { "kind": "WIN", "subj": "p1", "value": { "amount": 40 } }
        ],
        "snapshot": {}
    }))
    .unwrap();

    let mut harness = harness(json!({}));
    deliver(&mut harness, update);

    let queue = harness.dispatcher.queue();
    let queue = queue.read();
    let sounds: Vec<&ScheduledAnimation> = queue
        .iter()
        .filter(|a| a.target == StatePath::TableSound)
        .collect();
    // Three events, each with exactly one on and one clearing entry.
    assert_eq!(sounds.len(), 6);
    let clearing = sounds
        .iter()
        .filter(|a| matches!(&a.animation, Animation::Become { value } if value.is_null()))
        .count();
    assert_eq!(clearing, 3);
}

#[test]
fn test_replaying_becomes_recovers_snapshot() {
    let snapshot = json!({
        "table": { "pot": 0, "board": [] },
        "players": {
            "p1": { "stack": 1100, "last_action": "check" },
            "p2": { "stack": 900, "last_action": "bet" }
        }
    });
    let update: GameUpdate = serde_json::from_value(json!({
        "version": 4,
        "events": [
            { "kind": "CHECK", "subj": "p1" },
            { "kind": "BET", "subj": "p2", "value": { "amount": 100 },
              "patches": [{ "path": "players/p2/stack", "value": 900 }] }
        ],
        "snapshot": snapshot.clone()
    }))
    .unwrap();

    let mut harness = harness(json!({ "table": { "pot": 0 } }));
    deliver(&mut harness, update);

    // Play out every instantaneous assignment in timeline order. The
    // snap-to guarantee puts the authoritative snapshot last, so whatever
    // intermediate values the choreography wrote, the final state is exact.
    let queue = harness.dispatcher.queue();
    let queue = queue.read();
    let mut becomes: Vec<&ScheduledAnimation> =
        queue.iter().filter(|a| a.animation.is_become()).collect();
    becomes.sort_by_key(|a| a.start_time);

    let mut state = GameState::new();
    for anim in becomes {
        if let Animation::Become { value } = &anim.animation {
            state.apply(&anim.target, value.clone());
        }
    }
    assert_eq!(state.as_value(), &snapshot);
}

#[test]
fn test_unknown_wire_kinds_still_schedule_the_snapshot() {
    let update: GameUpdate = serde_json::from_value(json!({
        "version": 3,
        "events": [
            { "kind": "JACKPOT_SPIN", "subj": "p1", "value": { "tier": 3 } },
            { "kind": "CHAT_LINE", "value": "glhf" }
        ],
        "snapshot": { "table": { "pot": 10 } }
    }))
    .unwrap();

    let mut harness = harness(json!({}));
    deliver(&mut harness, update);

    let queue = harness.dispatcher.queue();
    let queue = queue.read();
    // Neither event animates, but the terminal snapshot still lands.
    let batch: Vec<&ScheduledAnimation> =
        queue.iter().filter(|a| a.source.starts_with("3:")).collect();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].target, StatePath::Root);
}

#[test]
fn test_lagging_session_catches_up_and_drains() {
    let mut harness = harness(json!({}));

    // Queue several showdowns back to back until the tail is far ahead of
    // the (still unadvanced) clock.
    for version in 1..5 {
        let update: GameUpdate = serde_json::from_value(json!({
            "version": version,
            "events": [{ "kind": "WIN", "subj": "p1", "value": { "amount": 500 } }],
            "snapshot": {}
        }))
        .unwrap();
        deliver(&mut harness, update);
    }
    let tail = harness
        .dispatcher
        .queue()
        .read()
        .last_end_time()
        .unwrap();
    assert!(tail > harness.clock.now() + 8000);

    // The next update tips the dispatcher into catch-up.
    let update: GameUpdate = serde_json::from_value(json!({
        "version": 9,
        "events": [{ "kind": "CHECK", "subj": "p2" }],
        "snapshot": {}
    }))
    .unwrap();
    deliver(&mut harness, update);
    assert!(harness.clock.is_catching_up());

    // One catch-up window of wall time replays the whole backlog.
    harness.clock.advance(1000.0);
    assert!(!harness.clock.is_catching_up());
    let handle = harness.dispatcher.queue();
    {
        let queue = handle.read();
        assert_eq!(queue.finished_by(harness.clock.now()).len(), queue.len());
    }

    // The host prunes the played-out backlog; nothing live remains.
    let removed = handle.write().discard_finished(harness.clock.now());
    assert!(removed > 0);
    assert!(handle.read().is_empty());
}
