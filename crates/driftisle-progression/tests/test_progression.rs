//! Integration tests for the full progression pipeline.
//!
//! Exercises: CurveConfig → XpTable → ProgressionEngine → events → snapshot.
//!
//! All tests are pure logic — no game host, no rendering.

use std::cell::RefCell;
use std::rc::Rc;

use driftisle_progression::constants::{MAX_LEVEL, MAX_XP, MIDPOINT_LEVEL, MIDPOINT_XP};
use driftisle_progression::curve::{CurveConfig, XpTable};
use driftisle_progression::engine::ProgressionEngine;
use driftisle_progression::events::ProgressionEvent;
use driftisle_progression::snapshot::{ProgressionSnapshot, SNAPSHOT_VERSION};

// ── Helpers ────────────────────────────────────────────────────────────

fn recorded_engine() -> (ProgressionEngine, Rc<RefCell<Vec<ProgressionEvent>>>) {
    let mut engine = ProgressionEngine::new().unwrap();
    let events: Rc<RefCell<Vec<ProgressionEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event| sink.borrow_mut().push(*event));
    (engine, events)
}

fn level_ups(events: &[ProgressionEvent]) -> Vec<(u32, u32)> {
    events
        .iter()
        .filter_map(|e| match e {
            ProgressionEvent::LevelUp { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

// ── Curve/table coherence ──────────────────────────────────────────────

#[test]
fn deterministic_table() {
    let a = XpTable::build(&CurveConfig::default()).unwrap();
    let b = XpTable::build(&CurveConfig::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn table_and_engine_agree_on_thresholds() {
    let table = XpTable::build(&CurveConfig::default()).unwrap();
    let engine = ProgressionEngine::new().unwrap();
    for level in [1, 2, 100, MIDPOINT_LEVEL, MAX_LEVEL] {
        assert_eq!(engine.xp_for_level(level), table.xp_for_level(level));
    }
}

// ── Grind walk: every level reached in order ───────────────────────────

#[test]
fn walking_every_threshold_visits_every_level() {
    let (mut engine, events) = recorded_engine();

    for target in 2..=MAX_LEVEL {
        let delta = engine.xp_for_level(target) - engine.current_xp();
        engine.add_xp(delta as i64);
        assert_eq!(engine.level(), target);
    }

    assert_eq!(engine.current_xp(), MAX_XP);
    let ups = level_ups(&events.borrow());
    assert_eq!(ups.len(), (MAX_LEVEL - 1) as usize);
    // Spans chain: each level-up starts where the previous ended.
    for pair in ups.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }
    assert_eq!(ups.first(), Some(&(1, 2)));
    assert_eq!(ups.last(), Some(&((MAX_LEVEL - 1), MAX_LEVEL)));
}

// ── Event contract across a session ────────────────────────────────────

#[test]
fn session_event_stream_is_coherent() {
    let (mut engine, events) = recorded_engine();

    engine.add_xp(MIDPOINT_XP as i64);
    engine.add_xp(-10);
    engine.add_xp(MIDPOINT_XP as i64);
    engine.add_xp(1);

    let events = events.borrow();
    assert_eq!(
        level_ups(&events),
        vec![(1, MIDPOINT_LEVEL), (MIDPOINT_LEVEL, MAX_LEVEL)]
    );

    // Three positive grants, three XpGained events; the capped grant still
    // reports its amount against the unchanged total.
    let gains: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProgressionEvent::XpGained { amount, total } => Some((*amount, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(
        gains,
        vec![
            (MIDPOINT_XP, MIDPOINT_XP),
            (MIDPOINT_XP, MAX_XP),
            (1, MAX_XP),
        ]
    );
}

// ── Snapshot hand-off to a save system ─────────────────────────────────

#[test]
fn snapshot_survives_host_serialization() {
    let mut engine = ProgressionEngine::new().unwrap();
    engine.add_xp(MIDPOINT_XP as i64 + 123_456);
    engine.set_bonus_levels(12);

    // The host owns the bytes; JSON stands in for whatever it picks.
    let stored = serde_json::to_string(&engine.snapshot()).unwrap();
    let recovered: ProgressionSnapshot = serde_json::from_str(&stored).unwrap();

    let mut rehydrated = ProgressionEngine::new().unwrap();
    rehydrated.restore(&recovered).unwrap();

    assert_eq!(rehydrated.current_xp(), engine.current_xp());
    assert_eq!(rehydrated.level(), engine.level());
    assert_eq!(rehydrated.effective_level(), engine.effective_level());
}

#[test]
fn tampered_snapshot_is_refused() {
    let mut engine = ProgressionEngine::new().unwrap();
    let snapshot = ProgressionSnapshot {
        version: SNAPSHOT_VERSION,
        xp: MAX_XP + 999,
        bonus_levels: 0,
    };
    assert!(engine.restore(&snapshot).is_err());
}

// ── Custom curve end to end ────────────────────────────────────────────

#[test]
fn custom_curve_drives_a_full_session() {
    let config = CurveConfig {
        max_level: 50,
        midpoint_level: 30,
        midpoint_xp: 10_000,
        cap_xp: 100_000,
        ..CurveConfig::default()
    };
    let mut engine = ProgressionEngine::with_config(&config).unwrap();

    engine.add_xp(10_000);
    assert_eq!(engine.level(), 30);
    engine.add_xp(90_000);
    assert_eq!(engine.level(), 50);
    engine.add_xp(1_000_000);
    assert_eq!(engine.current_xp(), 100_000);

    engine.reset();
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.current_xp(), 0);
}
