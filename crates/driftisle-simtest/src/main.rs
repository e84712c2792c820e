//! Driftisle Headless Progression Harness
//!
//! Validates the progression curve and engine contracts without the game
//! host. Runs entirely in-process — no rendering, no audio, no save system.
//!
//! Usage:
//!   cargo run -p driftisle-simtest
//!   cargo run -p driftisle-simtest -- --verbose

use std::cell::RefCell;
use std::rc::Rc;

use driftisle_progression::curve::{CurveConfig, XpTable};
use driftisle_progression::engine::ProgressionEngine;
use driftisle_progression::events::ProgressionEvent;
use rand::Rng;

// ── Curve tuning data (same JSON the game host loads) ──────────────────
const CURVE_JSON: &str = include_str!("../../../data/progression_curve.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Driftisle Progression Harness ===\n");

    let config: CurveConfig = match serde_json::from_str(CURVE_JSON) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("curve data unreadable: {}", e);
            std::process::exit(1);
        }
    };
    let table = match XpTable::build(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("curve build refused: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Shipped curve data
    results.extend(validate_curve_data(&config, &table));

    // 2. Engine API contracts
    results.extend(validate_engine_contracts(&config, &table));

    // 3. Event delivery
    results.extend(validate_event_delivery(&config, &table));

    // 4. Config rejection sweep
    results.extend(validate_config_rejection());

    // 5. Randomized grant sweep against a reference resolver
    results.extend(randomized_grant_sweep(&config, &table, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Shipped curve data ───────────────────────────────────────────────

fn validate_curve_data(config: &CurveConfig, table: &XpTable) -> Vec<TestResult> {
    println!("--- Curve Data ---");
    let mut results = Vec::new();

    // Shipped data matches the published defaults
    results.push(TestResult {
        name: "curve_matches_defaults".into(),
        passed: *config == CurveConfig::default(),
        detail: "data/progression_curve.json mirrors CurveConfig::default()".into(),
    });

    results.push(TestResult {
        name: "curve_length".into(),
        passed: table.max_level() == config.max_level,
        detail: format!("{} levels", table.max_level()),
    });

    results.push(TestResult {
        name: "curve_base".into(),
        passed: table.xp_for_level(1) == 0,
        detail: "level 1 sits at 0 XP".into(),
    });

    results.push(TestResult {
        name: "curve_midpoint_checkpoint".into(),
        passed: table.xp_for_level(config.midpoint_level) == config.midpoint_xp,
        detail: format!(
            "level {} at {} XP",
            config.midpoint_level,
            table.xp_for_level(config.midpoint_level)
        ),
    });

    results.push(TestResult {
        name: "curve_cap_checkpoint".into(),
        passed: table.xp_for_level(config.max_level) == config.cap_xp,
        detail: format!(
            "level {} at {} XP",
            config.max_level,
            table.xp_for_level(config.max_level)
        ),
    });

    let violations = table
        .thresholds()
        .windows(2)
        .filter(|pair| pair[0] > pair[1])
        .count();
    results.push(TestResult {
        name: "curve_monotonic".into(),
        passed: violations == 0,
        detail: if violations == 0 {
            "thresholds never decrease".into()
        } else {
            format!("{} decreasing pairs", violations)
        },
    });

    let first_step = table.xp_for_level(2);
    let last_step = table.xp_for_level(config.max_level) - table.xp_for_level(config.max_level - 1);
    results.push(TestResult {
        name: "curve_back_loaded".into(),
        passed: last_step > first_step * 100,
        detail: format!("first step {} XP, last step {} XP", first_step, last_step),
    });

    results
}

// ── 2. Engine API contracts ─────────────────────────────────────────────

fn validate_engine_contracts(config: &CurveConfig, table: &XpTable) -> Vec<TestResult> {
    println!("--- Engine Contracts ---");
    let mut results = Vec::new();

    let mut engine = ProgressionEngine::from_table(table.clone());

    results.push(TestResult {
        name: "engine_fresh_state".into(),
        passed: engine.level() == 1 && engine.current_xp() == 0 && engine.bonus_levels() == 0,
        detail: format!("level {}, {} XP", engine.level(), engine.current_xp()),
    });

    engine.add_xp(0);
    engine.add_xp(-42);
    results.push(TestResult {
        name: "engine_non_positive_noop".into(),
        passed: engine.current_xp() == 0 && engine.level() == 1,
        detail: "add_xp(0) and add_xp(-42) changed nothing".into(),
    });

    engine.add_xp(config.midpoint_xp as i64);
    results.push(TestResult {
        name: "engine_midpoint_landing".into(),
        passed: engine.level() == config.midpoint_level
            && engine.current_xp() == config.midpoint_xp,
        detail: format!("level {} at {} XP", engine.level(), engine.current_xp()),
    });

    engine.add_xp(config.cap_xp as i64);
    results.push(TestResult {
        name: "engine_cap_clamp".into(),
        passed: engine.level() == config.max_level && engine.current_xp() == config.cap_xp,
        detail: format!("clamped at {} XP", engine.current_xp()),
    });

    results.push(TestResult {
        name: "engine_terminal_queries".into(),
        passed: engine.xp_to_next_level() == 0 && engine.progress_to_next_level() == 1.0,
        detail: "0 XP to next, progress 1.0 at cap".into(),
    });

    engine.set_bonus_levels(10);
    results.push(TestResult {
        name: "engine_bonus_caps_at_max".into(),
        passed: engine.effective_level() == config.max_level,
        detail: format!("effective level {}", engine.effective_level()),
    });

    engine.reset();
    engine.set_bonus_levels(10);
    results.push(TestResult {
        name: "engine_bonus_adds_at_low_level".into(),
        passed: engine.effective_level() == 11,
        detail: format!("level 1 + 10 bonus = {}", engine.effective_level()),
    });

    engine.reset();
    results.push(TestResult {
        name: "engine_reset".into(),
        passed: engine.level() == 1 && engine.current_xp() == 0 && engine.bonus_levels() == 0,
        detail: "back to level 1, 0 XP, 0 bonus".into(),
    });

    results
}

// ── 3. Event delivery ───────────────────────────────────────────────────

fn validate_event_delivery(config: &CurveConfig, table: &XpTable) -> Vec<TestResult> {
    println!("--- Event Delivery ---");
    let mut results = Vec::new();

    let mut engine = ProgressionEngine::from_table(table.clone());

    let events: Rc<RefCell<Vec<ProgressionEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event| sink.borrow_mut().push(*event));

    engine.add_xp(config.cap_xp as i64);
    {
        let events = events.borrow();
        let ups: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ProgressionEvent::LevelUp { .. }))
            .collect();
        results.push(TestResult {
            name: "events_single_span_level_up".into(),
            passed: ups.len() == 1
                && matches!(
                    ups.first(),
                    Some(ProgressionEvent::LevelUp { from: 1, to }) if *to == config.max_level
                ),
            detail: format!(
                "{} level-up event(s) for a 1 -> {} jump",
                ups.len(),
                config.max_level
            ),
        });

        results.push(TestResult {
            name: "events_gain_precedes_level_up".into(),
            passed: matches!(events.first(), Some(ProgressionEvent::XpGained { .. })),
            detail: "XpGained delivered before LevelUp".into(),
        });
    }

    events.borrow_mut().clear();
    engine.add_xp(777);
    {
        let events = events.borrow();
        results.push(TestResult {
            name: "events_gain_at_cap".into(),
            passed: events.len() == 1
                && matches!(
                    events.first(),
                    Some(ProgressionEvent::XpGained { amount: 777, total }) if *total == config.cap_xp
                ),
            detail: "capped grant still reports +777 XP".into(),
        });
    }

    results
}

// ── 4. Config rejection sweep ───────────────────────────────────────────

fn validate_config_rejection() -> Vec<TestResult> {
    println!("--- Config Rejection ---");
    let mut results = Vec::new();

    let cases: Vec<(&str, CurveConfig)> = vec![
        (
            "flat_early_growth",
            CurveConfig {
                early_growth: 1.0,
                ..CurveConfig::default()
            },
        ),
        (
            "shrinking_late_growth",
            CurveConfig {
                late_growth: 0.5,
                ..CurveConfig::default()
            },
        ),
        (
            "zero_base",
            CurveConfig {
                early_base: 0.0,
                ..CurveConfig::default()
            },
        ),
        (
            "midpoint_at_one",
            CurveConfig {
                midpoint_level: 1,
                ..CurveConfig::default()
            },
        ),
        (
            "midpoint_past_max",
            CurveConfig {
                midpoint_level: 500,
                ..CurveConfig::default()
            },
        ),
        (
            "zero_midpoint_budget",
            CurveConfig {
                midpoint_xp: 0,
                ..CurveConfig::default()
            },
        ),
        (
            "cap_below_midpoint",
            CurveConfig {
                cap_xp: 1,
                ..CurveConfig::default()
            },
        ),
    ];

    for (name, config) in cases {
        let refused = XpTable::build(&config).is_err();
        results.push(TestResult {
            name: format!("reject_{}", name),
            passed: refused,
            detail: if refused {
                "refused at build time".into()
            } else {
                "accepted a malformed config".into()
            },
        });
    }

    results
}

// ── 5. Randomized grant sweep ───────────────────────────────────────────

/// Reference resolver: reverse linear scan, the naive spelling of the
/// level-from-XP contract.
fn reference_level(table: &XpTable, xp: u64) -> u32 {
    let thresholds = table.thresholds();
    for i in (0..thresholds.len()).rev() {
        if thresholds[i] <= xp {
            return i as u32 + 1;
        }
    }
    1
}

fn randomized_grant_sweep(config: &CurveConfig, table: &XpTable, verbose: bool) -> Vec<TestResult> {
    println!("--- Randomized Grant Sweep ---");
    let mut results = Vec::new();

    let mut rng = rand::thread_rng();
    let mut engine = ProgressionEngine::from_table(table.clone());
    let mut shadow_xp: u64 = 0;
    let mut mismatches = 0u32;
    let mut grants = 0u32;

    while engine.current_xp() < config.cap_xp {
        // Mix small grinds with the occasional quest-sized windfall.
        let amount: i64 = if rng.gen_bool(0.05) {
            rng.gen_range(1_000_000..=5_000_000)
        } else {
            rng.gen_range(1..=200_000)
        };
        engine.add_xp(amount);
        grants += 1;

        shadow_xp = (shadow_xp + amount as u64).min(config.cap_xp);
        let expected = reference_level(table, shadow_xp);

        if engine.current_xp() != shadow_xp || engine.level() != expected {
            mismatches += 1;
            if verbose {
                println!(
                    "  mismatch after +{}: engine {}/{} vs reference {}/{}",
                    amount,
                    engine.current_xp(),
                    engine.level(),
                    shadow_xp,
                    expected
                );
            }
        }

        let progress = engine.progress_to_next_level();
        if !(0.0..=1.0).contains(&progress) {
            mismatches += 1;
        }
    }

    results.push(TestResult {
        name: "sweep_engine_matches_reference".into(),
        passed: mismatches == 0,
        detail: format!("{} grants to the cap, {} mismatches", grants, mismatches),
    });

    results.push(TestResult {
        name: "sweep_terminal_state".into(),
        passed: engine.level() == config.max_level && engine.current_xp() == config.cap_xp,
        detail: format!(
            "finished at level {} with {} XP",
            engine.level(),
            engine.current_xp()
        ),
    });

    results
}
