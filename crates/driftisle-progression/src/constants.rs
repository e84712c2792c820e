//! Progression constants - level cap, curve checkpoints, default curve shape.
//!
//! Both the game host and the native simtest use these. The checkpoint pair
//! (level 320 at 50M XP, level 399 at 100M XP) is a design anchor: the curve
//! builder forces the table through both exactly, whatever the shape
//! constants are tuned to.

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 399;

/// Level the curve is anchored through at [`MIDPOINT_XP`].
pub const MIDPOINT_LEVEL: u32 = 320;

/// Cumulative XP at the level cap. XP gain clamps here.
pub const MAX_XP: u64 = 100_000_000;

/// Cumulative XP at [`MIDPOINT_LEVEL`], exactly.
pub const MIDPOINT_XP: u64 = 50_000_000;

/// Default weight base for levels 2..=320.
pub const EARLY_WEIGHT_BASE: f64 = 1.0;

/// Default per-level weight growth for levels 2..=320.
pub const EARLY_WEIGHT_GROWTH: f64 = 1.015;

/// Default weight base for levels 321..=399.
pub const LATE_WEIGHT_BASE: f64 = 1.0;

/// Default per-level weight growth for levels 321..=399. Steeper than the
/// early phase so the last stretch is the punishing one.
pub const LATE_WEIGHT_GROWTH: f64 = 1.05;
