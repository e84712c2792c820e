//! XP curve construction and level resolution.
//!
//! The curve is a 1-indexed table of cumulative XP thresholds, built once
//! from a [`CurveConfig`] and immutable afterwards. Construction is a
//! two-phase piecewise-geometric walk: each phase distributes its XP budget
//! across its levels proportionally to a geometric weight series, so early
//! levels are cheap and late levels are disproportionately expensive. Both
//! phase endpoints (the midpoint checkpoint and the cap) are forced to their
//! exact target values after the walk, eliminating ceiling-rounding drift at
//! the checkpoints.
//!
//! A config that cannot produce a valid table (non-growing weights, a
//! midpoint outside the level range, a zero budget) is refused with a
//! [`CurveError`]; the engine never starts on a malformed curve.

use serde::{Deserialize, Serialize};

use crate::constants::{
    EARLY_WEIGHT_BASE, EARLY_WEIGHT_GROWTH, LATE_WEIGHT_BASE, LATE_WEIGHT_GROWTH, MAX_LEVEL,
    MAX_XP, MIDPOINT_LEVEL, MIDPOINT_XP,
};

/// Tunable constants for the two-phase XP curve.
///
/// `Default` carries the shipped game values; hosts may also deserialize a
/// config from tuning data (see `data/progression_curve.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Highest reachable level.
    pub max_level: u32,
    /// Level forced through `midpoint_xp` exactly. Must satisfy
    /// `1 < midpoint_level < max_level`.
    pub midpoint_level: u32,
    /// Cumulative XP at the midpoint level.
    pub midpoint_xp: u64,
    /// Cumulative XP at the level cap.
    pub cap_xp: u64,
    /// Weight base for the early phase (levels `2..=midpoint_level`).
    pub early_base: f64,
    /// Per-level weight growth for the early phase. Must exceed 1.
    pub early_growth: f64,
    /// Weight base for the late phase (levels `midpoint_level+1..=max_level`).
    pub late_base: f64,
    /// Per-level weight growth for the late phase. Must exceed 1.
    pub late_growth: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            midpoint_level: MIDPOINT_LEVEL,
            midpoint_xp: MIDPOINT_XP,
            cap_xp: MAX_XP,
            early_base: EARLY_WEIGHT_BASE,
            early_growth: EARLY_WEIGHT_GROWTH,
            late_base: LATE_WEIGHT_BASE,
            late_growth: LATE_WEIGHT_GROWTH,
        }
    }
}

impl CurveConfig {
    /// Check every build precondition without building the table.
    pub fn validate(&self) -> Result<(), CurveError> {
        if !(self.early_growth > 1.0) {
            return Err(CurveError::BadGrowth {
                phase: "early",
                growth: self.early_growth,
            });
        }
        if !(self.late_growth > 1.0) {
            return Err(CurveError::BadGrowth {
                phase: "late",
                growth: self.late_growth,
            });
        }
        if !(self.early_base > 0.0) {
            return Err(CurveError::BadBase {
                phase: "early",
                base: self.early_base,
            });
        }
        if !(self.late_base > 0.0) {
            return Err(CurveError::BadBase {
                phase: "late",
                base: self.late_base,
            });
        }
        if self.midpoint_level <= 1 || self.midpoint_level >= self.max_level {
            return Err(CurveError::BadMidpoint {
                midpoint_level: self.midpoint_level,
                max_level: self.max_level,
            });
        }
        if self.midpoint_xp == 0 || self.cap_xp <= self.midpoint_xp {
            return Err(CurveError::BadBudget {
                midpoint_xp: self.midpoint_xp,
                cap_xp: self.cap_xp,
            });
        }
        Ok(())
    }
}

/// Errors that make a curve config unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A phase's weight growth is not strictly above 1 (or is NaN).
    BadGrowth { phase: &'static str, growth: f64 },
    /// A phase's weight base is not strictly positive (or is NaN).
    BadBase { phase: &'static str, base: f64 },
    /// `midpoint_level` does not sit strictly between 1 and `max_level`.
    BadMidpoint { midpoint_level: u32, max_level: u32 },
    /// A phase has no XP to distribute: `midpoint_xp` is zero or `cap_xp`
    /// does not exceed it.
    BadBudget { midpoint_xp: u64, cap_xp: u64 },
    /// The built table decreased between two adjacent levels.
    NotMonotonic { level: u32 },
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveError::BadGrowth { phase, growth } => {
                write!(f, "{} phase growth must exceed 1, got {}", phase, growth)
            }
            CurveError::BadBase { phase, base } => {
                write!(f, "{} phase base must be positive, got {}", phase, base)
            }
            CurveError::BadMidpoint {
                midpoint_level,
                max_level,
            } => write!(
                f,
                "midpoint level {} must lie strictly between 1 and {}",
                midpoint_level, max_level
            ),
            CurveError::BadBudget {
                midpoint_xp,
                cap_xp,
            } => write!(
                f,
                "curve budget is empty: midpoint {} XP, cap {} XP",
                midpoint_xp, cap_xp
            ),
            CurveError::NotMonotonic { level } => {
                write!(f, "threshold for level {} is below its predecessor", level)
            }
        }
    }
}

impl std::error::Error for CurveError {}

/// Immutable level → cumulative XP lookup table.
///
/// Stored 0-indexed internally: `thresholds[L-1]` is the minimum cumulative
/// XP to hold level `L`. Level 1 is always 0 XP; the top entry is always the
/// XP cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpTable {
    thresholds: Box<[u64]>,
}

impl XpTable {
    /// Build the table from a config.
    ///
    /// The table invariant is monotonic *non-decreasing*, not strictly
    /// increasing: with the shipped constants every per-level increment is
    /// at least 1 XP (the ceiling of a positive product), but exotic
    /// constants that produced a shared threshold would be kept as-is, and
    /// [`XpTable::level_for_xp`] resolves an XP value sitting on a shared
    /// threshold to the highest such level.
    pub fn build(config: &CurveConfig) -> Result<Self, CurveError> {
        config.validate()?;

        let mut thresholds = vec![0u64; config.max_level as usize];

        fill_phase(
            &mut thresholds,
            2,
            config.midpoint_level,
            config.early_base,
            config.early_growth,
            0,
            config.midpoint_xp,
        );
        thresholds[config.midpoint_level as usize - 1] = config.midpoint_xp;

        fill_phase(
            &mut thresholds,
            config.midpoint_level + 1,
            config.max_level,
            config.late_base,
            config.late_growth,
            config.midpoint_xp,
            config.cap_xp,
        );
        thresholds[config.max_level as usize - 1] = config.cap_xp;

        // The forced checkpoints can only break ordering if rounding drift
        // within a phase exceeded that phase's final increment.
        for level in 1..thresholds.len() {
            if thresholds[level] < thresholds[level - 1] {
                return Err(CurveError::NotMonotonic {
                    level: level as u32 + 1,
                });
            }
        }

        Ok(Self {
            thresholds: thresholds.into_boxed_slice(),
        })
    }

    /// Highest level the table covers.
    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Cumulative XP at the level cap.
    pub fn cap_xp(&self) -> u64 {
        *self.thresholds.last().unwrap_or(&0)
    }

    /// Minimum cumulative XP to hold `level`, clamped: level 0 maps to 0,
    /// levels above the cap map to the XP cap.
    pub fn xp_for_level(&self, level: u32) -> u64 {
        if level < 1 {
            return 0;
        }
        if level > self.max_level() {
            return self.cap_xp();
        }
        self.thresholds[level as usize - 1]
    }

    /// Greatest level whose threshold is at or below `xp`.
    ///
    /// Binary search over the monotonic thresholds; always in
    /// `1..=max_level` since level 1 sits at 0 XP.
    pub fn level_for_xp(&self, xp: u64) -> u32 {
        self.thresholds.partition_point(|&t| t <= xp) as u32
    }

    /// The raw threshold sequence, 0-indexed (entry `L-1` is level `L`).
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }
}

/// Distribute `target_xp - start_xp` across levels `first..=last` along a
/// geometric weight series, writing cumulative thresholds into the table.
fn fill_phase(
    thresholds: &mut [u64],
    first: u32,
    last: u32,
    base: f64,
    growth: f64,
    start_xp: u64,
    target_xp: u64,
) {
    let mut raw_sum = 0.0;
    let mut weight = base;
    for _ in first..=last {
        raw_sum += weight;
        weight *= growth;
    }

    // The unrounded increments sum to the budget exactly; ceiling each one
    // can leave the walked sum slightly high, which the caller corrects at
    // the phase endpoint.
    let scale = (target_xp - start_xp) as f64 / raw_sum;
    let mut cumulative = start_xp;
    let mut weight = base;
    for level in first..=last {
        cumulative += (weight * scale).ceil() as u64;
        thresholds[level as usize - 1] = cumulative;
        weight *= growth;
    }
}
