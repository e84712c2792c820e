//! Snapshot support for external save systems.
//!
//! The engine owns no file format: it hands the save system a small
//! versioned value and takes one back. Only the XP counter and the bonus
//! levels are captured; the level is derived state and is re-resolved on
//! restore, so a snapshot can never reintroduce a stale level.

use serde::{Deserialize, Serialize};

use crate::engine::ProgressionEngine;

/// Snapshot format version (increment when the shape changes).
pub const SNAPSHOT_VERSION: u32 = 1;

/// Point-in-time progression state, serializable however the host likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    /// Snapshot format version.
    pub version: u32,
    /// Cumulative XP.
    pub xp: u64,
    /// Equipment-granted bonus levels.
    pub bonus_levels: u32,
}

/// Errors that make a snapshot unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// The snapshot was written by a different format version.
    VersionMismatch { expected: u32, found: u32 },
    /// The snapshot carries more XP than the curve allows.
    XpOutOfRange { xp: u64, cap: u64 },
}

impl std::fmt::Display for RestoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreError::VersionMismatch { expected, found } => write!(
                f,
                "snapshot version mismatch: expected {}, found {}",
                expected, found
            ),
            RestoreError::XpOutOfRange { xp, cap } => {
                write!(f, "snapshot XP {} exceeds curve cap {}", xp, cap)
            }
        }
    }
}

impl std::error::Error for RestoreError {}

impl ProgressionEngine {
    /// Capture the persistent progression state.
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            version: SNAPSHOT_VERSION,
            xp: self.current_xp(),
            bonus_levels: self.bonus_levels(),
        }
    }

    /// Adopt a previously captured snapshot.
    ///
    /// The level is re-resolved from the snapshot's XP. A version mismatch
    /// or an XP value past the curve cap is refused rather than clamped; a
    /// failed restore leaves the engine untouched. Emits nothing:
    /// rehydration is not a gain.
    pub fn restore(&mut self, snapshot: &ProgressionSnapshot) -> Result<(), RestoreError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RestoreError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        let cap = self.table().cap_xp();
        if snapshot.xp > cap {
            return Err(RestoreError::XpOutOfRange {
                xp: snapshot.xp,
                cap,
            });
        }
        self.adopt_state(snapshot.xp, snapshot.bonus_levels);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_XP;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn snapshot_round_trips_through_a_fresh_engine() {
        let mut engine = ProgressionEngine::new().unwrap();
        engine.add_xp(7_654_321);
        engine.set_bonus_levels(4);
        let snapshot = engine.snapshot();

        let mut restored = ProgressionEngine::new().unwrap();
        restored.restore(&snapshot).unwrap();

        assert_eq!(restored.current_xp(), engine.current_xp());
        assert_eq!(restored.level(), engine.level());
        assert_eq!(restored.bonus_levels(), engine.bonus_levels());
    }

    #[test]
    fn restore_rederives_the_level() {
        let mut engine = ProgressionEngine::new().unwrap();
        let snapshot = ProgressionSnapshot {
            version: SNAPSHOT_VERSION,
            xp: MAX_XP,
            bonus_levels: 0,
        };
        engine.restore(&snapshot).unwrap();
        assert_eq!(engine.level(), engine.table().max_level());
    }

    #[test]
    fn restore_is_silent() {
        let mut engine = ProgressionEngine::new().unwrap();
        let fired = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&fired);
        engine.subscribe(move |_| *sink.borrow_mut() += 1);

        let snapshot = ProgressionSnapshot {
            version: SNAPSHOT_VERSION,
            xp: 1_000_000,
            bonus_levels: 2,
        };
        engine.restore(&snapshot).unwrap();
        assert_eq!(*fired.borrow(), 0);
        assert!(engine.level() > 1);
    }

    #[test]
    fn refuses_version_mismatch() {
        let mut engine = ProgressionEngine::new().unwrap();
        let snapshot = ProgressionSnapshot {
            version: SNAPSHOT_VERSION + 1,
            xp: 0,
            bonus_levels: 0,
        };
        assert_eq!(
            engine.restore(&snapshot),
            Err(RestoreError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: SNAPSHOT_VERSION + 1,
            })
        );
    }

    #[test]
    fn refuses_xp_past_the_cap() {
        let mut engine = ProgressionEngine::new().unwrap();
        let snapshot = ProgressionSnapshot {
            version: SNAPSHOT_VERSION,
            xp: MAX_XP + 1,
            bonus_levels: 0,
        };
        assert!(matches!(
            engine.restore(&snapshot),
            Err(RestoreError::XpOutOfRange { .. })
        ));
        // Failed restore leaves the engine untouched.
        assert_eq!(engine.current_xp(), 0);
        assert_eq!(engine.level(), 1);
    }
}
