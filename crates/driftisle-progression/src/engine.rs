//! Progression engine - owns the XP counter, the derived level, and event
//! dispatch.
//!
//! One engine instance per play session, passed by reference to whatever
//! needs it; there is no global instance. The level is never stored
//! authoritatively: it is re-derived from the XP counter after every
//! mutation, so the two cannot drift apart.

use crate::curve::{CurveConfig, CurveError, XpTable};
use crate::events::{EventDispatcher, ProgressionEvent};

/// Experience and level state for a single play session.
pub struct ProgressionEngine {
    table: XpTable,
    dispatcher: EventDispatcher,
    xp: u64,
    level: u32,
    bonus_levels: u32,
}

impl ProgressionEngine {
    /// Create an engine on the shipped curve, at level 1 with 0 XP.
    pub fn new() -> Result<Self, CurveError> {
        Self::with_config(&CurveConfig::default())
    }

    /// Create an engine on a custom curve, at level 1 with 0 XP.
    pub fn with_config(config: &CurveConfig) -> Result<Self, CurveError> {
        Ok(Self::from_table(XpTable::build(config)?))
    }

    /// Create an engine on an already-built table, at level 1 with 0 XP.
    pub fn from_table(table: XpTable) -> Self {
        let level = table.level_for_xp(0);
        Self {
            table,
            dispatcher: EventDispatcher::new(),
            xp: 0,
            level,
            bonus_levels: 0,
        }
    }

    /// Register a progression listener. Events are delivered in
    /// subscription order, synchronously, before the mutating call returns.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ProgressionEvent) + 'static,
    {
        self.dispatcher.subscribe(callback);
    }

    /// Grant XP.
    ///
    /// Non-positive amounts are a no-op: no mutation, no events. Positive
    /// amounts accumulate up to the XP cap; a grant while already capped
    /// still emits [`ProgressionEvent::XpGained`] with the requested amount
    /// and the unchanged total, so "+N XP" feedback keeps working at the
    /// cap. If the grant raised the level, one
    /// [`ProgressionEvent::LevelUp`] follows, carrying the full jump span
    /// however many thresholds were crossed.
    pub fn add_xp(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        let amount = amount as u64;

        self.xp = self.xp.saturating_add(amount).min(self.table.cap_xp());
        log::trace!("xp gained: +{} (total {})", amount, self.xp);
        self.dispatcher.emit(&ProgressionEvent::XpGained {
            amount,
            total: self.xp,
        });

        let new_level = self.table.level_for_xp(self.xp);
        if new_level > self.level {
            let from = self.level;
            self.level = new_level;
            log::debug!("level up: {} -> {}", from, new_level);
            self.dispatcher
                .emit(&ProgressionEvent::LevelUp { from, to: new_level });
        }
    }

    /// Current level, derived from XP.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Level plus equipment-granted bonus levels, capped at the max level.
    /// Never below [`ProgressionEngine::level`].
    pub fn effective_level(&self) -> u32 {
        (self.level + self.bonus_levels).min(self.table.max_level())
    }

    /// Cumulative XP.
    pub fn current_xp(&self) -> u64 {
        self.xp
    }

    /// Equipment-granted bonus levels.
    pub fn bonus_levels(&self) -> u32 {
        self.bonus_levels
    }

    /// Replace (not add to) the stored bonus levels.
    pub fn set_bonus_levels(&mut self, bonus: u32) {
        self.bonus_levels = bonus;
    }

    /// Minimum cumulative XP for `level`, clamped at both ends.
    pub fn xp_for_level(&self, level: u32) -> u64 {
        self.table.xp_for_level(level)
    }

    /// XP still missing to the next threshold; 0 at the level cap.
    pub fn xp_to_next_level(&self) -> u64 {
        if self.level >= self.table.max_level() {
            return 0;
        }
        self.table.xp_for_level(self.level + 1) - self.xp
    }

    /// Fraction of the current level's span already earned, in `[0, 1]`;
    /// exactly 1.0 at the level cap.
    pub fn progress_to_next_level(&self) -> f32 {
        if self.level >= self.table.max_level() {
            return 1.0;
        }
        let floor = self.table.xp_for_level(self.level);
        let ceiling = self.table.xp_for_level(self.level + 1);
        // The resolver never leaves the level on a threshold shared with the
        // next one, so the span is nonzero.
        (self.xp - floor) as f32 / (ceiling - floor) as f32
    }

    /// Hard reset to level 1, 0 XP, no bonus levels. Emits nothing: this is
    /// not a loss delta, and whatever triggered it narrates it itself.
    pub fn reset(&mut self) {
        log::debug!("progression reset");
        self.xp = 0;
        self.level = 1;
        self.bonus_levels = 0;
    }

    /// The curve table this engine resolves against.
    pub fn table(&self) -> &XpTable {
        &self.table
    }

    pub(crate) fn adopt_state(&mut self, xp: u64, bonus_levels: u32) {
        self.xp = xp;
        self.level = self.table.level_for_xp(xp);
        self.bonus_levels = bonus_levels;
    }
}

impl std::fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("xp", &self.xp)
            .field("level", &self.level)
            .field("bonus_levels", &self.bonus_levels)
            .field("listeners", &self.dispatcher.listener_count())
            .finish()
    }
}
