//! Pure progression logic for Driftisle.
//!
//! This crate contains the island game's experience/level engine,
//! independent of any rendering, audio, or engine runtime. The game host
//! constructs one [`engine::ProgressionEngine`] per play session, feeds it
//! XP grants, and reacts to the events it emits; everything else (UI bars,
//! reward tables, save files) lives with the host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Level cap, curve checkpoints, default curve shape |
//! | [`curve`] | Two-phase geometric XP table construction and level resolution |
//! | [`engine`] | XP counter, derived level, bonus levels, caller-facing API |
//! | [`events`] | XP-gain / level-up events with synchronous ordered delivery |
//! | [`snapshot`] | Versioned capture/restore for the host's save system |
//!
//! # Example
//!
//! ```
//! use driftisle_progression::engine::ProgressionEngine;
//! use driftisle_progression::events::ProgressionEvent;
//!
//! let mut progression = ProgressionEngine::new().unwrap();
//! progression.subscribe(|event| {
//!     if let ProgressionEvent::LevelUp { from, to } = event {
//!         println!("level {} -> {}", from, to);
//!     }
//! });
//!
//! progression.add_xp(2_500);
//! assert!(progression.level() >= 1);
//! ```

pub mod constants;
pub mod curve;
pub mod engine;
pub mod events;
pub mod snapshot;
