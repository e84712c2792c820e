//! Progression events - XP gain and level-up notifications, delivered
//! synchronously.
//!
//! The engine host wires UI, audio, and reward systems in as callbacks;
//! every mutation that produces an event invokes them in subscription order,
//! on the caller's thread, before the mutating call returns. The engine
//! itself never decides rewards; listeners react and decide.

use serde::{Deserialize, Serialize};

/// Notifications emitted by the progression engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// XP was granted. `total` is the counter after clamping, so a grant at
    /// the cap still reports the requested `amount` with an unchanged total.
    XpGained { amount: u64, total: u64 },
    /// The level rose. One event per grant, carrying the full span: a grant
    /// that crosses many thresholds reports `from` and `to` once, not once
    /// per intermediate level.
    LevelUp { from: u32, to: u32 },
}

/// A registered progression listener.
pub type ProgressionCallback = Box<dyn FnMut(&ProgressionEvent)>;

/// Ordered list of listeners with synchronous delivery.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<ProgressionCallback>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners are invoked in subscription order.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ProgressionEvent) + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    /// Deliver an event to every listener, in order, before returning.
    pub fn emit(&mut self, event: &ProgressionEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
