//! Input event collection
//!
//! The host's event layer writes into [`InputState`] whenever keys or
//! pointers change; the game samples it once per tick. Key matching accepts
//! both physical codes and produced characters so that Cyrillic layouts
//! (ф/в on the A/D keys) work too.

use crate::sim::{GamePhase, TickInput};

/// What a key controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Pause,
}

impl KeyAction {
    /// Map a DOM `KeyboardEvent` (`code`, `key`) pair to an action
    pub fn from_key(code: &str, key: &str) -> Option<Self> {
        match (code, key) {
            ("KeyA" | "KeyF", _) | (_, "ArrowLeft" | "a" | "A" | "ф" | "Ф") => {
                Some(KeyAction::Left)
            }
            ("KeyD" | "KeyV", _) | (_, "ArrowRight" | "d" | "D" | "в" | "В") => {
                Some(KeyAction::Right)
            }
            ("Escape" | "KeyP" | "Space", _) | (_, "Escape" | "p" | "P" | " ") => {
                Some(KeyAction::Pause)
            }
            _ => None,
        }
    }
}

/// Held keys and pointer state between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    pointer_active: bool,
    pointer_x: f32,
    /// One-shot, cleared by [`InputState::sample`]
    pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Movement keys only register during play; pause also
    /// works while paused. Returns true if the key was consumed.
    pub fn key_down(&mut self, code: &str, key: &str, phase: GamePhase) -> bool {
        let Some(action) = KeyAction::from_key(code, key) else {
            return false;
        };
        match action {
            KeyAction::Left if phase.is_running() => self.left = true,
            KeyAction::Right if phase.is_running() => self.right = true,
            KeyAction::Pause if matches!(phase, GamePhase::Playing | GamePhase::Paused) => {
                self.pause_requested = true
            }
            _ => return false,
        }
        true
    }

    /// Key released. Always honoured so a key held across a pause does not stick.
    pub fn key_up(&mut self, code: &str, key: &str) -> bool {
        match KeyAction::from_key(code, key) {
            Some(KeyAction::Left) => self.left = false,
            Some(KeyAction::Right) => self.right = false,
            _ => return false,
        }
        true
    }

    /// Touch/drag start at screen x
    pub fn pointer_down(&mut self, x: f32, phase: GamePhase) {
        if phase.is_running() {
            self.pointer_active = true;
            self.pointer_x = x;
        }
    }

    pub fn pointer_move(&mut self, x: f32, phase: GamePhase) {
        if phase.is_running() && self.pointer_active {
            self.pointer_x = x;
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_active = false;
    }

    pub fn pointer_cancel(&mut self) {
        self.pointer_active = false;
    }

    /// Pause gesture from a UI button
    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Drop all held state (focus loss, screen change)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot for the next tick
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            pointer_x: self.pointer_active.then_some(self.pointer_x),
            pause: self.pause_requested,
        };
        self.pause_requested = false;
        input
    }
}
