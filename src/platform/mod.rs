//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, touch/mouse drag)
//! - Browser bindings (WASM only)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputState, KeyAction};
