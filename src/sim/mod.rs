//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - One tick per frame, velocities in pixels per tick
//! - Every random choice goes through the session's seeded RNG
//! - Stable iteration order (insertion order of balls and blocks)
//! - No rendering, audio or storage dependencies

pub mod geometry;
pub mod levels;
pub mod phase;
pub mod state;
pub mod tick;

pub use geometry::{Axis, Contact, Rect, circle_rect_contact, circle_rect_overlap, reflect, rotate};
pub use levels::{LevelLayout, generate, target_block_count};
pub use phase::{GamePhase, PhaseCommand};
pub use state::{
    Ball, BallRole, Block, BlockHit, GameEvent, GameSession, Paddle, Pickup, PickupKind,
};
pub use tick::{TickInput, tick};
