//! Brickfall - a single-screen ball-and-paddle block breaker
//!
//! Core modules:
//! - `sim`: Simulation (geometry, entities, level generation, tick, phases)
//! - `game`: Facade wiring the simulation to its collaborators
//! - `platform`: Input flags sampled once per tick, browser bindings
//! - `persistence`: Unlocked-level progress storage
//! - `tuning`: Data-driven game balance and adaptive sizing
//! - `render` / `audio`: Sink traits the presentation layer implements

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{EventSink, Game, Hud};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Number of levels in a full run
    pub const LEVEL_COUNT: u32 = 30;
    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 3;

    /// Width below which the mobile size table applies
    pub const MOBILE_BREAKPOINT: f32 = 768.0;

    /// Desktop paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Paddle rests this far above the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;

    /// Desktop ball defaults (speeds are pixels per tick)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 5.0;
    /// Fresh balls launch from this far above the bottom edge
    pub const BALL_LAUNCH_OFFSET: f32 = 60.0;
    /// Linear per-level speed-up of the launch speed
    pub const LEVEL_SPEED_STEP: f32 = 0.01;

    /// Desktop block defaults
    pub const BLOCK_WIDTH: f32 = 40.0;
    pub const BLOCK_HEIGHT: f32 = 20.0;
    pub const BLOCK_PADDING: f32 = 5.0;
    /// Top of the block field
    pub const FIELD_TOP: f32 = 50.0;
    /// Blocks keep this vertical gap above the paddle's resting y
    pub const PADDLE_CLEARANCE: f32 = 80.0;
    /// Minimum gap between generated blocks
    pub const OVERLAP_PADDING: f32 = 1.0;
    /// Hard ceiling on iterative pattern loops
    pub const MAX_PATTERN_ITERATIONS: u32 = 4096;

    /// Scoring
    pub const PADDLE_HIT_SCORE: u64 = 100;
    pub const BLOCK_DESTROY_SCORE: u64 = 50;
    pub const SECONDARY_LOSS_PENALTY: u64 = 25;

    /// Pickups
    pub const LIFE_PICKUP_INTERVAL: u64 = 15_000;
    pub const WIDEN_PICKUP_INTERVAL: u64 = 25_000;
    pub const PICKUP_SIZE: f32 = 20.0;
    pub const PICKUP_FALL_SPEED: f32 = 3.0;
}

/// Angle of a velocity vector (radians, screen coordinates with y down)
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}

/// Velocity with the given heading and speed
#[inline]
pub fn from_heading(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}
