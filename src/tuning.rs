//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults mirror `consts`;
//! [`Tuning::for_screen`] applies the adaptive mobile table and
//! [`Tuning::from_json`] overlays a partial JSON document on the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance and entity sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub level_count: u32,
    pub starting_lives: u32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_bottom_offset: f32,

    pub ball_radius: f32,
    pub ball_speed: f32,
    pub ball_launch_offset: f32,
    pub level_speed_step: f32,

    pub block_width: f32,
    pub block_height: f32,
    pub block_padding: f32,
    pub field_top: f32,
    pub paddle_clearance: f32,
    pub overlap_padding: f32,
    pub max_pattern_iterations: u32,

    pub paddle_hit_score: u64,
    pub block_destroy_score: u64,
    pub secondary_loss_penalty: u64,

    pub life_pickup_interval: u64,
    pub widen_pickup_interval: u64,
    pub pickup_size: f32,
    pub pickup_fall_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_count: LEVEL_COUNT,
            starting_lives: STARTING_LIVES,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            ball_launch_offset: BALL_LAUNCH_OFFSET,
            level_speed_step: LEVEL_SPEED_STEP,

            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_padding: BLOCK_PADDING,
            field_top: FIELD_TOP,
            paddle_clearance: PADDLE_CLEARANCE,
            overlap_padding: OVERLAP_PADDING,
            max_pattern_iterations: MAX_PATTERN_ITERATIONS,

            paddle_hit_score: PADDLE_HIT_SCORE,
            block_destroy_score: BLOCK_DESTROY_SCORE,
            secondary_loss_penalty: SECONDARY_LOSS_PENALTY,

            life_pickup_interval: LIFE_PICKUP_INTERVAL,
            widen_pickup_interval: WIDEN_PICKUP_INTERVAL,
            pickup_size: PICKUP_SIZE,
            pickup_fall_speed: PICKUP_FALL_SPEED,
        }
    }
}

impl Tuning {
    /// Sizing adapted to the screen. Narrow screens get blocks and paddle
    /// scaled to their width; wide screens keep the desktop table.
    pub fn for_screen(width: f32, height: f32) -> Self {
        let mut tuning = Self::default();
        if width < MOBILE_BREAKPOINT {
            let block_width = (width / 12.0).floor().max(25.0);
            tuning.block_width = block_width;
            tuning.block_height = (block_width * 0.5).floor().max(15.0);
            tuning.block_padding = (block_width * 0.1).floor().max(2.0);
            tuning.paddle_height = (height * 0.02).floor().max(12.0);
            tuning.paddle_width = (width * 0.25).floor().max(80.0);
            tuning.ball_radius = (width * 0.015).floor().max(6.0);
            tuning.ball_speed = 4.0;
            tuning.paddle_speed = 6.0;
        }
        tuning
    }

    /// Apply the screen's sizing to every size field still at its default.
    /// Sizes an overlay set explicitly are kept on every screen.
    pub fn adapted_to(mut self, width: f32, height: f32) -> Self {
        let defaults = Self::default();
        let screen = Self::for_screen(width, height);
        let pick = |value: f32, default: f32, sized: f32| if value == default { sized } else { value };

        self.block_width = pick(self.block_width, defaults.block_width, screen.block_width);
        self.block_height = pick(self.block_height, defaults.block_height, screen.block_height);
        self.block_padding = pick(self.block_padding, defaults.block_padding, screen.block_padding);
        self.paddle_height = pick(self.paddle_height, defaults.paddle_height, screen.paddle_height);
        self.paddle_width = pick(self.paddle_width, defaults.paddle_width, screen.paddle_width);
        self.ball_radius = pick(self.ball_radius, defaults.ball_radius, screen.ball_radius);
        self.ball_speed = pick(self.ball_speed, defaults.ball_speed, screen.ball_speed);
        self.paddle_speed = pick(self.paddle_speed, defaults.paddle_speed, screen.paddle_speed);
        self
    }

    /// Parse a (possibly partial) JSON overlay; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Launch speed for a level: linear 1% per level above the first
    pub fn level_speed(&self, level: u32) -> f32 {
        self.ball_speed * (1.0 + self.level_speed_step * level.saturating_sub(1) as f32)
    }

    /// Clamp a requested level index into `[1, level_count]`
    pub fn clamp_level(&self, level: u32) -> u32 {
        level.clamp(1, self.level_count.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_sizes() {
        let tuning = Tuning::for_screen(1280.0, 720.0);
        assert_eq!(tuning.block_width, 40.0);
        assert_eq!(tuning.block_height, 20.0);
        assert_eq!(tuning.block_padding, 5.0);
        assert_eq!(tuning.ball_speed, 5.0);
    }

    #[test]
    fn test_mobile_sizes() {
        let tuning = Tuning::for_screen(360.0, 640.0);
        // floor(360 / 12) = 30
        assert_eq!(tuning.block_width, 30.0);
        assert_eq!(tuning.block_height, 15.0);
        assert_eq!(tuning.block_padding, 3.0);
        assert_eq!(tuning.paddle_width, 90.0);
        assert_eq!(tuning.paddle_height, 12.0);
        assert_eq!(tuning.ball_radius, 6.0);
        assert_eq!(tuning.ball_speed, 4.0);
        assert_eq!(tuning.paddle_speed, 6.0);
    }

    #[test]
    fn test_level_speed_is_linear() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_speed(1), tuning.ball_speed);
        assert!((tuning.level_speed(5) - tuning.ball_speed * 1.04).abs() < 1e-5);
        assert!((tuning.level_speed(30) - tuning.ball_speed * 1.29).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.clamp_level(0), 1);
        assert_eq!(tuning.clamp_level(12), 12);
        assert_eq!(tuning.clamp_level(99), 30);
    }

    #[test]
    fn test_overlay_sizes_survive_adaptation() {
        let overlay = Tuning::from_json(r#"{ "block_width": 30, "paddle_width": 150 }"#).unwrap();

        let desktop = overlay.clone().adapted_to(1280.0, 720.0);
        assert_eq!(desktop.block_width, 30.0);
        assert_eq!(desktop.paddle_width, 150.0);

        let mobile = overlay.adapted_to(360.0, 640.0);
        assert_eq!(mobile.block_width, 30.0);
        assert_eq!(mobile.paddle_width, 150.0);
        // Fields the overlay left alone still follow the screen
        assert_eq!(mobile.ball_radius, 6.0);
        assert_eq!(mobile.ball_speed, 4.0);
    }

    #[test]
    fn test_json_overlay_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 5, "ball_speed": 6.5 }"#).unwrap();
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.ball_speed, 6.5);
        assert_eq!(tuning.block_width, BLOCK_WIDTH);
        assert_eq!(tuning.level_count, LEVEL_COUNT);
    }
}
