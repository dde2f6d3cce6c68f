//! Game session and entity types
//!
//! All mutable run state lives in [`GameSession`]; the tick owns it
//! exclusively while it runs and renderers only read it afterwards.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::levels::{self, LevelLayout};
use super::phase::{GamePhase, PhaseCommand};
use crate::tuning::Tuning;

/// Whether losing a ball costs a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallRole {
    /// First ball of a life; losing it costs a life and respawns it
    Primary,
    /// Split off a destroyed block; losing it only costs score
    Secondary,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub role: BallRole,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, role: BallRole) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            role,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.role == BallRole::Primary
    }

    /// Integrate one tick and bounce off the side and top walls.
    /// The bottom edge is open.
    pub fn update(&mut self, screen_width: f32) {
        self.pos += self.vel;

        let min_x = self.radius;
        let max_x = (screen_width - self.radius).max(min_x);
        if (self.pos.x <= min_x && self.vel.x < 0.0) || (self.pos.x >= max_x && self.vel.x > 0.0) {
            self.vel.x = -self.vel.x;
        }
        self.pos.x = self.pos.x.clamp(min_x, max_x);

        if self.pos.y - self.radius <= 0.0 {
            if self.vel.y < 0.0 {
                self.vel.y = -self.vel.y;
            }
            self.pos.y = self.radius;
        }
    }

    /// Fully below the bottom edge
    pub fn is_out_of_bounds(&self, screen_height: f32) -> bool {
        self.pos.y - self.radius > screen_height
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (resting height, never changes during play)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Width before any widen pickup
    pub base_width: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            base_width: width,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center the paddle on a pointer position
    pub fn center_on(&mut self, x: f32) {
        self.x = x - self.width / 2.0;
    }

    /// Clamp fully inside `[0, screen_width]`
    pub fn update(&mut self, screen_width: f32) {
        self.x = self.x.clamp(0.0, (screen_width - self.width).max(0.0));
    }

    /// Double the width around the current center
    pub fn widen(&mut self) {
        let center = self.center_x();
        self.width = self.base_width * 2.0;
        self.center_on(center);
    }

    pub fn is_widened(&self) -> bool {
        self.width > self.base_width
    }

    pub fn reset_width(&mut self) {
        let center = self.center_x();
        self.width = self.base_width;
        self.center_on(center);
    }
}

/// Outcome of a ball striking a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHit {
    Damaged,
    Destroyed,
    /// Block was already destroyed
    Ignored,
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
    pub health: u8,
    pub max_health: u8,
    /// Destroyed blocks stay in the collection but no longer collide or draw
    pub destroyed: bool,
    /// 0xRRGGBB
    pub color: u32,
}

impl Block {
    pub fn new(id: u32, rect: Rect, health: u8, color: u32) -> Self {
        Self {
            id,
            rect,
            health,
            max_health: health,
            destroyed: health == 0,
            color,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.destroyed
    }

    /// Take one point of damage
    pub fn hit(&mut self) -> BlockHit {
        if self.destroyed {
            return BlockHit::Ignored;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.destroyed = true;
            BlockHit::Destroyed
        } else {
            BlockHit::Damaged
        }
    }

    /// Remaining health as a fraction of the starting health
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

/// Falling collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Heart: +1 life
    Life,
    /// Platform bonus: doubled paddle width until the level ends
    WidenPaddle,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub rect: Rect,
    /// Pixels per tick, downward
    pub speed: f32,
}

impl Pickup {
    pub fn update(&mut self) {
        self.rect.y += self.speed;
    }

    /// Top edge below the bottom of the screen
    pub fn is_out_of_bounds(&self, screen_height: f32) -> bool {
        self.rect.y > screen_height
    }
}

/// Domain events raised by the simulation for the UI, audio and
/// persistence adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LifeChanged(u32),
    PhaseChanged { from: GamePhase, to: GamePhase },
    PaddleHit,
    BlockDamaged { block_id: u32 },
    BlockDestroyed { block_id: u32 },
    BallLost { role: BallRole },
    PickupSpawned(PickupKind),
    PickupCollected(PickupKind),
    LevelComplete { cleared: u32, next: u32 },
    /// A level index beyond the previous high-water mark was reached
    LevelUnlocked(u32),
    GameOver,
    Win,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Balance in effect, sized for the current screen
    pub tuning: Tuning,
    /// Balance as supplied, before screen sizing
    base_tuning: Tuning,
    pub width: f32,
    pub height: f32,
    /// Current level index (1-based)
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    /// Highest level ever reached, including earlier sessions
    pub unlocked_level: u32,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    /// Destroyed blocks are kept and flagged
    pub blocks: Vec<Block>,
    pub pickups: Vec<Pickup>,
    /// Last multiple of the life interval that spawned a pickup
    pub last_life_pickup_score: u64,
    /// Last multiple of the widen interval that spawned a pickup
    pub last_widen_pickup_score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameSession {
    /// Create an idle session on the title screen. Size fields of `tuning`
    /// left at their defaults are adapted to the screen.
    pub fn new(tuning: Tuning, width: f32, height: f32, seed: u64) -> Self {
        let base_tuning = tuning;
        let tuning = base_tuning.clone().adapted_to(width, height);
        let paddle = Self::rest_paddle(&tuning, width, height);
        Self {
            lives: tuning.starting_lives,
            tuning,
            base_tuning,
            width,
            height,
            level: 1,
            score: 0,
            unlocked_level: 1,
            phase: GamePhase::Start,
            paddle,
            balls: Vec::new(),
            blocks: Vec::new(),
            pickups: Vec::new(),
            last_life_pickup_score: 0,
            last_widen_pickup_score: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn rest_paddle(tuning: &Tuning, width: f32, height: f32) -> Paddle {
        Paddle::new(
            width / 2.0 - tuning.paddle_width / 2.0,
            height - tuning.paddle_bottom_offset,
            tuning.paddle_width,
            tuning.paddle_height,
        )
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Level geometry for the current screen
    pub fn layout(&self) -> LevelLayout {
        LevelLayout::new(&self.tuning, self.width, self.height)
    }

    /// Reset score, lives and pickups, then load `level`
    pub fn begin_run(&mut self, level: u32) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.last_life_pickup_score = 0;
        self.last_widen_pickup_score = 0;
        self.pickups.clear();
        self.paddle = Self::rest_paddle(&self.tuning, self.width, self.height);
        self.load_level(level);
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::LifeChanged(self.lives));
    }

    /// Generate `level`, reset to a single primary ball and restore the
    /// paddle width
    pub fn load_level(&mut self, level: u32) {
        let level = self.tuning.clamp_level(level);
        self.level = level;
        let layout = self.layout();
        self.blocks = levels::generate(level, &layout, &mut self.rng);
        log::info!("Level {} generated: {} blocks", level, self.blocks.len());

        self.paddle.reset_width();
        self.paddle.update(self.width);
        self.balls.clear();
        self.spawn_primary_ball();
    }

    /// Spawn the life-bearing ball at the launch point with a random
    /// horizontal component and the level's vertical launch speed
    pub fn spawn_primary_ball(&mut self) {
        let speed = self.tuning.level_speed(self.level);
        let vx = (self.rng.random::<f32>() - 0.5) * speed;
        let pos = Vec2::new(
            self.width / 2.0,
            self.height - self.tuning.ball_launch_offset,
        );
        let id = self.next_entity_id();
        self.balls.push(Ball::new(
            id,
            pos,
            Vec2::new(vx, -speed),
            self.tuning.ball_radius,
            BallRole::Primary,
        ));
    }

    /// Spawn a falling pickup at a random horizontal position above the screen
    pub fn spawn_pickup(&mut self, kind: PickupKind) {
        let size = self.tuning.pickup_size;
        let x = self.rng.random::<f32>() * (self.width - size).max(0.0);
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            rect: Rect::new(x, -size, size, size),
            speed: self.tuning.pickup_fall_speed,
        });
        self.emit(GameEvent::PickupSpawned(kind));
    }

    pub fn remaining_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_alive()).count()
    }

    /// Apply a phase command. Rejected commands leave the phase untouched.
    pub fn transition(&mut self, cmd: PhaseCommand) -> bool {
        match self.phase.apply(cmd) {
            Some(next) => {
                let from = self.phase;
                self.phase = next;
                self.emit(GameEvent::PhaseChanged { from, to: next });
                true
            }
            None => {
                log::debug!("Ignoring {:?} in phase {:?}", cmd, self.phase);
                false
            }
        }
    }

    /// New screen dimensions; while a level is on screen it is regenerated
    /// for the new geometry
    pub fn resize(&mut self, width: f32, height: f32) {
        self.tuning = self.base_tuning.clone().adapted_to(width, height);
        self.width = width;
        self.height = height;

        let was_widened = self.paddle.is_widened();
        let center = self.paddle.center_x();
        self.paddle = Self::rest_paddle(&self.tuning, width, height);
        self.paddle.center_on(center);
        if was_widened {
            self.paddle.widen();
        }
        self.paddle.update(width);

        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            let layout = self.layout();
            self.blocks = levels::generate(self.level, &layout, &mut self.rng);
            for ball in &mut self.balls {
                ball.radius = self.tuning.ball_radius;
            }
            log::info!(
                "Resized to {}x{}, level {} regenerated: {} blocks",
                width,
                height,
                self.level,
                self.blocks.len()
            );
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session() -> GameSession {
        GameSession::new(Tuning::default(), 800.0, 600.0, 7)
    }

    #[test]
    fn test_ball_bounces_off_side_walls() {
        let mut ball = Ball::new(1, Vec2::new(795.0, 300.0), Vec2::new(4.0, 3.0), 8.0, BallRole::Primary);
        ball.update(800.0);
        assert_eq!(ball.vel, Vec2::new(-4.0, 3.0));
        assert_eq!(ball.pos.x, 792.0);

        let mut ball = Ball::new(2, Vec2::new(5.0, 300.0), Vec2::new(-4.0, 3.0), 8.0, BallRole::Primary);
        ball.update(800.0);
        assert_eq!(ball.vel, Vec2::new(4.0, 3.0));
        assert_eq!(ball.pos.x, 8.0);
    }

    #[test]
    fn test_ball_bounces_off_top_not_bottom() {
        let mut ball = Ball::new(1, Vec2::new(100.0, 10.0), Vec2::new(0.0, -5.0), 8.0, BallRole::Primary);
        ball.update(800.0);
        assert_eq!(ball.vel.y, 5.0);
        assert_eq!(ball.pos.y, 8.0);

        let mut ball = Ball::new(2, Vec2::new(100.0, 605.0), Vec2::new(0.0, 5.0), 8.0, BallRole::Primary);
        ball.update(800.0);
        assert_eq!(ball.vel.y, 5.0);
        assert!(ball.is_out_of_bounds(600.0));
    }

    #[test]
    fn test_block_hit_decrements_to_destroyed() {
        let mut block = Block::new(0, Rect::new(0.0, 0.0, 40.0, 20.0), 2, 0xff6b6b);
        assert_eq!(block.hit(), BlockHit::Damaged);
        assert_eq!(block.health, 1);
        assert!(!block.destroyed);
        assert_eq!(block.hit(), BlockHit::Destroyed);
        assert_eq!(block.health, 0);
        assert!(block.destroyed);
        assert_eq!(block.hit(), BlockHit::Ignored);
        assert_eq!(block.health, 0);
    }

    #[test]
    fn test_paddle_widen_and_reset() {
        let mut paddle = Paddle::new(350.0, 560.0, 100.0, 15.0);
        paddle.widen();
        assert_eq!(paddle.width, 200.0);
        assert_eq!(paddle.center_x(), 400.0);
        // Widening twice does not compound
        paddle.widen();
        assert_eq!(paddle.width, 200.0);
        paddle.reset_width();
        assert_eq!(paddle.width, 100.0);
        assert!(!paddle.is_widened());
    }

    #[test]
    fn test_pickup_falls_and_leaves() {
        let mut pickup = Pickup {
            id: 1,
            kind: PickupKind::Life,
            rect: Rect::new(10.0, 598.0, 20.0, 20.0),
            speed: 3.0,
        };
        assert!(!pickup.is_out_of_bounds(600.0));
        pickup.update();
        assert!(pickup.is_out_of_bounds(600.0));
    }

    #[test]
    fn test_primary_ball_launch_speed_scales_with_level() {
        let mut state = session();
        state.level = 5;
        state.spawn_primary_ball();
        let ball = state.balls.last().unwrap();
        assert!(ball.is_primary());
        assert!((ball.vel.y + state.tuning.ball_speed * 1.04).abs() < 1e-5);
        assert!(ball.vel.x.abs() <= state.tuning.level_speed(5) / 2.0);
        assert_eq!(ball.pos, Vec2::new(400.0, 540.0));
    }

    #[test]
    fn test_begin_run_resets_state() {
        let mut state = session();
        state.score = 999;
        state.lives = 1;
        state.last_life_pickup_score = 15_000;
        state.begin_run(1);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.last_life_pickup_score, 0);
        assert_eq!(state.balls.len(), 1);
        assert!(state.remaining_blocks() > 0);
    }

    #[test]
    fn test_load_level_clamps_index() {
        let mut state = session();
        state.load_level(0);
        assert_eq!(state.level, 1);
        state.load_level(500);
        assert_eq!(state.level, 30);
    }

    #[test]
    fn test_transition_emits_phase_change() {
        let mut state = session();
        assert!(state.transition(PhaseCommand::Start));
        assert!(!state.transition(PhaseCommand::Start));
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Start,
                to: GamePhase::Playing
            }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_resize_regenerates_while_playing() {
        let mut state = session();
        state.transition(PhaseCommand::Start);
        state.begin_run(1);
        let before = state.blocks.len();
        state.resize(1600.0, 900.0);
        assert_eq!(state.width, 1600.0);
        assert_eq!(state.paddle.y, 860.0);
        assert!(state.blocks.len() > before);
    }

    proptest! {
        #[test]
        fn paddle_always_clamped(x in -5000.0f32..5000.0, width in 200.0f32..2000.0) {
            let mut paddle = Paddle::new(0.0, 0.0, 100.0, 15.0);
            paddle.center_on(x);
            paddle.update(width);
            prop_assert!(paddle.x >= 0.0);
            prop_assert!(paddle.x + paddle.width <= width + 1e-3);
        }

        #[test]
        fn wall_bounce_preserves_speed(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let mut ball = Ball::new(1, Vec2::new(x, y), Vec2::new(vx, vy), 8.0, BallRole::Secondary);
            let before = ball.speed();
            ball.update(800.0);
            prop_assert!((ball.speed() - before).abs() < 1e-4);
        }
    }
}
