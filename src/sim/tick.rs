//! Per-frame simulation step
//!
//! Advances one [`GameSession`] by exactly one tick. Velocities are in pixels
//! per tick, so there is no `dt`.

use glam::Vec2;
use rand::Rng;

use super::geometry::{circle_rect_contact, circle_rect_overlap, reflect, rotate};
use super::phase::PhaseCommand;
use super::state::{Ball, BallRole, Block, BlockHit, GameEvent, GameSession, Paddle, PickupKind};
use crate::{from_heading, heading};

/// Input sampled once at the start of a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
    /// Active drag position; takes priority over the keys
    pub pointer_x: Option<f32>,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Smallest random turn applied after a block bounce (radians)
const MIN_DEFLECTION: f32 = 10.0 * std::f32::consts::PI / 180.0;
/// Largest random turn applied after a block bounce (radians)
const MAX_DEFLECTION: f32 = 30.0 * std::f32::consts::PI / 180.0;
/// Spread of a split ball around its parent's heading (radians)
const SPLIT_SPREAD: f32 = 0.5;
/// Paddle edge deflection (45 degrees either side of vertical)
const PADDLE_MAX_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Advance the game state by one tick
pub fn tick(state: &mut GameSession, input: &TickInput) {
    if input.pause {
        state.transition(PhaseCommand::TogglePause);
    }
    if !state.phase.is_running() {
        return;
    }

    state.time_ticks += 1;
    let score_before = state.score;

    // 1. Paddle
    move_paddle(&mut state.paddle, input, state.tuning.paddle_speed);
    state.paddle.update(state.width);

    // 2-4. Balls
    let primary_lost = update_balls(state);
    if primary_lost {
        lose_life(state);
    }

    if state.phase.is_running() {
        // 5. Level clear. A field with no room for blocks waits for a
        // resize instead of counting as cleared.
        if !state.blocks.is_empty() && state.remaining_blocks() == 0 {
            clear_level(state);
        }
    }

    if state.phase.is_running() {
        // 6-7. Pickups
        spawn_pickups(state);
        update_pickups(state);

        // 8. Fallback: primary loss always respawns, so this only guards
        // against a session that was left without balls
        if state.balls.is_empty() {
            log::warn!("No balls left in play, respawning primary ball");
            state.spawn_primary_ball();
        }
    }

    if state.score != score_before {
        state.emit(GameEvent::ScoreChanged(state.score));
    }
}

fn move_paddle(paddle: &mut Paddle, input: &TickInput, speed: f32) {
    if let Some(x) = input.pointer_x {
        paddle.center_on(x);
        return;
    }
    if input.left {
        paddle.x -= speed;
    }
    if input.right {
        paddle.x += speed;
    }
}

/// Integrate, cull and collide every ball. Returns true if the primary ball
/// left the screen.
fn update_balls(state: &mut GameSession) -> bool {
    let tuning = state.tuning.clone();
    let mut primary_lost = false;
    let mut splits: Vec<(Vec2, Vec2)> = Vec::new();

    let mut i = 0;
    while i < state.balls.len() {
        let ball = &mut state.balls[i];
        ball.update(state.width);

        if ball.is_out_of_bounds(state.height) {
            let lost = state.balls.remove(i);
            match lost.role {
                BallRole::Primary => primary_lost = true,
                BallRole::Secondary => {
                    state.score = state.score.saturating_sub(tuning.secondary_loss_penalty);
                }
            }
            state.events.push(GameEvent::BallLost { role: lost.role });
            continue;
        }

        if bounce_off_paddle(ball, &state.paddle) {
            state.score += tuning.paddle_hit_score;
            state.events.push(GameEvent::PaddleHit);
        }

        if let Some((block_id, hit)) = bounce_off_blocks(ball, &mut state.blocks, &mut state.rng) {
            match hit {
                BlockHit::Destroyed => {
                    state.score += tuning.block_destroy_score;
                    state.events.push(GameEvent::BlockDestroyed { block_id });

                    let speed = ball.speed();
                    let angle = heading(ball.vel) + (state.rng.random::<f32>() - 0.5) * SPLIT_SPREAD;
                    splits.push((ball.pos, from_heading(angle, speed)));
                }
                BlockHit::Damaged => state.events.push(GameEvent::BlockDamaged { block_id }),
                BlockHit::Ignored => {}
            }
        }

        i += 1;
    }

    for (pos, vel) in splits {
        let id = state.next_entity_id();
        state
            .balls
            .push(Ball::new(id, pos, vel, tuning.ball_radius, BallRole::Secondary));
    }

    primary_lost
}

/// Paddle bounce: the outgoing angle depends only on where the ball struck,
/// from -45 degrees at the left edge to +45 at the right. Speed is kept.
fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    let rect = paddle.rect();
    if !circle_rect_overlap(ball.pos, ball.radius, &rect) {
        return false;
    }

    let offset = ((ball.pos.x - rect.x) / rect.width).clamp(0.0, 1.0);
    let angle = (offset - 0.5) * 2.0 * PADDLE_MAX_ANGLE;
    let speed = ball.speed();
    ball.vel = Vec2::new(angle.sin() * speed, -angle.cos() * speed);
    // Sit on the top face so the same contact does not score again
    ball.pos.y = ball.pos.y.min(rect.y - ball.radius);
    true
}

/// Collide with the first live block that overlaps, newest first. The ball
/// reflects off the face it hit and is then turned by a random 10-30 degrees.
fn bounce_off_blocks(
    ball: &mut Ball,
    blocks: &mut [Block],
    rng: &mut impl Rng,
) -> Option<(u32, BlockHit)> {
    let (block, contact) = blocks.iter_mut().rev().find_map(|block| {
        if !block.is_alive() {
            return None;
        }
        circle_rect_contact(ball.pos, ball.radius, &block.rect).map(|c| (block, c))
    })?;

    let hit = block.hit();
    let turn = rng.random_range(MIN_DEFLECTION..=MAX_DEFLECTION);
    let turn = if rng.random_bool(0.5) { turn } else { -turn };
    ball.vel = rotate(reflect(ball.vel, contact.reflection_axis()), turn);
    Some((block.id, hit))
}

/// Primary ball lost: one life down and a fresh primary at the launch point.
/// The ball is respawned even when this was the last life.
fn lose_life(state: &mut GameSession) {
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LifeChanged(state.lives));
    state.spawn_primary_ball();

    if state.lives == 0 && state.transition(PhaseCommand::LivesExhausted) {
        log::info!("Game over on level {} with score {}", state.level, state.score);
        state.emit(GameEvent::GameOver);
    }
}

fn clear_level(state: &mut GameSession) {
    let cleared = state.level;
    if cleared >= state.tuning.level_count {
        if state.transition(PhaseCommand::LevelsCleared) {
            log::info!("All {} levels cleared, final score {}", cleared, state.score);
            state.emit(GameEvent::Win);
        }
        return;
    }

    let next = cleared + 1;
    state.load_level(next);
    if next > state.unlocked_level {
        state.unlocked_level = next;
        state.emit(GameEvent::LevelUnlocked(next));
    }
    log::info!("Level {} cleared, advancing to {}", cleared, next);
    state.emit(GameEvent::LevelComplete { cleared, next });
}

/// Spawn a pickup each time the score reaches a new multiple of its interval
fn spawn_pickups(state: &mut GameSession) {
    let life_interval = state.tuning.life_pickup_interval;
    if life_interval > 0 && state.score >= state.last_life_pickup_score + life_interval {
        state.last_life_pickup_score = state.score / life_interval * life_interval;
        state.spawn_pickup(PickupKind::Life);
    }

    let widen_interval = state.tuning.widen_pickup_interval;
    if widen_interval > 0 && state.score >= state.last_widen_pickup_score + widen_interval {
        state.last_widen_pickup_score = state.score / widen_interval * widen_interval;
        state.spawn_pickup(PickupKind::WidenPaddle);
    }
}

fn update_pickups(state: &mut GameSession) {
    let paddle_rect = state.paddle.rect();
    let mut collected = Vec::new();

    state.pickups.retain_mut(|pickup| {
        pickup.update();
        if pickup.is_out_of_bounds(state.height) {
            return false;
        }
        if pickup.rect.intersects(&paddle_rect) {
            collected.push(pickup.kind);
            return false;
        }
        true
    });

    for kind in collected {
        match kind {
            PickupKind::Life => {
                state.lives += 1;
                state.emit(GameEvent::LifeChanged(state.lives));
            }
            PickupKind::WidenPaddle => {
                state.paddle.widen();
                state.paddle.update(state.width);
            }
        }
        state.emit(GameEvent::PickupCollected(kind));
    }
}
