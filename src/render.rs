//! Render seam
//!
//! The core draws nothing itself. After each tick the host passes a
//! [`RenderSink`] to [`draw_frame`], which reads the session and issues one
//! call per visible entity. [`DrawList`] is a sink that records those calls
//! as serializable commands for hosts that draw elsewhere (the browser
//! canvas, tests).

use serde::Serialize;

use crate::sim::{Ball, Block, GameSession, Paddle, Pickup, PickupKind};

/// Receives draw calls for one frame
pub trait RenderSink {
    fn draw_paddle(&mut self, paddle: &Paddle);
    fn draw_ball(&mut self, ball: &Ball);
    /// Only called for blocks that are still alive
    fn draw_block(&mut self, block: &Block);
    fn draw_pickup(&mut self, pickup: &Pickup);
}

/// Issue draw calls for the session, back to front: blocks, pickups,
/// paddle, balls
pub fn draw_frame(session: &GameSession, sink: &mut dyn RenderSink) {
    for block in session.blocks.iter().filter(|b| b.is_alive()) {
        sink.draw_block(block);
    }
    for pickup in &session.pickups {
        sink.draw_pickup(pickup);
    }
    sink.draw_paddle(&session.paddle);
    for ball in &session.balls {
        sink.draw_ball(ball);
    }
}

/// Block color darkened by lost health: full color at full health, half
/// brightness when one hit from breaking
pub fn shaded_color(block: &Block) -> u32 {
    let factor = 0.5 + 0.5 * block.health_ratio();
    let channel = |shift: u32| {
        let c = ((block.color >> shift) & 0xff) as f32;
        ((c * factor).round() as u32).min(0xff) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Paddle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        widened: bool,
    },
    Ball {
        x: f32,
        y: f32,
        radius: f32,
        primary: bool,
    },
    Block {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: u32,
        health: u8,
    },
    Pickup {
        pickup: PickupKind,
        x: f32,
        y: f32,
        size: f32,
    },
}

/// Sink that records every call
#[derive(Debug, Default, Clone, Serialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }
}

impl RenderSink for DrawList {
    fn draw_paddle(&mut self, paddle: &Paddle) {
        self.commands.push(DrawCommand::Paddle {
            x: paddle.x,
            y: paddle.y,
            width: paddle.width,
            height: paddle.height,
            widened: paddle.is_widened(),
        });
    }

    fn draw_ball(&mut self, ball: &Ball) {
        self.commands.push(DrawCommand::Ball {
            x: ball.pos.x,
            y: ball.pos.y,
            radius: ball.radius,
            primary: ball.is_primary(),
        });
    }

    fn draw_block(&mut self, block: &Block) {
        self.commands.push(DrawCommand::Block {
            x: block.rect.x,
            y: block.rect.y,
            width: block.rect.width,
            height: block.rect.height,
            color: shaded_color(block),
            health: block.health,
        });
    }

    fn draw_pickup(&mut self, pickup: &Pickup) {
        self.commands.push(DrawCommand::Pickup {
            pickup: pickup.kind,
            x: pickup.rect.x,
            y: pickup.rect.y,
            size: pickup.rect.width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Rect;
    use crate::tuning::Tuning;

    #[test]
    fn test_destroyed_blocks_are_not_drawn() {
        let mut session = GameSession::new(Tuning::default(), 800.0, 600.0, 3);
        session.begin_run(1);
        let total = session.blocks.len();
        session.blocks[0].hit();
        session.blocks[0].destroyed = true;

        let mut list = DrawList::new();
        draw_frame(&session, &mut list);
        let blocks = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Block { .. }))
            .count();
        assert_eq!(blocks, total - 1);
        assert!(matches!(list.commands.last(), Some(DrawCommand::Ball { primary: true, .. })));
    }

    #[test]
    fn test_shaded_color() {
        let mut block = Block::new(1, Rect::new(0.0, 0.0, 40.0, 20.0), 2, 0x80ff40);
        assert_eq!(shaded_color(&block), 0x80ff40);
        block.hit();
        // Three quarters brightness at half health
        assert_eq!(shaded_color(&block), 0x60bf30);
    }

    #[test]
    fn test_draw_list_json_is_tagged() {
        let mut list = DrawList::new();
        list.draw_paddle(&Paddle::new(10.0, 20.0, 100.0, 15.0));
        let json = list.to_json().unwrap();
        assert!(json.starts_with(r#"[{"kind":"paddle""#));
    }
}
