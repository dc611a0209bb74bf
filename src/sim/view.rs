//! Read-only render snapshot of a session
//!
//! A host draws one frame from a `Snapshot`: every live entity as a
//! playfield rect plus the bit of state that picks its sprite.

use serde::Serialize;

use super::geometry::Rect;
use super::session::{GameSession, SessionPhase};
use super::state::{BrickTier, PowerUpKind};

/// What a sprite shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpriteKind {
    Ball { stuck: bool },
    Paddle { scale: f32 },
    Brick { tier: BrickTier },
    PowerUp { kind: PowerUpKind },
}

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    #[serde(flatten)]
    pub kind: SpriteKind,
    pub rect: Rect,
}

/// Active effect with time left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub remaining_secs: f64,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// 1-based level number
    pub level: usize,
    pub phase: SessionPhase,
    /// Bricks, powerups, paddle, balls (back to front)
    pub sprites: Vec<Sprite>,
    pub active_effects: Vec<EffectView>,
}

impl GameSession {
    /// Capture the current frame; `now` is the session time in seconds
    pub fn snapshot(&self, now: f64) -> Snapshot {
        let level = &self.level;
        let bricks = level.bricks.iter().map(|brick| Sprite {
            kind: SpriteKind::Brick { tier: brick.tier },
            rect: brick.rect,
        });
        let powerups = level.powerups.iter().map(|powerup| Sprite {
            kind: SpriteKind::PowerUp { kind: powerup.kind },
            rect: powerup.rect(),
        });
        let paddle = std::iter::once(Sprite {
            kind: SpriteKind::Paddle {
                scale: level.paddle.scale_factor,
            },
            rect: level.paddle.rect(),
        });
        let balls = level.balls.iter().map(|ball| Sprite {
            kind: SpriteKind::Ball { stuck: ball.stuck },
            rect: ball.rect(),
        });

        Snapshot {
            level: self.level_index.min(self.level_count().saturating_sub(1)) + 1,
            phase: self.phase,
            sprites: bricks.chain(powerups).chain(paddle).chain(balls).collect(),
            active_effects: self
                .effects
                .active()
                .iter()
                .map(|effect| EffectView {
                    kind: effect.kind,
                    remaining_secs: (effect.expires_at - now).max(0.0),
                })
                .collect(),
        }
    }
}
