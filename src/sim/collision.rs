//! Collision detection and response
//!
//! Ball/brick and powerup/paddle contacts are plain box overlaps. Ball/paddle
//! contacts pick one of three circular zones along the paddle, which decides
//! the horizontal direction of the bounce.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};
use super::state::{Ball, Brick, Paddle};

/// One of the three horizontal regions of the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddleZone {
    Left,
    Center,
    Right,
}

/// The paddle's three zone circles
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaddleZones {
    pub left: Circle,
    pub center: Circle,
    pub right: Circle,
}

impl PaddleZones {
    /// Zones of radius width/6 at -width/3, 0 and +width/3 from the center
    pub fn around(center: Vec2, width: f32) -> Self {
        let radius = width / 6.0;
        let offset = Vec2::new(width / 3.0, 0.0);
        Self {
            left: Circle::new(center - offset, radius),
            center: Circle::new(center, radius),
            right: Circle::new(center + offset, radius),
        }
    }

    /// First zone the rect overlaps, checked left, right, center
    pub fn hit_zone(&self, rect: &Rect) -> Option<PaddleZone> {
        if self.left.overlaps_rect(rect) {
            Some(PaddleZone::Left)
        } else if self.right.overlaps_rect(rect) {
            Some(PaddleZone::Right)
        } else if self.center.overlaps_rect(rect) {
            Some(PaddleZone::Center)
        } else {
            None
        }
    }
}

/// Indices of every brick the ball overlaps, in brick order
pub fn bricks_hit(ball: &Ball, bricks: &[Brick]) -> Vec<usize> {
    let rect = ball.rect();
    bricks
        .iter()
        .enumerate()
        .filter(|(_, brick)| brick.rect.overlaps(&rect))
        .map(|(idx, _)| idx)
        .collect()
}

/// Bounce a ball off the paddle if they touch
///
/// Returns the zone used. Contacts in the gaps between zone circles
/// (the paddle's top corners) bounce as a center hit.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> Option<PaddleZone> {
    let ball_rect = ball.rect();
    let paddle_rect = paddle.rect();
    if !paddle_rect.overlaps(&ball_rect) {
        return None;
    }

    let zone = paddle
        .zones()
        .hit_zone(&ball_rect)
        .unwrap_or(PaddleZone::Center);
    ball.bounce(zone, paddle_rect.top());
    Some(zone)
}
