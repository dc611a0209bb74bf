//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay host-agnostic:
//! - One `tick` per frame, wall-clock time passed in by the host
//! - Seeded RNG only
//! - Stable iteration order (entity insertion order)
//! - No rendering, audio or input device dependencies

pub mod collision;
pub mod effects;
pub mod geometry;
pub mod level;
pub mod session;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{PaddleZone, PaddleZones, ball_paddle_collision, bricks_hit};
pub use effects::{ActiveEffect, EffectManager, EffectTarget, apply_effect, revert_effect};
pub use geometry::{Circle, Rect};
pub use level::{LevelDir, LevelGrid, LevelSet, LevelSource};
pub use session::{GameSession, LevelState, SessionOutcome, SessionPhase};
pub use state::{
    Ball, BallStatus, Brick, BrickHit, BrickTier, GameEvent, Paddle, PowerUp, PowerUpKind,
};
pub use tick::{Intent, TickInput, tick};
pub use view::{EffectView, Snapshot, Sprite, SpriteKind};
