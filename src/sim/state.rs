//! Entity types and their per-frame mutation rules

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{PaddleZone, PaddleZones};
use super::geometry::Rect;
use crate::consts::*;

/// Whether a ball survived its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallStatus {
    InPlay,
    /// Bottom edge reached the floor
    Lost,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Direction per axis, each component in {-1, 0, 1}
    pub dir: IVec2,
    /// Units travelled per tick along each non-zero axis
    pub speed: f32,
    /// Not launched yet (or caught again)
    pub stuck: bool,
    /// Rides the paddle while stuck
    pub attached_to_paddle: bool,
    /// Re-attach on the next paddle contact
    pub should_stick: bool,
}

impl Ball {
    /// A serve ball riding the paddle
    pub fn serve(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            dir: IVec2::ZERO,
            speed,
            stuck: true,
            attached_to_paddle: true,
            should_stick: false,
        }
    }

    /// A free-moving ball
    pub fn moving(pos: Vec2, dir: IVec2, speed: f32) -> Self {
        Self {
            pos,
            dir,
            speed,
            stuck: false,
            attached_to_paddle: false,
            should_stick: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(BALL_SIZE))
    }

    /// Displacement applied by one update
    pub fn velocity(&self) -> Vec2 {
        self.dir.as_vec2() * self.speed
    }

    /// Whether the ball follows the paddle instead of moving
    pub fn rides_paddle(&self) -> bool {
        self.stuck && self.attached_to_paddle
    }

    /// Snap a riding ball on top of the paddle
    pub fn follow_paddle(&mut self, paddle: &Paddle) {
        if self.stuck {
            self.pos.x = paddle.pos.x;
            self.pos.y = paddle.rect().top() + BALL_SIZE / 2.0;
        }
    }

    /// Advance one tick and reflect off the walls and ceiling
    pub fn update(&mut self) -> BallStatus {
        if !self.stuck {
            self.pos += self.velocity();
        }

        let rect = self.rect();
        if rect.top() >= PLAYFIELD_HEIGHT {
            self.dir.y = -1;
        }
        if rect.right() >= PLAYFIELD_WIDTH {
            self.dir.x = -1;
        }
        if rect.left() <= 0.0 {
            self.dir.x = 1;
        }
        if rect.bottom() <= 0.0 {
            return BallStatus::Lost;
        }
        BallStatus::InPlay
    }

    /// Release a stuck ball upward in a random horizontal direction
    pub fn launch<R: Rng>(&mut self, rng: &mut R) {
        if self.stuck {
            self.dir = IVec2::new(if rng.random_bool(0.5) { 1 } else { -1 }, 1);
            self.stuck = false;
            self.attached_to_paddle = false;
        }
    }

    /// Bounce off a paddle zone: dy forced up, dx by zone, resting on the paddle
    pub fn bounce(&mut self, zone: PaddleZone, paddle_top: f32) {
        match zone {
            PaddleZone::Left => self.dir.x = -self.dir.x.abs(),
            PaddleZone::Right => self.dir.x = self.dir.x.abs(),
            PaddleZone::Center => {}
        }
        self.dir.y = 1;
        self.pos.y = paddle_top + 1.0 + BALL_SIZE / 2.0;
    }

    /// Re-attach to the paddle (catch powerup)
    pub fn catch(&mut self, paddle: &Paddle) {
        self.should_stick = false;
        self.stuck = true;
        self.attached_to_paddle = true;
        self.dir = IVec2::ZERO;
        self.follow_paddle(paddle);
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    /// Center position
    pub pos: Vec2,
    /// Horizontal direction in {-1, 0, 1}
    pub move_dir: i32,
    /// Units moved per tick
    pub speed: f32,
    /// Scale at level start
    pub original_scale: f32,
    /// Current scale (width and height multiplier)
    pub scale_factor: f32,
    zones: PaddleZones,
}

impl Paddle {
    /// Default paddle: centered, resting on the floor
    pub fn new(speed: f32) -> Self {
        let scale = PADDLE_ORIGINAL_SCALE;
        let pos = Vec2::new(PLAYFIELD_WIDTH / 2.0, PADDLE_BASE_HEIGHT * scale / 2.0);
        let mut paddle = Self {
            pos,
            move_dir: 0,
            speed,
            original_scale: scale,
            scale_factor: scale,
            zones: PaddleZones::default(),
        };
        paddle.update_zones();
        paddle
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(PADDLE_BASE_WIDTH, PADDLE_BASE_HEIGHT) * self.scale_factor
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size())
    }

    pub fn zones(&self) -> &PaddleZones {
        &self.zones
    }

    /// Smallest legal scale
    pub fn min_scale(&self) -> f32 {
        self.original_scale / MIN_SCALE_DIVISOR
    }

    /// Largest legal scale
    pub fn max_scale(&self) -> f32 {
        self.original_scale * MAX_SCALE_MULTIPLIER
    }

    /// Set the scale (clamped to bounds) and rebuild the zones right away
    pub fn set_scale(&mut self, scale: f32) {
        self.scale_factor = scale.clamp(self.min_scale(), self.max_scale());
        self.update_zones();
    }

    pub fn reset_scale(&mut self) {
        self.set_scale(self.original_scale);
    }

    /// Move, clamp to the playfield, rebuild the zones
    pub fn update(&mut self) {
        self.pos.x += self.move_dir as f32 * self.speed;

        let half_width = self.size().x / 2.0;
        if self.pos.x - half_width <= 0.0 {
            self.move_dir = 0;
            self.pos.x = half_width;
        } else if self.pos.x + half_width >= PLAYFIELD_WIDTH {
            self.move_dir = 0;
            self.pos.x = PLAYFIELD_WIDTH - half_width;
        }

        self.update_zones();
    }

    fn update_zones(&mut self) {
        self.zones = PaddleZones::around(self.pos, self.size().x);
    }
}

/// Brick durability tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickTier {
    Green,
    Yellow,
    Red,
}

impl BrickTier {
    /// Map a level cell code to a tier (`'1'`, `'2'`, `'3'`)
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(BrickTier::Green),
            '2' => Some(BrickTier::Yellow),
            '3' => Some(BrickTier::Red),
            _ => None,
        }
    }

    pub fn durability(self) -> u8 {
        match self {
            BrickTier::Green => 1,
            BrickTier::Yellow => 2,
            BrickTier::Red => 3,
        }
    }
}

/// Outcome of hitting a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// Still standing, now showing this tier
    Cracked(BrickTier),
    Destroyed,
}

/// A brick entity
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub durability: u8,
    /// Visual tier (cosmetic, follows durability)
    pub tier: BrickTier,
}

impl Brick {
    /// Place a brick by its top-left corner
    pub fn new(tier: BrickTier, left: f32, top: f32) -> Self {
        Self {
            rect: Rect::new(
                Vec2::new(left, top - BRICK_HEIGHT),
                Vec2::new(left + BRICK_WIDTH, top),
            ),
            durability: tier.durability(),
            tier,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.durability == 0
    }

    pub fn hit(&mut self) -> BrickHit {
        self.durability = self.durability.saturating_sub(1);
        match self.durability {
            0 => BrickHit::Destroyed,
            1 => {
                self.tier = BrickTier::Green;
                BrickHit::Cracked(self.tier)
            }
            2 => {
                self.tier = BrickTier::Yellow;
                BrickHit::Cracked(self.tier)
            }
            _ => BrickHit::Cracked(self.tier),
        }
    }
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    /// Next paddle contact catches one ball
    Green,
    /// Every ball splits into three
    White,
    /// Balls speed up
    Red,
    /// Balls slow down
    Yellow,
    /// Paddle grows
    Size,
    /// Paddle shrinks
    Unsize,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Green,
        PowerUpKind::White,
        PowerUpKind::Red,
        PowerUpKind::Yellow,
        PowerUpKind::Size,
        PowerUpKind::Unsize,
    ];

    /// Uniform pick over all kinds
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Green => "green",
            PowerUpKind::White => "white",
            PowerUpKind::Red => "red",
            PowerUpKind::Yellow => "yellow",
            PowerUpKind::Size => "size",
            PowerUpKind::Unsize => "unsize",
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Center position
    pub pos: Vec2,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self { kind, pos }
    }

    /// Roll the drop chance for a destroyed brick
    pub fn roll<R: Rng>(rng: &mut R, probability: f64, pos: Vec2) -> Option<Self> {
        if rng.random_bool(probability) {
            Some(Self::new(PowerUpKind::random(rng), pos))
        } else {
            None
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(POWERUP_SIZE))
    }

    /// Fall one tick; false once the bottom edge is below the floor
    pub fn fall(&mut self, speed: f32) -> bool {
        self.pos.y -= speed;
        self.rect().bottom() >= 0.0
    }
}

/// Events for fire-and-forget collaborators (audio, effects, HUD)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    BallsLaunched { count: usize },
    BrickCracked { tier: BrickTier },
    BrickDestroyed { pos: Vec2 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    EffectReverted { kind: PowerUpKind },
    PaddleBounce { zone: PaddleZone },
    BallCaught,
    BallLost,
    LevelAdvanced { level_index: usize },
    SessionComplete,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ball_moves_and_reflects_off_ceiling() {
        let mut ball = Ball::moving(
            Vec2::new(200.0, PLAYFIELD_HEIGHT - 10.0),
            IVec2::new(1, 1),
            7.0,
        );
        assert_eq!(ball.update(), BallStatus::InPlay);
        assert_eq!(ball.pos, Vec2::new(207.0, PLAYFIELD_HEIGHT - 3.0));
        assert_eq!(ball.dir, IVec2::new(1, -1));
    }

    #[test]
    fn test_ball_reflects_off_side_walls() {
        let mut ball = Ball::moving(Vec2::new(5.0, 500.0), IVec2::new(-1, 1), 7.0);
        ball.update();
        assert_eq!(ball.dir.x, 1);

        let mut ball = Ball::moving(Vec2::new(PLAYFIELD_WIDTH - 5.0, 500.0), IVec2::new(1, 1), 7.0);
        ball.update();
        assert_eq!(ball.dir.x, -1);
    }

    #[test]
    fn test_ball_lost_below_floor() {
        let mut ball = Ball::moving(Vec2::new(200.0, 12.0), IVec2::new(1, -1), 7.0);
        assert_eq!(ball.update(), BallStatus::Lost);
    }

    #[test]
    fn test_stuck_ball_does_not_move() {
        let mut ball = Ball::serve(Vec2::new(480.0, 50.0), 7.0);
        assert_eq!(ball.update(), BallStatus::InPlay);
        assert_eq!(ball.pos, Vec2::new(480.0, 50.0));
    }

    #[test]
    fn test_launch_goes_up_with_random_side() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = Ball::serve(Vec2::new(480.0, 50.0), 7.0);
        ball.launch(&mut rng);
        assert!(!ball.stuck);
        assert!(!ball.attached_to_paddle);
        assert_eq!(ball.dir.y, 1);
        assert_eq!(ball.dir.x.abs(), 1);

        // Launching a free ball changes nothing
        let before = ball.clone();
        ball.launch(&mut rng);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_follow_paddle_rests_on_top() {
        let paddle = Paddle::new(PADDLE_SPEED);
        let mut ball = Ball::serve(Vec2::new(0.0, 0.0), 7.0);
        ball.follow_paddle(&paddle);
        assert_eq!(ball.pos.x, paddle.pos.x);
        assert_eq!(ball.rect().bottom(), paddle.rect().top());
    }

    #[test]
    fn test_paddle_clamps_and_zeroes_velocity() {
        let mut paddle = Paddle::new(PADDLE_SPEED);
        paddle.move_dir = -1;
        for _ in 0..200 {
            paddle.update();
        }
        assert_eq!(paddle.rect().left(), 0.0);
        assert_eq!(paddle.move_dir, 0);

        paddle.move_dir = 1;
        for _ in 0..200 {
            paddle.update();
        }
        assert_eq!(paddle.rect().right(), PLAYFIELD_WIDTH);
        assert_eq!(paddle.move_dir, 0);
    }

    #[test]
    fn test_paddle_scale_bounds() {
        let mut paddle = Paddle::new(PADDLE_SPEED);
        paddle.set_scale(100.0);
        assert_eq!(paddle.scale_factor, PADDLE_ORIGINAL_SCALE * 2.0);
        paddle.set_scale(0.01);
        assert_eq!(paddle.scale_factor, PADDLE_ORIGINAL_SCALE / 1.6);
        paddle.reset_scale();
        assert_eq!(paddle.scale_factor, PADDLE_ORIGINAL_SCALE);
    }

    #[test]
    fn test_zones_follow_scale_immediately() {
        let mut paddle = Paddle::new(PADDLE_SPEED);
        let before = paddle.zones().right.center.x;
        paddle.set_scale(paddle.original_scale * 2.0);
        assert!(paddle.zones().right.center.x > before);
        assert_eq!(paddle.zones().right.radius, paddle.size().x / 6.0);
    }

    #[test]
    fn test_red_brick_cracks_down_to_destroyed() {
        let mut brick = Brick::new(BrickTier::Red, 0.0, PLAYFIELD_HEIGHT);
        assert_eq!(brick.hit(), BrickHit::Cracked(BrickTier::Yellow));
        assert_eq!(brick.hit(), BrickHit::Cracked(BrickTier::Green));
        assert_eq!(brick.hit(), BrickHit::Destroyed);
        assert!(brick.is_destroyed());
        // Extra hits never underflow
        assert_eq!(brick.hit(), BrickHit::Destroyed);
        assert_eq!(brick.durability, 0);
    }

    #[test]
    fn test_brick_codes() {
        assert_eq!(BrickTier::from_code('1'), Some(BrickTier::Green));
        assert_eq!(BrickTier::from_code('2'), Some(BrickTier::Yellow));
        assert_eq!(BrickTier::from_code('3'), Some(BrickTier::Red));
        assert_eq!(BrickTier::from_code('0'), None);
        assert_eq!(BrickTier::from_code('#'), None);
    }

    #[test]
    fn test_powerup_roll_respects_probability() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(PowerUp::roll(&mut rng, 0.0, Vec2::ZERO).is_none());
        assert!(PowerUp::roll(&mut rng, 1.0, Vec2::ZERO).is_some());
    }

    #[test]
    fn test_powerup_falls_off_screen() {
        let mut powerup = PowerUp::new(PowerUpKind::Red, Vec2::new(100.0, 14.0));
        assert!(powerup.fall(POWERUP_FALL_SPEED));
        assert!(!powerup.fall(POWERUP_FALL_SPEED));
    }
}
