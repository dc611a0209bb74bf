//! Per-frame simulation tick
//!
//! Advances a session by one frame in a fixed order:
//! effects → balls → bricks → paddle → level checks → powerups → paddle bounces.

use super::collision::{ball_paddle_collision, bricks_hit};
use super::session::{GameSession, SessionOutcome};
use super::state::{BallStatus, BrickHit, GameEvent, PowerUp};

/// Discrete player intents, already decoupled from device codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    /// Release every stuck ball
    Launch,
    /// Skip to the next level
    AdvanceLevel,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents in arrival order
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn with(intent: Intent) -> Self {
        Self {
            intents: vec![intent],
        }
    }
}

/// Advance the session by one frame
///
/// `now` is session time in seconds and drives effect expiry. Returns the
/// terminal outcome once the session has ended.
pub fn tick(session: &mut GameSession, input: &TickInput, now: f64) -> Option<SessionOutcome> {
    session.clear_events();
    if session.is_over() {
        return session.outcome();
    }

    for &intent in &input.intents {
        apply_intent(session, intent);
        if session.is_over() {
            return session.outcome();
        }
    }

    session.time_ticks += 1;

    // 1. Timed effects: run due reversals, then prune the visible list
    let level = &mut session.level;
    let reverted = session
        .effects
        .fire_due(&mut level.balls, &mut level.paddle, now);
    session.effects.prune(now);
    for kind in reverted {
        session.emit(GameEvent::EffectReverted { kind });
    }

    // 2. Balls: riders follow the paddle, the rest move and reflect
    let level = &mut session.level;
    let mut lost = 0;
    level.balls.retain_mut(|ball| {
        if ball.rides_paddle() {
            ball.follow_paddle(&level.paddle);
            return true;
        }
        match ball.update() {
            BallStatus::InPlay => true,
            BallStatus::Lost => {
                lost += 1;
                false
            }
        }
    });
    for _ in 0..lost {
        session.emit(GameEvent::BallLost);
    }

    // 3. Bricks: one vertical flip per ball, every overlapped brick takes a hit
    let mut events = Vec::new();
    let probability = session.settings.powerup_probability;
    let level = &mut session.level;
    for ball in level.balls.iter_mut() {
        let hits = bricks_hit(ball, &level.bricks);
        if hits.is_empty() {
            continue;
        }
        ball.dir.y = -ball.dir.y;

        for idx in hits {
            let brick = &mut level.bricks[idx];
            match brick.hit() {
                BrickHit::Cracked(tier) => events.push(GameEvent::BrickCracked { tier }),
                BrickHit::Destroyed => {
                    let pos = brick.rect.center();
                    events.push(GameEvent::BrickDestroyed { pos });
                    if let Some(powerup) = PowerUp::roll(&mut session.rng, probability, pos) {
                        events.push(GameEvent::PowerUpSpawned {
                            kind: powerup.kind,
                        });
                        level.powerups.push(powerup);
                    }
                }
            }
        }
        level.bricks.retain(|brick| !brick.is_destroyed());
    }
    for event in events.drain(..) {
        session.emit(event);
    }

    // 4. Paddle
    session.level.paddle.update();

    // 5. Level checks
    if session.level.bricks.is_empty() {
        session.advance();
        return session.outcome();
    }
    if session.level.balls.is_empty() {
        session.lose();
        return session.outcome();
    }

    // 6. Falling powerups
    let fall_speed = session.settings.powerup_fall_speed;
    let level = &mut session.level;
    level.powerups.retain_mut(|powerup| powerup.fall(fall_speed));

    let paddle_rect = level.paddle.rect();
    let mut collected = Vec::new();
    level.powerups.retain(|powerup| {
        if powerup.rect().overlaps(&paddle_rect) {
            collected.push(powerup.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        let level = &mut session.level;
        session
            .effects
            .activate(kind, &mut level.balls, &mut level.paddle, now);
        session.emit(GameEvent::PowerUpCollected { kind });
    }

    // 7. Paddle bounces, or a catch when the ball is flagged to stick
    let level = &mut session.level;
    for ball in level.balls.iter_mut().filter(|ball| !ball.stuck) {
        let Some(zone) = ball_paddle_collision(ball, &level.paddle) else {
            continue;
        };
        if ball.should_stick {
            ball.catch(&level.paddle);
            events.push(GameEvent::BallCaught);
        } else {
            events.push(GameEvent::PaddleBounce { zone });
        }
    }
    for event in events {
        session.emit(event);
    }

    None
}

fn apply_intent(session: &mut GameSession, intent: Intent) {
    let move_dir = &mut session.level.paddle.move_dir;
    match intent {
        Intent::MoveLeftStart => *move_dir = -1,
        Intent::MoveRightStart => *move_dir = 1,
        Intent::MoveLeftStop if *move_dir < 0 => *move_dir = 0,
        Intent::MoveRightStop if *move_dir > 0 => *move_dir = 0,
        Intent::MoveLeftStop | Intent::MoveRightStop => {}
        Intent::Launch => {
            let mut launched = 0;
            for ball in session.level.balls.iter_mut().filter(|ball| ball.stuck) {
                ball.launch(&mut session.rng);
                launched += 1;
            }
            if launched > 0 {
                session.emit(GameEvent::BallsLaunched { count: launched });
            }
        }
        Intent::AdvanceLevel => session.advance(),
    }
}
