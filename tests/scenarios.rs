//! Full-session scenarios driven through `tick`

use brickfall::consts::*;
use brickfall::sim::{
    Ball, Brick, BrickTier, GameEvent, GameSession, Intent, LevelSet, PowerUp, PowerUpKind,
    SessionOutcome, SessionPhase, TickInput, tick,
};
use brickfall::Settings;
use glam::{IVec2, Vec2};

fn session(levels: &[&str]) -> GameSession {
    let settings = Settings {
        seed: Some(2024),
        powerup_probability: 0.0,
        ..Default::default()
    };
    GameSession::from_source(&LevelSet::from_texts(levels.iter().copied()), settings).unwrap()
}

/// Drop a powerup right onto the paddle so the next tick collects it
fn drop_on_paddle(session: &mut GameSession, kind: PowerUpKind) {
    let paddle = &session.level.paddle;
    let pos = Vec2::new(paddle.pos.x, paddle.rect().top() + POWERUP_SIZE / 2.0);
    session.level.powerups.push(PowerUp::new(kind, pos));
}

#[test]
fn test_white_pickup_triples_balls() {
    let mut session = session(&["1"]);
    session.level.balls = vec![Ball::moving(Vec2::new(200.0, 500.0), IVec2::new(1, 1), 7.0)];
    drop_on_paddle(&mut session, PowerUpKind::White);

    tick(&mut session, &TickInput::default(), 0.0);
    let balls = &session.level.balls;
    assert_eq!(balls.len(), 3);
    assert_eq!(balls[1].pos, balls[0].pos);
    assert_eq!(balls[1].dir, IVec2::new(1, 1));
    assert_eq!(balls[2].dir, IVec2::new(-1, 1));
}

#[test]
fn test_red_brick_takes_three_hits() {
    let mut session = session(&["3", "1"]);
    let brick = session.level.bricks[0].clone();
    let below = Vec2::new(brick.rect.center().x, brick.rect.bottom() - BALL_SIZE / 2.0 - 3.0);

    let mut tiers = Vec::new();
    for _ in 0..3 {
        session.level.balls = vec![Ball::moving(below, IVec2::new(0, 1), 7.0)];
        tick(&mut session, &TickInput::default(), 0.0);
        tiers.push(session.level.bricks.first().map(|b| b.tier));
    }

    assert_eq!(
        tiers,
        vec![Some(BrickTier::Yellow), Some(BrickTier::Green), Some(BrickTier::Green)]
    );
    // The third hit cleared the level; level 2 is a single green brick
    assert_eq!(session.level_index, 1);
    assert_eq!(session.level.bricks.len(), 1);
}

#[test]
fn test_red_reverts_after_duration_at_any_frame_rate() {
    for hz in [30.0, 60.0, 144.0] {
        let mut session = session(&["1"]);
        session.level.balls = vec![Ball::moving(Vec2::new(480.0, 500.0), IVec2::ZERO, 7.0)];
        drop_on_paddle(&mut session, PowerUpKind::Red);

        let mut frame = 0u64;
        let mut reverted_at = None;
        while reverted_at.is_none() && frame < 10_000 {
            let now = frame as f64 / hz;
            tick(&mut session, &TickInput::default(), now);
            if session.level.balls[0].speed == 7.0 {
                reverted_at = Some(now);
            }
            frame += 1;
        }

        let at = reverted_at.unwrap();
        assert!(at >= EFFECT_DURATION_SECS, "{hz} Hz reverted early at {at}");
        assert!(at < EFFECT_DURATION_SECS + 1.0 / hz + 1e-9, "{hz} Hz reverted late at {at}");
    }
}

#[test]
fn test_reversal_survives_level_change() {
    let mut session = session(&["1", "1"]);
    drop_on_paddle(&mut session, PowerUpKind::Size);
    tick(&mut session, &TickInput::default(), 0.0);
    assert_eq!(session.level.paddle.scale_factor, PADDLE_ORIGINAL_SCALE * GROW_FACTOR);

    tick(&mut session, &TickInput::with(Intent::AdvanceLevel), 1.0);
    assert_eq!(session.level_index, 1);
    assert!(session.effects.active().is_empty());
    assert_eq!(session.effects.pending_count(), 1);

    // Fires against the fresh paddle, which is already at its original scale
    tick(&mut session, &TickInput::default(), EFFECT_DURATION_SECS);
    assert_eq!(session.effects.pending_count(), 0);
    assert_eq!(session.level.paddle.scale_factor, PADDLE_ORIGINAL_SCALE);
    assert!(
        session
            .drain_events()
            .contains(&GameEvent::EffectReverted { kind: PowerUpKind::Size })
    );
}

#[test]
fn test_green_pickup_catches_and_relaunches() {
    let mut session = session(&["1"]);
    let paddle_top = session.level.paddle.rect().top();
    session.level.balls = vec![Ball::moving(
        Vec2::new(480.0, paddle_top + 60.0),
        IVec2::new(0, -1),
        7.0,
    )];
    drop_on_paddle(&mut session, PowerUpKind::Green);

    let mut caught = false;
    for frame in 0..20 {
        tick(&mut session, &TickInput::default(), frame as f64 / 60.0);
        if session.drain_events().contains(&GameEvent::BallCaught) {
            caught = true;
            break;
        }
    }
    assert!(caught);
    assert!(session.level.balls[0].rides_paddle());

    tick(&mut session, &TickInput::with(Intent::Launch), 1.0);
    assert!(!session.level.balls[0].stuck);
    assert_eq!(session.level.balls[0].dir.y, 1);
}

#[test]
fn test_lost_ball_ends_session() {
    let mut session = session(&["1", "1"]);
    session.level.balls = vec![Ball::moving(Vec2::new(100.0, 20.0), IVec2::new(0, -1), 7.0)];

    let mut outcome = None;
    for frame in 0..5 {
        outcome = tick(&mut session, &TickInput::default(), frame as f64 / 60.0);
        if outcome.is_some() {
            break;
        }
    }
    assert_eq!(outcome, Some(SessionOutcome::AllBallsLost));
    assert_eq!(session.phase, SessionPhase::GameOver);
}

#[test]
fn test_clearing_every_level_completes() {
    let mut session = session(&["1", "2"]);
    for _ in 0..2 {
        session.level.bricks = vec![Brick::new(BrickTier::Green, 0.0, 500.0)];
        session.level.balls = vec![Ball::moving(Vec2::new(48.0, 455.0), IVec2::new(0, 1), 7.0)];
        tick(&mut session, &TickInput::default(), 0.0);
    }
    assert_eq!(session.outcome(), Some(SessionOutcome::AllLevelsCleared));
    assert!(
        session
            .drain_events()
            .ends_with(&[GameEvent::SessionComplete])
    );
}
