//! Game session: level progression and terminal outcomes
//!
//! A session owns the level-scoped entities (`LevelState`), the effect
//! schedule and the RNG. Moving to the next level swaps in a freshly built
//! `LevelState`; pending effect reversals survive the swap and later act on
//! the new level's balls and paddle.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::EffectManager;
use super::level::{LevelGrid, LevelSource};
use super::state::{Ball, Brick, GameEvent, Paddle, PowerUp};
use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Terminal: every level cleared
    Complete,
    /// Terminal: every ball lost
    GameOver,
}

/// Terminal signal reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    AllLevelsCleared,
    AllBallsLost,
}

/// Entities that live for exactly one level
#[derive(Debug, Clone)]
pub struct LevelState {
    pub balls: Vec<Ball>,
    pub paddle: Paddle,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
}

impl LevelState {
    /// Fresh level: one serve ball on a centered default paddle
    pub fn new(grid: &LevelGrid, settings: &Settings) -> Self {
        let paddle = Paddle::new(settings.paddle_speed);
        let ball = Ball::serve(
            Vec2::new(PLAYFIELD_WIDTH / 2.0, BALL_SERVE_Y),
            settings.ball_speed,
        );
        Self {
            balls: vec![ball],
            paddle,
            bricks: grid.bricks(),
            powerups: Vec::new(),
        }
    }
}

/// The whole game: levels, current level state, effects
#[derive(Debug, Clone)]
pub struct GameSession {
    pub settings: Settings,
    levels: Vec<LevelGrid>,
    /// Current level (0-based)
    pub level_index: usize,
    pub phase: SessionPhase,
    pub level: LevelState,
    pub effects: EffectManager,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events of the current tick only
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Start at level 0; every grid is validated before anything is built
    pub fn new(levels: Vec<LevelGrid>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        if levels.is_empty() {
            return Err(ConfigError::NoLevels("level list".to_string()));
        }
        for (index, grid) in levels.iter().enumerate() {
            grid.validate(index)?;
        }

        let seed = settings.seed.unwrap_or_else(rand::random);
        let level = LevelState::new(&levels[0], &settings);
        log::info!(
            "Session started: {} levels, seed {seed}, level 1 has {} bricks",
            levels.len(),
            level.bricks.len()
        );

        Ok(Self {
            effects: EffectManager::new(settings.effect_duration_secs),
            rng: Pcg32::seed_from_u64(seed),
            settings,
            levels,
            level_index: 0,
            phase: SessionPhase::Playing,
            level,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Load every level from a source, then start (grids are validated by `new`)
    pub fn from_source<S: LevelSource + ?Sized>(source: &S, settings: Settings) -> Result<Self> {
        Self::new(source.load_all()?, settings)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Terminal outcome, if the session has ended
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.phase {
            SessionPhase::Playing => None,
            SessionPhase::Complete => Some(SessionOutcome::AllLevelsCleared),
            SessionPhase::GameOver => Some(SessionOutcome::AllBallsLost),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase != SessionPhase::Playing
    }

    /// Move to the next level, or finish the session past the last one
    pub fn advance(&mut self) {
        if self.is_over() {
            return;
        }

        self.level_index += 1;
        let Some(grid) = self.levels.get(self.level_index) else {
            log::info!("All {} levels cleared", self.levels.len());
            self.phase = SessionPhase::Complete;
            self.emit(GameEvent::SessionComplete);
            return;
        };

        self.level = LevelState::new(grid, &self.settings);
        self.effects.clear_active();
        log::info!(
            "Level {} loaded: {} bricks",
            self.level_index + 1,
            self.level.bricks.len()
        );
        self.emit(GameEvent::LevelAdvanced {
            level_index: self.level_index,
        });
    }

    /// End the session as lost
    pub fn lose(&mut self) {
        if self.is_over() {
            return;
        }
        log::info!("Game over on level {}", self.level_index + 1);
        self.phase = SessionPhase::GameOver;
        self.emit(GameEvent::GameOver);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Forget the previous tick's events
    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Take the events of the latest tick
    ///
    /// Each `tick` starts with an empty queue, so events not drained
    /// before the next tick are dropped.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelSet;
    use crate::sim::state::PowerUpKind;

    fn seeded() -> Settings {
        Settings {
            seed: Some(12345),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_serves_one_ball() {
        let levels = LevelSet::from_texts(["123", "3"]);
        let session = GameSession::from_source(&levels, seeded()).unwrap();

        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.level_index, 0);
        assert_eq!(session.level_count(), 2);
        assert_eq!(session.level.bricks.len(), 3);
        assert_eq!(session.level.balls.len(), 1);
        assert!(session.level.balls[0].rides_paddle());
        assert_eq!(session.level.paddle.rect().bottom(), 0.0);
        assert_eq!(session.level.paddle.pos.x, PLAYFIELD_WIDTH / 2.0);
    }

    #[test]
    fn test_new_session_rejects_bad_config() {
        assert!(matches!(
            GameSession::new(Vec::new(), seeded()),
            Err(ConfigError::NoLevels(_))
        ));

        let wide = LevelGrid::from_text("3333333333333");
        assert!(matches!(
            GameSession::new(vec![LevelGrid::from_text("1"), wide], seeded()),
            Err(ConfigError::MalformedLevel { index: 1, .. })
        ));

        let settings = Settings {
            powerup_probability: -0.5,
            ..seeded()
        };
        assert!(GameSession::new(vec![LevelGrid::from_text("1")], settings).is_err());
    }

    #[test]
    fn test_from_source_rejects_malformed_level() {
        let levels = LevelSet::from_texts(["111", "222222222222"]);
        assert!(matches!(
            GameSession::from_source(&levels, seeded()),
            Err(ConfigError::MalformedLevel { index: 1, .. })
        ));
        let tall = "1\n".repeat(GRID_ROWS + 1);
        let levels = LevelSet::from_texts(["1", tall.as_str()]);
        assert!(matches!(
            GameSession::from_source(&levels, seeded()),
            Err(ConfigError::MalformedLevel { index: 1, .. })
        ));
    }

    #[test]
    fn test_advance_builds_fresh_level() {
        let levels = LevelSet::from_texts(["1", "33"]);
        let mut session = GameSession::from_source(&levels, seeded()).unwrap();

        session.level.paddle.set_scale(3.0);
        session.level.paddle.pos.x = 100.0;
        session.level.balls.clear();
        session
            .level
            .powerups
            .push(PowerUp::new(PowerUpKind::Red, Vec2::new(5.0, 500.0)));

        session.advance();
        assert_eq!(session.level_index, 1);
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.level.bricks.len(), 2);
        assert_eq!(session.level.balls.len(), 1);
        assert!(session.level.powerups.is_empty());
        assert_eq!(session.level.paddle.scale_factor, PADDLE_ORIGINAL_SCALE);
        assert_eq!(session.level.paddle.pos.x, PLAYFIELD_WIDTH / 2.0);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::LevelAdvanced { level_index: 1 }]
        );
    }

    #[test]
    fn test_advance_past_last_level_completes() {
        let levels = LevelSet::from_texts(["1"]);
        let mut session = GameSession::from_source(&levels, seeded()).unwrap();
        let bricks_before = session.level.bricks.clone();

        session.advance();
        assert_eq!(session.phase, SessionPhase::Complete);
        assert_eq!(session.outcome(), Some(SessionOutcome::AllLevelsCleared));
        // No grid was loaded past the end
        assert_eq!(session.level.bricks, bricks_before);

        // Terminal sessions stay put
        session.advance();
        assert_eq!(session.level_index, 1);
    }

    #[test]
    fn test_lose_is_terminal() {
        let levels = LevelSet::from_texts(["1"]);
        let mut session = GameSession::from_source(&levels, seeded()).unwrap();

        session.lose();
        assert_eq!(session.outcome(), Some(SessionOutcome::AllBallsLost));
        session.advance();
        assert_eq!(session.phase, SessionPhase::GameOver);
        assert_eq!(session.drain_events(), vec![GameEvent::GameOver]);
    }
}
