use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::collision::{Collision, CollisionDetector};
use crate::config::{GameConfig, Model};
use crate::error::ConfigError;
use crate::food::FoodManager;
use crate::input::{GameInput, Steer};
use crate::snake::{BodyTracker, Point};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct TickOutcome {
    pub ate_food: bool,
    pub collision: Option<Collision>,
}

/// Observable state handed to renderers after each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub model: Model,
    /// Oldest point first, head last.
    pub body: Vec<Point>,
    pub food: Point,
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub paused: bool,
    pub tick_delay: Option<Duration>,
}

/// Delay between chain ticks, shrinking toward a floor as food is eaten.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct TickPace {
    current: Duration,
    initial: Duration,
    floor: Duration,
    step: Duration,
}

impl TickPace {
    fn speed_up(&mut self) {
        self.current = self.current.saturating_sub(self.step).max(self.floor);
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Complete mutable game state for one player.
///
/// Body and food are rebuilt on every reset; the high score survives resets
/// for as long as the session value lives.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub body: BodyTracker,
    pub food: FoodManager,
    detector: CollisionDetector,
    config: GameConfig,
    score: u32,
    high_score: u32,
    status: GameStatus,
    pace: Option<TickPace>,
    tick_count: u64,
    last_collision: Option<Collision>,
    rng: StdRng,
}

impl GameSession {
    /// Creates a session seeded from system entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let body = BodyTracker::from_config(&config);
        let food = FoodManager::from_config(&config, &mut rng, &body.points());
        let pace = match &config {
            GameConfig::Chain(chain) => Some(TickPace {
                current: chain.initial_delay(),
                initial: chain.initial_delay(),
                floor: chain.min_delay(),
                step: chain.delay_step(),
            }),
            GameConfig::Trail(_) => None,
        };

        tracing::debug!(model = config.model().name(), "session created");
        Ok(Self {
            body,
            food,
            detector: CollisionDetector::from_config(&config),
            config,
            score: 0,
            high_score: 0,
            status: GameStatus::Playing,
            pace,
            tick_count: 0,
            last_collision: None,
            rng,
        })
    }

    /// Seeds the high score, e.g. from a previously saved value.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = self.high_score.max(high_score);
        self
    }

    /// Advances simulation by one tick.
    ///
    /// Does nothing unless the game is playing. Collisions are checked right
    /// after the body moves and end the tick; food is checked last.
    pub fn update(&mut self, steer: Steer) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::default();
        }

        if !self.body.advance(steer) {
            return TickOutcome::default();
        }
        self.tick_count += 1;

        if let Some(collision) = self.detector.check(&self.body) {
            self.end_game(collision);
            return TickOutcome {
                ate_food: false,
                collision: Some(collision),
            };
        }

        let Some(head) = self.body.head() else {
            return TickOutcome::default();
        };
        let points = self.body.points();
        if !self.food.check_consumption(head, &mut self.rng, &points) {
            return TickOutcome::default();
        }

        self.body.grow();
        self.score = self.score.saturating_add(self.award());
        if let Some(pace) = &mut self.pace {
            pace.speed_up();
        }
        tracing::debug!(
            score = self.score,
            body_len = self.body.len(),
            food_x = self.food.position().x,
            food_y = self.food.position().y,
            "food eaten"
        );

        TickOutcome {
            ate_food: true,
            collision: None,
        }
    }

    /// Applies one control event outside the tick cadence.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                if self.status != GameStatus::Playing {
                    return;
                }
                if let BodyTracker::Chain(chain) = &mut self.body {
                    chain.steer(direction);
                }
            }
            GameInput::Pause => self.toggle_pause(),
            GameInput::Reset => self.reset(),
            GameInput::Quit => {}
        }
    }

    /// Flips between playing and paused. Only the chain model pauses.
    pub fn toggle_pause(&mut self) {
        if self.config.model() != Model::Chain {
            tracing::debug!("pause ignored by the trail model");
            return;
        }

        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            other => other,
        };
    }

    /// Starts a new game, keeping the best score seen so far.
    pub fn reset(&mut self) {
        self.high_score = self.high_score.max(self.score);
        tracing::info!(
            score = self.score,
            high_score = self.high_score,
            "game reset"
        );

        self.score = 0;
        self.body = BodyTracker::from_config(&self.config);
        let points = self.body.points();
        self.food.randomize_location(&mut self.rng, &points);
        if let Some(pace) = &mut self.pace {
            pace.reset();
        }
        self.tick_count = 0;
        self.last_collision = None;
        self.status = GameStatus::Playing;
    }

    fn end_game(&mut self, collision: Collision) {
        self.status = GameStatus::GameOver;
        self.last_collision = Some(collision);
        self.high_score = self.high_score.max(self.score);
        tracing::info!(
            ?collision,
            score = self.score,
            high_score = self.high_score,
            ticks = self.tick_count,
            "game over"
        );
    }

    fn award(&self) -> u32 {
        match &self.config {
            GameConfig::Trail(trail) => trail.award,
            GameConfig::Chain(chain) => chain.award,
        }
    }

    /// Returns the per-tick output for renderers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            model: self.config.model(),
            body: self.body.points(),
            food: self.food.position(),
            score: self.score,
            high_score: self.high_score,
            game_over: self.is_game_over(),
            paused: self.is_paused(),
            tick_delay: self.tick_delay(),
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    /// Returns the cause of the last game over, cleared by a reset.
    #[must_use]
    pub fn last_collision(&self) -> Option<Collision> {
        self.last_collision
    }

    /// Returns ticks that moved the body since the last reset.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns the wait before the next chain tick; the trail has none.
    #[must_use]
    pub fn tick_delay(&self) -> Option<Duration> {
        self.pace.map(|pace| pace.current)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
