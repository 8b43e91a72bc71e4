use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Arc length a fresh trail may reach before the tail is trimmed.
pub const DEFAULT_TRAIL_LENGTH: f64 = 100.0;

/// Arc length added to the trail per food eaten.
pub const DEFAULT_TRAIL_GROWTH: f64 = 30.0;

/// Head-to-body distance below which the trail collides with itself.
pub const DEFAULT_TRAIL_HIT_RADIUS: f64 = 15.0;

/// Most recent trail points skipped by the self-collision test.
pub const DEFAULT_EXCLUSION_WINDOW: usize = 50;

/// Half of the food sprite edge in the trail model.
pub const DEFAULT_FOOD_HALF_EXTENT: f64 = 25.0;

/// Grid step of the chain model, also the segment size.
pub const DEFAULT_STEP: i32 = 20;

/// Half extent of the chain playfield; crossing it ends the game.
pub const DEFAULT_WALL: f64 = 290.0;

/// Half extent of the square where chain food spawns.
pub const DEFAULT_CHAIN_FOOD_EXTENT: i32 = 270;

/// Delay between chain ticks at the start of a game, in seconds.
pub const DEFAULT_TICK_DELAY_SECS: f64 = 0.1;

/// Shortest delay between chain ticks, in seconds.
pub const MIN_TICK_DELAY_SECS: f64 = 0.05;

/// Delay removed per food eaten in the chain model, in seconds.
pub const TICK_DELAY_STEP_SECS: f64 = 0.002;

/// Which body model a session runs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Trail,
    Chain,
}

impl Model {
    /// Returns the lowercase model name used in config files and file names.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Trail => "trail",
            Self::Chain => "chain",
        }
    }
}

/// Inclusive integer rectangle that food spawns in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl SpawnArea {
    /// Creates a square area centered on the origin.
    #[must_use]
    pub fn centered(half_extent: i32) -> Self {
        Self {
            min_x: -half_extent,
            max_x: half_extent,
            min_y: -half_extent,
            max_y: half_extent,
        }
    }

    /// Returns true when `(x, y)` lies inside the area, edges included.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= f64::from(self.min_x)
            && x <= f64::from(self.max_x)
            && y >= f64::from(self.min_y)
            && y <= f64::from(self.max_y)
    }

    fn validate(self, field: &'static str) -> Result<(), ConfigError> {
        if self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(ConfigError::invalid(
                field,
                format!("empty area {}..={} x {}..={}", self.min_x, self.max_x, self.min_y, self.max_y),
            ));
        }
        Ok(())
    }
}

/// Tuning for the continuous trail model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub initial_length: f64,
    pub growth: f64,
    pub self_hit_radius: f64,
    pub exclusion_window: usize,
    pub food_half_width: f64,
    pub food_half_height: f64,
    /// Camera-frame rectangle food is placed in.
    pub food_area: SpawnArea,
    pub award: u32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            initial_length: DEFAULT_TRAIL_LENGTH,
            growth: DEFAULT_TRAIL_GROWTH,
            self_hit_radius: DEFAULT_TRAIL_HIT_RADIUS,
            exclusion_window: DEFAULT_EXCLUSION_WINDOW,
            food_half_width: DEFAULT_FOOD_HALF_EXTENT,
            food_half_height: DEFAULT_FOOD_HALF_EXTENT,
            food_area: SpawnArea {
                min_x: 100,
                max_x: 700,
                min_y: 100,
                max_y: 500,
            },
            award: 1,
        }
    }
}

impl TrailConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_length", self.initial_length)?;
        positive("growth", self.growth)?;
        positive("self_hit_radius", self.self_hit_radius)?;
        positive("food_half_width", self.food_half_width)?;
        positive("food_half_height", self.food_half_height)?;
        if self.exclusion_window == 0 {
            return Err(ConfigError::invalid(
                "exclusion_window",
                "must skip at least the head itself",
            ));
        }
        self.food_area.validate("food_area")
    }
}

/// Tuning for the discrete segment chain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub step: i32,
    /// Segments behind the head when a game starts.
    pub initial_segments: usize,
    /// Segments appended per food eaten.
    pub growth: usize,
    pub self_hit_radius: f64,
    pub eat_radius: f64,
    /// Half extent of the playfield measured from the origin.
    pub wall: f64,
    pub food_area: SpawnArea,
    pub award: u32,
    pub initial_delay_secs: f64,
    pub min_delay_secs: f64,
    pub delay_step_secs: f64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            initial_segments: 0,
            growth: 1,
            self_hit_radius: f64::from(DEFAULT_STEP),
            eat_radius: f64::from(DEFAULT_STEP),
            wall: DEFAULT_WALL,
            food_area: SpawnArea::centered(DEFAULT_CHAIN_FOOD_EXTENT),
            award: 10,
            initial_delay_secs: DEFAULT_TICK_DELAY_SECS,
            min_delay_secs: MIN_TICK_DELAY_SECS,
            delay_step_secs: TICK_DELAY_STEP_SECS,
        }
    }
}

impl ChainConfig {
    /// Returns the delay between ticks at the start of a game.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs_f64(self.initial_delay_secs)
    }

    /// Returns the shortest delay the chain can reach.
    #[must_use]
    pub fn min_delay(&self) -> Duration {
        Duration::from_secs_f64(self.min_delay_secs)
    }

    /// Returns the delay removed per food eaten.
    #[must_use]
    pub fn delay_step(&self) -> Duration {
        Duration::from_secs_f64(self.delay_step_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.step <= 0 {
            return Err(ConfigError::invalid("step", format!("{} is not positive", self.step)));
        }
        if self.growth == 0 {
            return Err(ConfigError::invalid("growth", "must add at least one segment"));
        }
        positive("self_hit_radius", self.self_hit_radius)?;
        positive("eat_radius", self.eat_radius)?;
        positive("wall", self.wall)?;
        // The head may land one step past the wall before the game ends.
        if self.wall + f64::from(self.step) > f64::from(i32::MAX) {
            return Err(ConfigError::invalid(
                "wall",
                format!("{} plus one step leaves the grid range", self.wall),
            ));
        }
        let laid_out = self.initial_segments as f64 * f64::from(self.step);
        if laid_out > self.wall {
            return Err(ConfigError::invalid(
                "initial_segments",
                format!(
                    "{} segments reach {laid_out}, beyond the wall at {}",
                    self.initial_segments, self.wall
                ),
            ));
        }

        positive("initial_delay_secs", self.initial_delay_secs)?;
        positive("min_delay_secs", self.min_delay_secs)?;
        if !self.delay_step_secs.is_finite() || self.delay_step_secs < 0.0 {
            return Err(ConfigError::invalid(
                "delay_step_secs",
                format!("{} is negative or not finite", self.delay_step_secs),
            ));
        }
        representable("initial_delay_secs", self.initial_delay_secs)?;
        representable("min_delay_secs", self.min_delay_secs)?;
        representable("delay_step_secs", self.delay_step_secs)?;
        if self.min_delay_secs > self.initial_delay_secs {
            return Err(ConfigError::invalid(
                "min_delay_secs",
                format!(
                    "floor {} is above the initial delay {}",
                    self.min_delay_secs, self.initial_delay_secs
                ),
            ));
        }

        self.food_area.validate("food_area")?;
        let area = self.food_area;
        let reach = [area.min_x, area.max_x, area.min_y, area.max_y]
            .into_iter()
            .map(|edge| f64::from(edge).abs())
            .fold(0.0, f64::max);
        if reach > self.wall {
            return Err(ConfigError::invalid(
                "food_area",
                format!("reaches {reach}, beyond the wall at {}", self.wall),
            ));
        }
        Ok(())
    }
}

/// Immutable configuration selecting a body model and its tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum GameConfig {
    Trail(TrailConfig),
    Chain(ChainConfig),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::Chain(ChainConfig::default())
    }
}

impl GameConfig {
    /// Returns the default configuration of `model`.
    #[must_use]
    pub fn for_model(model: Model) -> Self {
        match model {
            Model::Trail => Self::Trail(TrailConfig::default()),
            Model::Chain => Self::Chain(ChainConfig::default()),
        }
    }

    /// Reads a JSON config file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no session can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Trail(config) => config.validate(),
            Self::Chain(config) => config.validate(),
        }
    }

    /// Returns the body model this configuration selects.
    #[must_use]
    pub fn model(&self) -> Model {
        match self {
            Self::Trail(_) => Model::Trail,
            Self::Chain(_) => Model::Chain,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} is not a positive finite number"),
        ))
    }
}

fn representable(field: &'static str, secs: f64) -> Result<(), ConfigError> {
    Duration::try_from_secs_f64(secs)
        .map(|_| ())
        .map_err(|error| ConfigError::invalid(field, format!("{secs} seconds: {error}")))
}
