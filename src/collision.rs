use serde::Serialize;

use crate::config::{ChainConfig, GameConfig, TrailConfig};
use crate::snake::{BodyTracker, Point};

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Collision {
    /// The head touched an older part of the body.
    SelfBody,
    /// The head crossed the playfield wall.
    Boundary,
}

/// Returns true when `head` lies strictly within `radius` of any body point
/// older than the `exclusion_window` most recent ones.
///
/// `body` runs oldest first with the head last. Points sampled just before
/// the head sit next to it by construction, so they are never tested; a body
/// no longer than the window cannot collide with itself.
#[must_use]
pub fn check_self_collision(head: Point, body: &[Point], exclusion_window: usize, radius: f64) -> bool {
    if body.len() <= exclusion_window {
        return false;
    }

    body[..body.len() - exclusion_window]
        .iter()
        .any(|point| head.distance(*point) < radius)
}

/// Returns true when `head` is farther than `half_extent` from the origin on
/// either axis.
#[must_use]
pub fn check_boundary_collision(head: Point, half_extent: f64) -> bool {
    head.x.abs() > half_extent || head.y.abs() > half_extent
}

/// Terminal-condition checks tuned for one body model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    exclusion_window: usize,
    radius: f64,
    wall: Option<f64>,
}

impl CollisionDetector {
    /// Builds the detector for the configured model. The chain skips only
    /// the head itself and is walled; the trail skips a window of recent
    /// samples and has no wall.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        match config {
            GameConfig::Trail(TrailConfig {
                exclusion_window,
                self_hit_radius,
                ..
            }) => Self {
                exclusion_window: *exclusion_window,
                radius: *self_hit_radius,
                wall: None,
            },
            GameConfig::Chain(ChainConfig {
                self_hit_radius,
                wall,
                ..
            }) => Self {
                exclusion_window: 1,
                radius: *self_hit_radius,
                wall: Some(*wall),
            },
        }
    }

    /// Returns the first terminal condition the body is in, wall first.
    #[must_use]
    pub fn check(&self, body: &BodyTracker) -> Option<Collision> {
        let head = body.head()?;

        if self
            .wall
            .is_some_and(|wall| check_boundary_collision(head, wall))
        {
            return Some(Collision::Boundary);
        }

        let points = body.points();
        if check_self_collision(head, &points, self.exclusion_window, self.radius) {
            return Some(Collision::SelfBody);
        }

        None
    }
}
