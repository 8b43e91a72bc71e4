use rand::Rng;

use crate::config::{ChainConfig, GameConfig, SpawnArea, TrailConfig};
use crate::snake::Point;

/// Draws tried before a spawn gives up on avoiding the body.
pub const MAX_SPAWN_ATTEMPTS: usize = 32;

/// Region around the food center that counts as eating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hitbox {
    /// Axis-aligned box, open on every edge.
    Box { half_width: f64, half_height: f64 },
    /// Open disc.
    Radius(f64),
}

impl Hitbox {
    /// Returns true when `point` lies inside the hitbox centered on `center`.
    #[must_use]
    pub fn contains(self, center: Point, point: Point) -> bool {
        match self {
            Self::Box {
                half_width,
                half_height,
            } => {
                center.x - half_width < point.x
                    && point.x < center.x + half_width
                    && center.y - half_height < point.y
                    && point.y < center.y + half_height
            }
            Self::Radius(radius) => center.distance(point) < radius,
        }
    }
}

/// Food entity currently active on the playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub position: Point,
    pub hitbox: Hitbox,
}

impl Food {
    #[must_use]
    pub fn new(position: Point, hitbox: Hitbox) -> Self {
        Self { position, hitbox }
    }

    /// Returns true when a head at `head` eats this food.
    #[must_use]
    pub fn is_eaten_by(self, head: Point) -> bool {
        self.hitbox.contains(self.position, head)
    }
}

/// Draws a uniform integer position inside `area`, retrying while the body
/// would already be touching food placed there.
///
/// The last draw is returned when every attempt lands on the body, so a
/// crowded playfield degrades to plain uniform placement.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    area: SpawnArea,
    hitbox: Hitbox,
    avoid: &[Point],
) -> Point {
    let mut candidate = draw(rng, area);

    for _ in 1..MAX_SPAWN_ATTEMPTS {
        if !avoid.iter().any(|point| hitbox.contains(candidate, *point)) {
            break;
        }
        candidate = draw(rng, area);
    }

    candidate
}

fn draw<R: Rng + ?Sized>(rng: &mut R, area: SpawnArea) -> Point {
    Point::new(
        f64::from(rng.gen_range(area.min_x..=area.max_x)),
        f64::from(rng.gen_range(area.min_y..=area.max_y)),
    )
}

/// Owns the single food item and where it may respawn.
#[derive(Debug, Clone)]
pub struct FoodManager {
    pub food: Food,
    area: SpawnArea,
}

impl FoodManager {
    /// Places the first food for the configured model.
    #[must_use]
    pub fn from_config<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R, avoid: &[Point]) -> Self {
        let (area, hitbox) = match config {
            GameConfig::Trail(TrailConfig {
                food_area,
                food_half_width,
                food_half_height,
                ..
            }) => (
                *food_area,
                Hitbox::Box {
                    half_width: *food_half_width,
                    half_height: *food_half_height,
                },
            ),
            GameConfig::Chain(ChainConfig {
                food_area,
                eat_radius,
                ..
            }) => (*food_area, Hitbox::Radius(*eat_radius)),
        };

        let position = spawn_position(rng, area, hitbox, avoid);
        Self {
            food: Food::new(position, hitbox),
            area,
        }
    }

    /// Wraps an explicitly placed food.
    #[must_use]
    pub fn with_food(food: Food, area: SpawnArea) -> Self {
        Self { food, area }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.food.position
    }

    #[must_use]
    pub fn area(&self) -> SpawnArea {
        self.area
    }

    /// Moves the food to a fresh random position away from `avoid`.
    pub fn randomize_location<R: Rng + ?Sized>(&mut self, rng: &mut R, avoid: &[Point]) {
        self.food.position = spawn_position(rng, self.area, self.food.hitbox, avoid);
    }

    /// Returns true and relocates the food when `head` eats it.
    pub fn check_consumption<R: Rng + ?Sized>(
        &mut self,
        head: Point,
        rng: &mut R,
        avoid: &[Point],
    ) -> bool {
        if !self.food.is_eaten_by(head) {
            return false;
        }

        self.randomize_location(rng, avoid);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::{GameConfig, Model, SpawnArea};
    use crate::snake::Point;

    use super::{spawn_position, Food, FoodManager, Hitbox};

    #[test]
    fn box_hitbox_is_open_on_the_edges() {
        let food = Food::new(
            Point::new(100.0, 100.0),
            Hitbox::Box {
                half_width: 25.0,
                half_height: 25.0,
            },
        );

        assert!(food.is_eaten_by(Point::new(124.0, 76.0)));
        assert!(!food.is_eaten_by(Point::new(125.0, 100.0)));
        assert!(!food.is_eaten_by(Point::new(100.0, 75.0)));
    }

    #[test]
    fn radius_hitbox_is_strict() {
        let food = Food::new(Point::new(0.0, 0.0), Hitbox::Radius(20.0));

        assert!(food.is_eaten_by(Point::new(19.0, 0.0)));
        assert!(!food.is_eaten_by(Point::new(20.0, 0.0)));
    }

    #[test]
    fn spawned_food_stays_inside_the_area() {
        let mut rng = StdRng::seed_from_u64(7);
        let area = SpawnArea {
            min_x: 100,
            max_x: 700,
            min_y: 100,
            max_y: 500,
        };

        for _ in 0..500 {
            let position = spawn_position(&mut rng, area, Hitbox::Radius(20.0), &[]);
            assert!(area.contains(position.x, position.y));
            assert_eq!(position.x.fract(), 0.0);
        }
    }

    #[test]
    fn spawn_avoids_the_body_when_there_is_room() {
        let mut rng = StdRng::seed_from_u64(11);
        let area = SpawnArea::centered(40);
        let body: Vec<Point> = (-2..=2)
            .map(|x| Point::new(f64::from(x * 20), 0.0))
            .collect();
        let hitbox = Hitbox::Radius(20.0);

        for _ in 0..200 {
            let position = spawn_position(&mut rng, area, hitbox, &body);
            assert!(!body.iter().any(|point| hitbox.contains(position, *point)));
        }
    }

    #[test]
    fn full_area_still_yields_a_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let area = SpawnArea::centered(0);

        let position = spawn_position(&mut rng, area, Hitbox::Radius(20.0), &[Point::new(0.0, 0.0)]);

        assert_eq!(position, Point::new(0.0, 0.0));
    }

    #[test]
    fn consumption_relocates_food_away_from_the_head() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut food = FoodManager::with_food(
            Food::new(Point::new(20.0, 0.0), Hitbox::Radius(20.0)),
            SpawnArea::centered(270),
        );
        let head = Point::new(20.0, 0.0);

        assert!(food.check_consumption(head, &mut rng, &[head]));
        assert_ne!(food.position(), head);
        assert!(food.area().contains(food.position().x, food.position().y));
    }

    #[test]
    fn missed_food_stays_put() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut food = FoodManager::with_food(
            Food::new(Point::new(100.0, 0.0), Hitbox::Radius(20.0)),
            SpawnArea::centered(270),
        );

        assert!(!food.check_consumption(Point::new(0.0, 0.0), &mut rng, &[]));
        assert_eq!(food.position(), Point::new(100.0, 0.0));
    }

    #[test]
    fn trail_food_uses_a_box_hitbox() {
        let mut rng = StdRng::seed_from_u64(9);
        let food = FoodManager::from_config(&GameConfig::for_model(Model::Trail), &mut rng, &[]);

        assert_eq!(
            food.food.hitbox,
            Hitbox::Box {
                half_width: 25.0,
                half_height: 25.0
            }
        );
        assert!(food.area().contains(food.position().x, food.position().y));
    }
}
