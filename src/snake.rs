use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::{ChainConfig, GameConfig, Model, TrailConfig};
use crate::input::{direction_change_is_valid, Direction, Steer};

/// Continuous 2D position in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Grid-aligned position of a chain segment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position `step` units away in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx.saturating_mul(step)),
            y: self.y.saturating_add(dy.saturating_mul(step)),
        }
    }
}

impl From<GridPos> for Point {
    fn from(position: GridPos) -> Self {
        Self {
            x: f64::from(position.x),
            y: f64::from(position.y),
        }
    }
}

/// Body made of recently visited points, capped by arc length.
///
/// Points are kept oldest first. `segment_lengths[i]` is the distance from
/// `points[i]` to `points[i + 1]`, so there is always one length fewer than
/// there are points, and `current_length` is their running sum.
#[derive(Debug, Clone)]
pub struct TrailBody {
    points: VecDeque<Point>,
    segment_lengths: VecDeque<f64>,
    current_length: f64,
    allowed_length: f64,
    growth: f64,
    previous_head: Option<Point>,
}

impl TrailBody {
    /// Creates an empty trail that may grow to `allowed_length`.
    #[must_use]
    pub fn new(allowed_length: f64, growth: f64) -> Self {
        Self {
            points: VecDeque::new(),
            segment_lengths: VecDeque::new(),
            current_length: 0.0,
            allowed_length,
            growth,
            previous_head: None,
        }
    }

    /// Appends a new head sample and trims the tail back under the cap.
    pub fn advance(&mut self, new_head: Point) {
        if let Some(previous) = self.previous_head {
            let distance = previous.distance(new_head);
            self.segment_lengths.push_back(distance);
            self.current_length += distance;
        }
        self.points.push_back(new_head);
        self.previous_head = Some(new_head);

        self.trim();
    }

    fn trim(&mut self) {
        while self.current_length > self.allowed_length {
            let Some(oldest) = self.segment_lengths.pop_front() else {
                break;
            };
            self.current_length -= oldest;
            let dropped = self.points.pop_front();
            debug_assert!(dropped.is_some(), "a segment length without its start point");
        }

        if self.segment_lengths.is_empty() {
            // Only the head is left; drop accumulated rounding error.
            self.current_length = 0.0;
        } else {
            self.current_length = self.current_length.max(0.0);
        }
    }

    /// Raises the arc-length cap by the growth increment.
    pub fn grow(&mut self) {
        self.allowed_length += self.growth;
    }

    #[must_use]
    pub fn head(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Iterates over points from oldest to head.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Iterates over distances between consecutive points, oldest first.
    pub fn segment_lengths(&self) -> impl Iterator<Item = &f64> {
        self.segment_lengths.iter()
    }

    #[must_use]
    pub fn current_length(&self) -> f64 {
        self.current_length
    }

    #[must_use]
    pub fn allowed_length(&self) -> f64 {
        self.allowed_length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Follow-the-leader chain of grid segments behind a stepping head.
#[derive(Debug, Clone)]
pub struct ChainBody {
    head: GridPos,
    /// Front is the segment directly behind the head.
    segments: VecDeque<GridPos>,
    heading: Direction,
    /// Last heading the head actually moved in.
    facing: Direction,
    pending: Option<Direction>,
    step: i32,
    growth: usize,
}

impl ChainBody {
    /// Creates a resting chain at the origin with `segments` laid out
    /// along `-x` behind the head.
    #[must_use]
    pub fn new(step: i32, segments: usize, growth: usize) -> Self {
        let segments = (1..=segments)
            .map(|index| {
                let offset = i32::try_from(index).unwrap_or(i32::MAX);
                GridPos::new(-offset.saturating_mul(step), 0)
            })
            .collect();

        Self {
            head: GridPos::default(),
            segments,
            heading: Direction::Stop,
            facing: Direction::Right,
            pending: None,
            step,
            growth,
        }
    }

    /// Creates a chain from explicit positions (front of `segments` is the
    /// segment behind the head).
    #[must_use]
    pub fn from_parts(head: GridPos, segments: Vec<GridPos>, heading: Direction, step: i32) -> Self {
        let facing = if heading == Direction::Stop {
            Direction::Right
        } else {
            heading
        };

        Self {
            head,
            segments: VecDeque::from(segments),
            heading,
            facing,
            pending: None,
            step,
            growth: 1,
        }
    }

    /// Buffers a turn for the next advance.
    ///
    /// A turn that reverses the committed heading is dropped silently. While
    /// resting with segments attached, the last moving heading counts as the
    /// committed one so the head cannot fold back onto its neck.
    pub fn steer(&mut self, direction: Direction) {
        let reference = if self.heading == Direction::Stop && !self.segments.is_empty() {
            self.facing
        } else {
            self.heading
        };

        if !direction_change_is_valid(reference, direction) {
            return;
        }
        self.pending = Some(direction);
    }

    /// Applies the buffered turn and moves the chain one step. Returns
    /// false while resting.
    pub fn advance(&mut self) -> bool {
        if let Some(next) = self.pending.take() {
            self.heading = next;
        }
        if self.heading == Direction::Stop {
            return false;
        }
        self.facing = self.heading;

        self.segments.push_front(self.head);
        self.segments.pop_back();
        self.head = self.head.stepped(self.heading, self.step);
        true
    }

    /// Appends the growth amount of segments at the tail.
    pub fn grow(&mut self) {
        let tail = self.segments.back().copied().unwrap_or(self.head);
        self.segments.extend(std::iter::repeat(tail).take(self.growth));
    }

    #[must_use]
    pub fn head(&self) -> GridPos {
        self.head
    }

    /// Returns the committed heading.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Iterates over segments from the one behind the head to the tail.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &GridPos> {
        self.segments.iter()
    }

    /// Returns the number of segments behind the head.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Snake body under one of the two growth policies.
#[derive(Debug, Clone)]
pub enum BodyTracker {
    Trail(TrailBody),
    Chain(ChainBody),
}

impl BodyTracker {
    /// Creates a fresh body for the configured model.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        match config {
            GameConfig::Trail(TrailConfig {
                initial_length,
                growth,
                ..
            }) => Self::Trail(TrailBody::new(*initial_length, *growth)),
            GameConfig::Chain(ChainConfig {
                step,
                initial_segments,
                growth,
                ..
            }) => Self::Chain(ChainBody::new(*step, *initial_segments, *growth)),
        }
    }

    /// Advances the body by one tick. Returns false when nothing moved,
    /// either because the chain rests or the signal belongs to the other
    /// model.
    pub fn advance(&mut self, steer: Steer) -> bool {
        match (self, steer) {
            (Self::Trail(trail), Steer::Toward(point)) => {
                trail.advance(point);
                true
            }
            (Self::Chain(chain), Steer::Heading(direction)) => {
                chain.steer(direction);
                chain.advance()
            }
            (Self::Chain(chain), Steer::Coast) => chain.advance(),
            (body, steer) => {
                tracing::debug!(model = body.model().name(), ?steer, "steering ignored");
                false
            }
        }
    }

    pub fn grow(&mut self) {
        match self {
            Self::Trail(trail) => trail.grow(),
            Self::Chain(chain) => chain.grow(),
        }
    }

    /// Returns the current head, if the body has one yet.
    #[must_use]
    pub fn head(&self) -> Option<Point> {
        match self {
            Self::Trail(trail) => trail.head(),
            Self::Chain(chain) => Some(chain.head().into()),
        }
    }

    /// Returns every body point from the oldest to the head.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Trail(trail) => trail.points().copied().collect(),
            Self::Chain(chain) => chain
                .segments()
                .rev()
                .map(|segment| Point::from(*segment))
                .chain(std::iter::once(chain.head().into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Trail(trail) => trail.len(),
            Self::Chain(chain) => chain.segment_count() + 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn model(&self) -> Model {
        match self {
            Self::Trail(_) => Model::Trail,
            Self::Chain(_) => Model::Chain,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{GameConfig, Model};
    use crate::input::{Direction, Steer};

    use super::{BodyTracker, ChainBody, GridPos, Point, TrailBody};

    #[test]
    fn trail_keeps_short_path_untrimmed() {
        let mut trail = TrailBody::new(100.0, 30.0);

        trail.advance(Point::new(0.0, 0.0));
        trail.advance(Point::new(10.0, 0.0));
        trail.advance(Point::new(25.0, 0.0));

        let points: Vec<Point> = trail.points().copied().collect();
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(25.0, 0.0),
            ]
        );
        assert_eq!(trail.current_length(), 25.0);
        assert_eq!(trail.segment_lengths().count(), 2);
    }

    #[test]
    fn trail_trims_whole_segments_from_the_tail() {
        let mut trail = TrailBody::new(100.0, 30.0);

        for x in (0..=120).step_by(40) {
            trail.advance(Point::new(f64::from(x), 0.0));
        }

        // 0, 40, 80, 120 spans 120; the oldest 40-unit segment goes.
        assert_eq!(trail.current_length(), 80.0);
        assert_eq!(trail.head(), Some(Point::new(120.0, 0.0)));
        assert_eq!(trail.points().next(), Some(&Point::new(40.0, 0.0)));
    }

    #[test]
    fn trail_single_long_jump_leaves_only_the_head() {
        let mut trail = TrailBody::new(100.0, 30.0);

        trail.advance(Point::new(0.0, 0.0));
        trail.advance(Point::new(300.0, 400.0));

        assert_eq!(trail.len(), 1);
        assert_eq!(trail.current_length(), 0.0);
        assert_eq!(trail.head(), Some(Point::new(300.0, 400.0)));
    }

    #[test]
    fn trail_growth_raises_the_cap() {
        let mut trail = TrailBody::new(100.0, 30.0);

        trail.grow();

        assert_eq!(trail.allowed_length(), 130.0);
    }

    #[test]
    fn chain_moves_one_step_per_tick() {
        let mut chain = ChainBody::new(20, 0, 1);

        chain.steer(Direction::Right);
        chain.advance();

        assert_eq!(chain.head(), GridPos::new(20, 0));
        assert_eq!(chain.heading(), Direction::Right);
    }

    #[test]
    fn resting_chain_does_not_move() {
        let mut chain = ChainBody::new(20, 2, 1);

        assert!(!chain.advance());

        assert_eq!(chain.head(), GridPos::new(0, 0));
        assert_eq!(
            chain.segments().copied().collect::<Vec<_>>(),
            vec![GridPos::new(-20, 0), GridPos::new(-40, 0)]
        );
    }

    #[test]
    fn segments_follow_the_leader() {
        let mut chain = ChainBody::from_parts(
            GridPos::new(40, 0),
            vec![GridPos::new(20, 0), GridPos::new(0, 0)],
            Direction::Right,
            20,
        );

        chain.steer(Direction::Up);
        chain.advance();

        assert_eq!(chain.head(), GridPos::new(40, 20));
        assert_eq!(
            chain.segments().copied().collect::<Vec<_>>(),
            vec![GridPos::new(40, 0), GridPos::new(20, 0)]
        );
    }

    #[test]
    fn reversal_never_changes_heading() {
        let mut chain = ChainBody::from_parts(GridPos::new(0, 0), Vec::new(), Direction::Right, 20);

        chain.steer(Direction::Left);
        chain.advance();

        assert_eq!(chain.heading(), Direction::Right);
        assert_eq!(chain.head(), GridPos::new(20, 0));
    }

    #[test]
    fn quick_turns_are_checked_against_the_committed_heading() {
        let mut chain = ChainBody::from_parts(
            GridPos::new(0, 0),
            vec![GridPos::new(-20, 0)],
            Direction::Right,
            20,
        );

        chain.steer(Direction::Up);
        chain.steer(Direction::Left);
        chain.advance();

        assert_eq!(chain.heading(), Direction::Up);
        assert_eq!(chain.head(), GridPos::new(0, 20));
    }

    #[test]
    fn resting_chain_cannot_turn_into_its_neck() {
        let mut chain = ChainBody::new(20, 1, 1);

        chain.steer(Direction::Left);
        chain.advance();

        assert_eq!(chain.heading(), Direction::Stop);
        assert_eq!(chain.head(), GridPos::new(0, 0));
    }

    #[test]
    fn growth_appends_at_the_tail_and_unfolds_on_next_shift() {
        let mut chain = ChainBody::from_parts(
            GridPos::new(20, 0),
            vec![GridPos::new(0, 0)],
            Direction::Right,
            20,
        );

        chain.grow();
        assert_eq!(chain.segment_count(), 2);
        assert_eq!(
            chain.segments().copied().collect::<Vec<_>>(),
            vec![GridPos::new(0, 0), GridPos::new(0, 0)]
        );

        chain.advance();
        assert_eq!(
            chain.segments().copied().collect::<Vec<_>>(),
            vec![GridPos::new(20, 0), GridPos::new(0, 0)]
        );
    }

    #[test]
    fn growth_of_bare_head_starts_at_the_head() {
        let mut chain = ChainBody::new(20, 0, 1);

        chain.grow();

        assert_eq!(chain.segments().next(), Some(&GridPos::new(0, 0)));
    }

    #[test]
    fn tracker_lists_chain_points_tail_first() {
        let body = BodyTracker::Chain(ChainBody::from_parts(
            GridPos::new(40, 0),
            vec![GridPos::new(20, 0), GridPos::new(0, 0)],
            Direction::Right,
            20,
        ));

        assert_eq!(
            body.points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(40.0, 0.0),
            ]
        );
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn grid_step_saturates_instead_of_overflowing() {
        let near_edge = GridPos::new(i32::MAX - 5, i32::MIN + 5);

        assert_eq!(
            near_edge.stepped(Direction::Right, 20),
            GridPos::new(i32::MAX, i32::MIN + 5)
        );
        assert_eq!(
            near_edge.stepped(Direction::Down, 20),
            GridPos::new(i32::MAX - 5, i32::MIN)
        );
    }

    #[test]
    fn tracker_ignores_steering_of_the_other_model() {
        let mut trail = BodyTracker::from_config(&GameConfig::for_model(Model::Trail));
        let mut chain = BodyTracker::from_config(&GameConfig::for_model(Model::Chain));

        assert!(!trail.advance(Steer::Heading(Direction::Up)));
        assert!(!trail.advance(Steer::Coast));
        assert!(!chain.advance(Steer::Toward(Point::new(5.0, 5.0))));
        assert!(trail.is_empty());
        assert_eq!(chain.head(), Some(Point::new(0.0, 0.0)));
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::{Point, TrailBody};

    proptest! {
        #[test]
        fn tracked_length_matches_recomputed_sum(
            moves in prop::collection::vec((-400.0f64..400.0, -400.0f64..400.0), 1..200),
            grow_every in 1usize..20,
        ) {
            let mut trail = TrailBody::new(100.0, 30.0);

            for (index, (x, y)) in moves.into_iter().enumerate() {
                trail.advance(Point::new(x, y));
                if index % grow_every == 0 {
                    trail.grow();
                }

                let recomputed: f64 = trail.segment_lengths().sum();
                prop_assert!((recomputed - trail.current_length()).abs() < 1e-6);
                prop_assert_eq!(trail.segment_lengths().count() + 1, trail.len());
            }
        }

        #[test]
        fn trail_never_exceeds_cap_and_never_empties(
            moves in prop::collection::vec((0.0f64..800.0, 0.0f64..600.0), 1..200),
        ) {
            let mut trail = TrailBody::new(100.0, 30.0);

            for (x, y) in moves {
                trail.advance(Point::new(x, y));

                prop_assert!(trail.current_length() <= trail.allowed_length());
                prop_assert!(!trail.is_empty());
                prop_assert_eq!(trail.head(), Some(Point::new(x, y)));
            }
        }
    }
}
