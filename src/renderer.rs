use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::collision::Collision;
use crate::config::GameConfig;
use crate::game::Snapshot;
use crate::snake::Point;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Width of the camera frame the trail model is sampled in.
pub const CAMERA_WIDTH: f64 = 800.0;

/// Height of the camera frame the trail model is sampled in.
pub const CAMERA_HEIGHT: f64 = 600.0;

const GLYPH_HEAD: &str = "●";
const GLYPH_BODY: &str = "•";
const GLYPH_FOOD: &str = "◆";

/// World rectangle shown in the play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Camera frames grow `y` downward; the chain playfield grows it upward.
    pub y_up: bool,
}

impl Viewport {
    /// Returns the world rectangle a configuration plays in.
    #[must_use]
    pub fn for_config(config: &GameConfig) -> Self {
        match config {
            GameConfig::Trail(_) => Self {
                min_x: 0.0,
                max_x: CAMERA_WIDTH,
                min_y: 0.0,
                max_y: CAMERA_HEIGHT,
                y_up: false,
            },
            GameConfig::Chain(chain) => {
                let extent = chain.wall + f64::from(chain.step) / 2.0;
                Self {
                    min_x: -extent,
                    max_x: extent,
                    min_y: -extent,
                    max_y: extent,
                    y_up: true,
                }
            }
        }
    }

    /// Maps a world point onto a terminal cell inside `area`.
    #[must_use]
    pub fn to_cell(&self, area: Rect, point: Point) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }

        let fx = (point.x - self.min_x) / (self.max_x - self.min_x);
        let mut fy = (point.y - self.min_y) / (self.max_y - self.min_y);
        if self.y_up {
            fy = 1.0 - fy;
        }
        if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
            return None;
        }

        let column = scale_to_cells(fx, area.width);
        let row = scale_to_cells(fy, area.height);
        Some((area.x + column, area.y + row))
    }

    /// Maps a terminal cell inside `area` back to the world point at its
    /// center.
    #[must_use]
    pub fn to_world(&self, area: Rect, column: u16, row: u16) -> Option<Point> {
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let mut fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        if self.y_up {
            fy = 1.0 - fy;
        }

        Some(Point::new(
            self.min_x + fx * (self.max_x - self.min_x),
            self.min_y + fy * (self.max_y - self.min_y),
        ))
    }
}

fn scale_to_cells(fraction: f64, cells: u16) -> u16 {
    let scaled = (fraction * f64::from(cells)).floor();
    // The far edge maps onto the last cell.
    (scaled as u16).min(cells - 1)
}

/// Supplemental values the snapshot does not carry.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    /// Best score before the current game started.
    pub reference_high_score: u32,
    pub last_collision: Option<Collision>,
    /// True until the first tick of a game moves the body.
    pub is_start_screen: bool,
}

/// Splits the frame into the play area and the one-line HUD below it.
#[must_use]
pub fn layout(area: Rect) -> (Rect, Rect) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    (play_area, hud_area)
}

/// Returns the cells the snake may occupy inside a bordered play area.
#[must_use]
pub fn play_field(area: Rect) -> Rect {
    Block::bordered().inner(layout(area).0)
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, viewport: Viewport, hud: HudInfo) {
    let (play_area, hud_area) = layout(frame.area());

    let block = Block::bordered()
        .title(format!(" {} ", snapshot.model.name()))
        .border_style(Style::new().fg(Color::White));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot, viewport);
    render_body(frame, inner, snapshot, viewport);
    render_hud(frame, hud_area, snapshot);

    if hud.is_start_screen {
        render_start_menu(frame, play_area, snapshot.model, snapshot.high_score);
    } else if snapshot.game_over {
        render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            hud.reference_high_score,
            hud.last_collision,
        );
    } else if snapshot.paused {
        render_pause_menu(frame, play_area);
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, viewport: Viewport) {
    let Some((x, y)) = viewport.to_cell(inner, snapshot.food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(Color::Red));
}

fn render_body(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, viewport: Viewport) {
    let Some((head, body)) = snapshot.body.split_last() else {
        return;
    };

    let buffer = frame.buffer_mut();
    for point in body {
        let Some((x, y)) = viewport.to_cell(inner, *point) else {
            continue;
        };
        buffer.set_string(x, y, GLYPH_BODY, Style::new().fg(Color::Cyan));
    }

    if let Some((x, y)) = viewport.to_cell(inner, *head) {
        buffer.set_string(
            x,
            y,
            GLYPH_HEAD,
            Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
        );
    }
}

fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let mut text = format!(
        " Score {}  Best {}  Length {}",
        snapshot.score,
        snapshot.high_score,
        snapshot.body.len()
    );
    if let Some(delay) = snapshot.tick_delay {
        text.push_str(&format!("  Tick {}ms", delay.as_millis()));
    }

    frame.render_widget(
        Paragraph::new(Line::from(text)).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::config::{GameConfig, Model};
    use crate::snake::Point;

    use super::Viewport;

    #[test]
    fn chain_origin_maps_to_the_middle() {
        let viewport = Viewport::for_config(&GameConfig::for_model(Model::Chain));
        let area = Rect::new(0, 0, 60, 30);

        assert_eq!(viewport.to_cell(area, Point::new(0.0, 0.0)), Some((30, 15)));
    }

    #[test]
    fn chain_up_is_toward_the_top_row() {
        let viewport = Viewport::for_config(&GameConfig::for_model(Model::Chain));
        let area = Rect::new(0, 0, 60, 30);

        let (_, top) = viewport
            .to_cell(area, Point::new(0.0, 280.0))
            .expect("inside the playfield");
        let (_, bottom) = viewport
            .to_cell(area, Point::new(0.0, -280.0))
            .expect("inside the playfield");

        assert!(top < bottom);
    }

    #[test]
    fn points_outside_the_view_are_skipped() {
        let viewport = Viewport::for_config(&GameConfig::for_model(Model::Trail));
        let area = Rect::new(1, 1, 80, 24);

        assert_eq!(viewport.to_cell(area, Point::new(-5.0, 10.0)), None);
        assert_eq!(viewport.to_cell(area, Point::new(800.0, 600.0)), Some((80, 24)));
    }

    #[test]
    fn cell_round_trips_to_the_same_cell() {
        let viewport = Viewport::for_config(&GameConfig::for_model(Model::Trail));
        let area = Rect::new(1, 1, 80, 24);

        let world = viewport.to_world(area, 40, 12).expect("cell is inside");
        assert_eq!(viewport.to_cell(area, world), Some((40, 12)));
        assert_eq!(viewport.to_world(area, 0, 0), None);
    }
}
