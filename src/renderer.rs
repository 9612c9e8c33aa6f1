use glam::Vec2;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::Screen;
use crate::backdrop::Backdrop;
use crate::entities::AsteroidVariant;
use crate::game::Game;
use crate::geometry::{Aabb, wrap_degrees};
use crate::menu::StartScreen;

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Ship,
    Bolt,
    Asteroid(AsteroidVariant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    Large,
}

/// Where a string is placed, in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAnchor {
    TopLeft(Vec2),
    Center(Vec2),
}

/// Drawing surface the game renders into.
///
/// Angles are degrees clockwise with 0 pointing up the screen.
pub trait Canvas {
    fn draw_sprite(&mut self, sprite: Sprite, dest: Aabb, angle: f32);
    fn draw_text(&mut self, text: &str, anchor: TextAnchor, size: TextSize, color: Color);
}

/// Maps world pixels onto a rectangle of terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub world: Vec2,
}

impl Viewport {
    pub fn new(area: Rect, world: Vec2) -> Self {
        Self { area, world }
    }

    fn column(&self, x: f32) -> i32 {
        self.area.x as i32 + (x / self.world.x * self.area.width as f32).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        self.area.y as i32 + (y / self.world.y * self.area.height as f32).floor() as i32
    }

    fn contains_cell(&self, column: i32, row: i32) -> bool {
        column >= self.area.left() as i32
            && column < self.area.right() as i32
            && row >= self.area.top() as i32
            && row < self.area.bottom() as i32
    }

    /// Cell holding a world point, if it is on screen
    pub fn cell_of(&self, point: Vec2) -> Option<(u16, u16)> {
        let (column, row) = (self.column(point.x), self.row(point.y));
        self.contains_cell(column, row)
            .then_some((column as u16, row as u16))
    }

    /// Cells covered by a world rectangle, clipped to the viewport. Every
    /// non-empty rectangle covers at least one cell.
    pub fn cells_of(&self, rect: Aabb) -> Option<Rect> {
        if rect.is_empty() {
            return None;
        }
        let left = self.column(rect.x as f32);
        let top = self.row(rect.y as f32);
        let right = self.column((rect.x + rect.w) as f32).max(left + 1);
        let bottom = self.row((rect.y + rect.h) as f32).max(top + 1);

        let left = left.max(self.area.left() as i32);
        let top = top.max(self.area.top() as i32);
        let right = right.min(self.area.right() as i32);
        let bottom = bottom.min(self.area.bottom() as i32);
        if left >= right || top >= bottom {
            return None;
        }
        Some(Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }

    /// World point at the middle of a cell
    pub fn world_of(&self, column: u16, row: u16) -> Vec2 {
        let cx = column.saturating_sub(self.area.x) as f32 + 0.5;
        let cy = row.saturating_sub(self.area.y) as f32 + 0.5;
        Vec2::new(
            cx * self.world.x / self.area.width.max(1) as f32,
            cy * self.world.y / self.area.height.max(1) as f32,
        )
    }
}

/// Eight-way arrow for a heading, 0 degrees pointing up
pub fn arrow_glyph(angle: f32) -> char {
    const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];
    let sector = ((wrap_degrees(angle) + 22.5) / 45.0) as usize % 8;
    ARROWS[sector]
}

fn tumble_glyph(angle: f32) -> char {
    const PHASES: [char; 4] = ['◐', '◓', '◑', '◒'];
    PHASES[(wrap_degrees(angle) / 90.0) as usize % 4]
}

/// [`Canvas`] over a ratatui buffer
pub struct TerminalCanvas<'a> {
    buffer: &'a mut Buffer,
    viewport: Viewport,
}

impl<'a> TerminalCanvas<'a> {
    pub fn new(buffer: &'a mut Buffer, viewport: Viewport) -> Self {
        Self { buffer, viewport }
    }

    fn put(&mut self, column: u16, row: u16, glyph: char, style: Style) {
        if let Some(cell) = self.buffer.cell_mut((column, row)) {
            cell.set_char(glyph).set_style(style);
        }
    }

    fn fill(&mut self, cells: Rect, glyph: char, style: Style) {
        for row in cells.top()..cells.bottom() {
            for column in cells.left()..cells.right() {
                self.put(column, row, glyph, style);
            }
        }
    }

    fn center_of(cells: Rect) -> (u16, u16) {
        (cells.x + cells.width / 2, cells.y + cells.height / 2)
    }
}

impl Canvas for TerminalCanvas<'_> {
    fn draw_sprite(&mut self, sprite: Sprite, dest: Aabb, angle: f32) {
        let Some(cells) = self.viewport.cells_of(dest) else {
            return;
        };
        let (cx, cy) = Self::center_of(cells);

        match sprite {
            Sprite::Ship => {
                self.fill(cells, '░', Style::default().fg(Color::Green));
                self.put(
                    cx,
                    cy,
                    arrow_glyph(angle),
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                );
            }
            Sprite::Bolt => {
                self.put(
                    cx,
                    cy,
                    arrow_glyph(angle),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            }
            Sprite::Asteroid(variant) => {
                let (glyph, color) = match variant {
                    AsteroidVariant::Cratered => ('▒', Color::Gray),
                    AsteroidVariant::Jagged => ('▓', Color::Rgb(150, 90, 50)),
                };
                self.fill(cells, glyph, Style::default().fg(color));
                self.put(
                    cx,
                    cy,
                    tumble_glyph(angle),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                );
            }
        }
    }

    fn draw_text(&mut self, text: &str, anchor: TextAnchor, size: TextSize, color: Color) {
        let (content, style) = match size {
            TextSize::Normal => (text.to_string(), Style::default().fg(color)),
            TextSize::Large => (
                text.to_uppercase()
                    .chars()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        };
        let width = content.chars().count() as u16;

        let (point, centered) = match anchor {
            TextAnchor::TopLeft(point) => (point, false),
            TextAnchor::Center(point) => (point, true),
        };
        let Some((column, row)) = self.viewport.cell_of(point) else {
            return;
        };
        let column = if centered {
            column.saturating_sub(width / 2).max(self.viewport.area.left())
        } else {
            column
        };
        self.buffer.set_stringn(
            column,
            row,
            &content,
            self.viewport.area.right().saturating_sub(column) as usize,
            style,
        );
    }
}

/// Everything the renderer reads for one frame
pub struct RenderView<'a> {
    pub screen: Screen,
    pub game: &'a Game,
    pub menu: &'a StartScreen,
    pub backdrop: &'a Backdrop,
    pub pointer: Vec2,
    pub area: Rect,
    pub world: Vec2,
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Viewport used for a terminal area. Input mapping uses the same one.
    pub fn viewport(area: Rect, world: Vec2) -> Viewport {
        let playfield = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.saturating_sub(1),
        };
        Viewport::new(playfield, world)
    }

    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let viewport = Self::viewport(view.area, view.world);
        {
            let mut canvas = TerminalCanvas::new(frame.buffer_mut(), viewport);
            view.backdrop.render(&mut canvas, view.world);
            match view.screen {
                Screen::Menu => view.menu.render(&mut canvas, view.pointer),
                Screen::Playing | Screen::GameOver => view.game.render(&mut canvas),
            }
        }

        self.render_controls(frame, view);
        if view.screen == Screen::GameOver {
            self.render_game_over(frame, view);
        }
    }

    fn render_controls(&self, frame: &mut Frame, view: &RenderView) {
        let hint = match view.screen {
            Screen::Menu => "[Click PLAY / Enter: Start] [Q: Quit]",
            Screen::Playing => "[WASD/Arrows: Move] [Mouse: Aim] [Click: Fire] [Q: Quit]",
            Screen::GameOver => "[R/Enter: Restart] [Q: Quit]",
        };
        let controls = Line::from(vec![Span::styled(hint, Style::default().fg(Color::DarkGray))]);
        let controls_area = Rect {
            x: view.area.x,
            y: view.area.y + view.area.height.saturating_sub(1),
            width: view.area.width,
            height: 1.min(view.area.height),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let text = vec![
            Line::from(""),
            Line::from("GAME OVER").centered().red().bold(),
            Line::from(""),
            Line::from(format!("You reached round {}", view.game.rounds().current_round()))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        let width = 34.min(area.width);
        let height = 9.min(area.height);
        let overlay = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            overlay,
        );
    }
}
