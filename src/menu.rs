use glam::Vec2;
use ratatui::style::Color;

use crate::config::ScreenConfig;
use crate::geometry::{Aabb, heading_degrees};
use crate::renderer::{Canvas, Sprite, TextAnchor, TextSize};

/// Title screen with a single PLAY button
#[derive(Debug, Clone)]
pub struct StartScreen {
    button: Aabb,
    ship: Aabb,
    hovered: bool,
}

impl StartScreen {
    pub fn new(screen: &ScreenConfig) -> Self {
        let (w, h) = (screen.width as i32, screen.height as i32);
        Self {
            // right half of the screen
            button: Aabb::new(w / 2 + w / 8, h / 2 - h / 12, w / 4, h / 6),
            // ship fills most of the left half
            ship: Aabb::new(w / 8, h / 4, w / 4, h / 2),
            hovered: false,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn pointer_moved(&mut self, pointer: Vec2) {
        self.hovered = self.contains(pointer);
    }

    /// Whether a click at `pointer` activates PLAY
    pub fn click(&mut self, pointer: Vec2) -> bool {
        self.pointer_moved(pointer);
        self.hovered
    }

    fn contains(&self, point: Vec2) -> bool {
        let (x, y) = (point.x, point.y);
        x >= self.button.x as f32
            && x <= (self.button.x + self.button.w) as f32
            && y >= self.button.y as f32
            && y <= (self.button.y + self.button.h) as f32
    }

    pub fn render(&self, canvas: &mut impl Canvas, pointer: Vec2) {
        let facing = heading_degrees(pointer - self.ship.center()) + 90.0;
        canvas.draw_sprite(Sprite::Ship, self.ship, facing);

        let color = if self.hovered {
            Color::LightBlue
        } else {
            Color::White
        };
        canvas.draw_text("PLAY", TextAnchor::Center(self.button.center()), TextSize::Large, color);
        canvas.draw_text(
            "Raumkukan",
            TextAnchor::Center(Vec2::new(self.button.center().x, self.button.y as f32 / 2.0)),
            TextSize::Normal,
            Color::Yellow,
        );
    }
}
