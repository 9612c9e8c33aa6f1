use glam::Vec2;

use super::projectile::Projectile;
use crate::config::{PlayerConfig, ProjectileConfig, ScreenConfig};
use crate::geometry::{Aabb, heading_degrees};
use crate::renderer::{Canvas, Sprite};

/// The four movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Discrete key transitions the ship reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    Press(Direction),
    Release(Direction),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MovementFlags {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl MovementFlags {
    fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner of the sprite
    pub position: Vec2,
    pub width: i32,
    pub height: i32,
    speed: f32,
    hitbox_padding: i32,
    edge_margin: f32,
    moving: MovementFlags,
}

impl Player {
    /// Ship centered on screen, sized from the scaled sprite.
    pub fn new(config: &PlayerConfig, screen: &ScreenConfig) -> Self {
        let width = (config.sprite_width * config.scale) as i32;
        let height = (config.sprite_height * config.scale) as i32;
        Self {
            position: screen.center(),
            width,
            height,
            speed: config.speed,
            hitbox_padding: config.hitbox_padding,
            edge_margin: config.edge_margin,
            moving: MovementFlags::default(),
        }
    }

    pub fn handle_input(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::Press(direction) => self.moving.set(direction, true),
            PlayerInput::Release(direction) => self.moving.set(direction, false),
        }
    }

    /// Drop every held movement key.
    pub fn halt(&mut self) {
        self.moving = MovementFlags::default();
    }

    pub fn is_moving(&self) -> bool {
        self.moving != MovementFlags::default()
    }

    /// Apply held movement, then clamp inside the edge margin.
    pub fn update(&mut self, dt: f32, screen: &ScreenConfig) {
        let step = self.speed * dt;
        if self.moving.up {
            self.position.y -= step;
        }
        if self.moving.down {
            self.position.y += step;
        }
        if self.moving.left {
            self.position.x -= step;
        }
        if self.moving.right {
            self.position.x += step;
        }

        let margin = self.edge_margin;
        let max_x = screen.width - self.width as f32 - margin;
        let max_y = screen.height - self.height as f32 - margin;
        if self.position.x < margin {
            self.position.x = margin;
        }
        if self.position.y < margin {
            self.position.y = margin;
        }
        if self.position.x > max_x {
            self.position.x = max_x;
        }
        if self.position.y > max_y {
            self.position.y = max_y;
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width as f32, self.height as f32) / 2.0
    }

    pub fn sprite_rect(&self) -> Aabb {
        Aabb::at(self.position, self.width, self.height)
    }

    /// Collision rectangle, smaller than the sprite by the padding on each side
    pub fn hitbox(&self) -> Aabb {
        self.sprite_rect().inset(self.hitbox_padding)
    }

    /// Heading from the ship center toward `pointer`, in degrees.
    pub fn facing_degrees(&self, pointer: Vec2) -> f32 {
        heading_degrees(pointer - self.center())
    }

    /// Fire a projectile from the ship center toward `target`.
    pub fn shoot(&self, target: Vec2, config: &ProjectileConfig) -> Projectile {
        Projectile::new(self.center(), target, config)
    }

    pub fn render(&self, canvas: &mut impl Canvas, pointer: Vec2) {
        canvas.draw_sprite(
            Sprite::Ship,
            self.sprite_rect(),
            self.facing_degrees(pointer) + 90.0,
        );
    }
}
