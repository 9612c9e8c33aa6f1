use glam::Vec2;

use crate::config::{ProjectileConfig, ScreenConfig};
use crate::geometry::{Aabb, heading_degrees};
use crate::renderer::{Canvas, Sprite};

/// A shot fired by the player. Travels in a straight line; it does not home.
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Center of the projectile
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: i32,
    pub height: i32,
    /// Fixed at creation from the aim vector
    pub angle: f32,
}

impl Projectile {
    /// Aimed from `start` toward `target`. A zero-length aim leaves the
    /// projectile stationary.
    pub fn new(start: Vec2, target: Vec2, config: &ProjectileConfig) -> Self {
        let aim = target - start;
        Self {
            position: start,
            velocity: aim.normalize_or_zero() * config.speed,
            width: config.width,
            height: config.height,
            angle: heading_degrees(aim) - 90.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(
            (self.position.x - (self.width / 2) as f32) as i32,
            (self.position.y - (self.height / 2) as f32) as i32,
            self.width,
            self.height,
        )
    }

    /// True once the center is more than one sprite extent past any edge.
    pub fn is_off_screen(&self, screen: &ScreenConfig) -> bool {
        let w = self.width as f32;
        let h = self.height as f32;
        self.position.x < -w
            || self.position.x > screen.width + w
            || self.position.y < -h
            || self.position.y > screen.height + h
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        canvas.draw_sprite(Sprite::Bolt, self.rect(), self.angle + 90.0);
    }
}
