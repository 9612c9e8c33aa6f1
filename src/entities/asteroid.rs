use glam::Vec2;
use rand::Rng;

use crate::config::{AsteroidConfig, ScreenConfig};
use crate::geometry::{Aabb, wrap_degrees};
use crate::renderer::{Canvas, Sprite};

/// The two asteroid textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidVariant {
    Cratered,
    Jagged,
}

impl AsteroidVariant {
    /// Variant used for the `n`th asteroid of a spawn event
    pub fn for_spawn_slot(n: u32) -> Self {
        if n % 2 == 0 {
            AsteroidVariant::Cratered
        } else {
            AsteroidVariant::Jagged
        }
    }

    fn sprite_index(self) -> usize {
        match self {
            AsteroidVariant::Cratered => 0,
            AsteroidVariant::Jagged => 1,
        }
    }
}

/// A homing obstacle. Velocity is re-aimed at the player every update.
#[derive(Debug, Clone)]
pub struct Asteroid {
    /// Top-left corner of the bounding rect
    pub position: Vec2,
    pub velocity: Vec2,
    /// Scalar speed in pixels per second
    pub speed: f32,
    /// Degrees, kept in `[0, 360)`
    pub angle: f32,
    /// Degrees per second
    pub rotation_speed: f32,
    pub width: i32,
    pub height: i32,
    pub variant: AsteroidVariant,
}

impl Asteroid {
    pub fn new(
        position: Vec2,
        width: i32,
        height: i32,
        speed: f32,
        target: Vec2,
        variant: AsteroidVariant,
    ) -> Self {
        Self {
            position,
            velocity: (target - position).normalize_or_zero() * speed,
            speed,
            angle: 0.0,
            rotation_speed: 0.0,
            width,
            height,
            variant,
        }
    }

    /// Random size, speed and spin, placed just outside a random screen edge
    /// and aimed at `target`.
    pub fn spawn(
        rng: &mut impl Rng,
        variant: AsteroidVariant,
        config: &AsteroidConfig,
        screen: &ScreenConfig,
        target: Vec2,
    ) -> Self {
        let (base_w, base_h) = config.sprite_sizes[variant.sprite_index()];
        let scale = rng.random_range(config.min_scale..=config.max_scale);
        let width = (base_w * scale) as i32;
        let height = (base_h * scale) as i32;

        let screen_w = screen.width as i32;
        let screen_h = screen.height as i32;
        let position = match rng.random_range(0..4) {
            0 => Vec2::new(rng.random_range(0..screen_w) as f32, -height as f32),
            1 => Vec2::new(rng.random_range(0..screen_w) as f32, screen.height),
            2 => Vec2::new(-width as f32, rng.random_range(0..screen_h) as f32),
            _ => Vec2::new(screen.width, rng.random_range(0..screen_h) as f32),
        };

        let speed = rng.random_range(config.min_speed..=config.max_speed);
        let mut asteroid = Self::new(position, width, height, speed, target, variant);
        asteroid.rotation_speed = rng.random_range(-config.max_spin..=config.max_spin);
        asteroid.angle = rng.random_range(0..360) as f32;
        asteroid
    }

    /// Spin, re-aim at `target`, then move. A zero distance keeps the
    /// previous velocity.
    pub fn update(&mut self, dt: f32, target: Vec2) {
        self.angle = wrap_degrees(self.angle + self.rotation_speed * dt);

        let to_target = target - self.position;
        if to_target.length() > 0.0 {
            self.velocity = to_target / to_target.length() * self.speed;
        }

        self.position += self.velocity * dt;
    }

    pub fn rect(&self) -> Aabb {
        Aabb::at(self.position, self.width, self.height)
    }

    /// True once the asteroid has drifted two of its own extents past an edge.
    pub fn is_off_screen(&self, screen: &ScreenConfig) -> bool {
        let reach_x = 2.0 * self.width as f32;
        let reach_y = 2.0 * self.height as f32;
        self.position.x <= -reach_x
            || self.position.x >= screen.width + reach_x
            || self.position.y <= -reach_y
            || self.position.y >= screen.height + reach_y
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        canvas.draw_sprite(Sprite::Asteroid(self.variant), self.rect(), self.angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn still(position: Vec2) -> Asteroid {
        Asteroid::new(position, 100, 100, 200.0, position, AsteroidVariant::Cratered)
    }

    #[test]
    fn test_aimed_at_target_on_creation() {
        let asteroid = Asteroid::new(
            Vec2::new(0.0, 0.0),
            80,
            80,
            200.0,
            Vec2::new(0.0, 500.0),
            AsteroidVariant::Jagged,
        );
        assert_eq!(asteroid.velocity, Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_homes_on_moving_target() {
        let mut asteroid = Asteroid::new(
            Vec2::ZERO,
            80,
            80,
            100.0,
            Vec2::new(1000.0, 0.0),
            AsteroidVariant::Cratered,
        );
        asteroid.update(1.0, Vec2::new(0.0, 1000.0));
        assert!(asteroid.velocity.x.abs() < 1e-3);
        assert!((asteroid.velocity.y - 100.0).abs() < 1e-3);
        assert!((asteroid.position.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_distance_keeps_velocity() {
        let mut asteroid = Asteroid::new(
            Vec2::ZERO,
            80,
            80,
            100.0,
            Vec2::new(1.0, 0.0),
            AsteroidVariant::Cratered,
        );
        asteroid.update(0.0, Vec2::ZERO);
        assert_eq!(asteroid.velocity, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_rotation_wraps() {
        let mut asteroid = still(Vec2::new(100.0, 100.0));
        asteroid.angle = 350.0;
        asteroid.rotation_speed = 20.0;
        asteroid.update(1.0, Vec2::new(100.0, 100.0));
        assert!((asteroid.angle - 10.0).abs() < 1e-3);

        asteroid.rotation_speed = -30.0;
        asteroid.update(1.0, Vec2::new(100.0, 100.0));
        assert!((asteroid.angle - 340.0).abs() < 1e-3);
    }

    #[test]
    fn test_off_screen_boundary() {
        let screen = ScreenConfig::default();
        let culled = still(Vec2::new(1920.0 + 200.0, 500.0));
        assert!(culled.is_off_screen(&screen));
        let kept = still(Vec2::new(1920.0 + 200.0 - 1.0, 500.0));
        assert!(!kept.is_off_screen(&screen));

        assert!(still(Vec2::new(-200.0, 500.0)).is_off_screen(&screen));
        assert!(!still(Vec2::new(-199.0, 500.0)).is_off_screen(&screen));
        assert!(still(Vec2::new(500.0, 1080.0 + 200.0)).is_off_screen(&screen));
    }

    #[test]
    fn test_spawn_variants_alternate() {
        assert_eq!(AsteroidVariant::for_spawn_slot(0), AsteroidVariant::Cratered);
        assert_eq!(AsteroidVariant::for_spawn_slot(1), AsteroidVariant::Jagged);
        assert_eq!(AsteroidVariant::for_spawn_slot(2), AsteroidVariant::Cratered);
    }

    #[test]
    fn test_spawn_with_fixed_tunables() {
        let config = AsteroidConfig {
            min_scale: 0.5,
            max_scale: 0.5,
            min_speed: 250.0,
            max_speed: 250.0,
            max_spin: 0.0,
            ..AsteroidConfig::default()
        };
        let screen = ScreenConfig {
            width: 1.0,
            height: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        for slot in 0..8 {
            let asteroid = Asteroid::spawn(
                &mut rng,
                AsteroidVariant::for_spawn_slot(slot),
                &config,
                &screen,
                Vec2::ZERO,
            );
            assert_eq!(asteroid.speed, 250.0);
            assert_eq!(asteroid.rotation_speed, 0.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawn_just_outside_screen(seed in any::<u64>()) {
                let mut rng = StdRng::seed_from_u64(seed);
                let config = AsteroidConfig::default();
                let screen = ScreenConfig::default();
                let target = screen.center();
                let asteroid = Asteroid::spawn(
                    &mut rng,
                    AsteroidVariant::Cratered,
                    &config,
                    &screen,
                    target,
                );

                prop_assert!(asteroid.width >= 80 && asteroid.width <= 200);
                prop_assert!(asteroid.speed >= 100.0 && asteroid.speed <= 500.0);
                prop_assert!(asteroid.rotation_speed.abs() <= 90.0);

                let rect = asteroid.rect();
                let screen_rect = Aabb::new(0, 0, 1920, 1080);
                prop_assert!(!rect.intersects(&screen_rect));
                prop_assert!(!asteroid.is_off_screen(&screen));

                // heading toward the target
                let to_target = target - asteroid.position;
                prop_assert!(asteroid.velocity.dot(to_target) > 0.0);
            }
        }
    }
}
