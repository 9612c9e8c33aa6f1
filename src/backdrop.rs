use glam::Vec2;
use ratatui::style::Color;

use crate::config::BackdropConfig;
use crate::renderer::{Canvas, TextAnchor, TextSize};

const STARS_PER_FRAME: u32 = 60;

/// Looping starfield animation behind every screen
#[derive(Debug, Clone)]
pub struct Backdrop {
    frame: u32,
    frame_count: u32,
    frame_delay: f32,
    elapsed: f32,
}

impl Backdrop {
    pub fn new(config: &BackdropConfig) -> Self {
        Self {
            frame: 0,
            frame_count: config.frame_count.max(1),
            frame_delay: config.frame_delay,
            elapsed: 0.0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Step to the next frame once the frame delay has passed.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.frame_delay {
            self.frame = (self.frame + 1) % self.frame_count;
            self.elapsed = 0.0;
        }
    }

    /// Star positions for the current frame, fixed per frame index
    pub fn stars(&self, world: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        (0..STARS_PER_FRAME).map(move |i| {
            let seed = scramble(i.wrapping_mul(31).wrapping_add(self.frame % 3));
            let x = (seed % 10_000) as f32 / 10_000.0;
            let y = ((seed / 10_000) % 10_000) as f32 / 10_000.0;
            Vec2::new(x * world.x, y * world.y)
        })
    }

    pub fn render(&self, canvas: &mut impl Canvas, world: Vec2) {
        for (i, star) in self.stars(world).enumerate() {
            // a few stars twinkle in and out across the loop
            if (i as u32 + self.frame) % 7 == 0 {
                continue;
            }
            canvas.draw_text(".", TextAnchor::TopLeft(star), TextSize::Normal, Color::DarkGray);
        }
    }
}

fn scramble(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}
