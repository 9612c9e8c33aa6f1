use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, ensure};
use glam::Vec2;
use serde::Deserialize;

/// Logical screen size in pixels. The terminal viewport scales this to fit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl ScreenConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() / 2.0
    }
}

/// Round escalation rules
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoundRules {
    pub initial_quota: u32,
    pub quota_increment: u32,
    /// Seconds between spawn events in round 1
    pub initial_spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub spawn_interval_decrease: f32,
    /// How long the "Round N" banner is shown, in seconds
    pub transition_duration: f32,
    pub asteroids_per_spawn: u32,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            initial_quota: 10,
            quota_increment: 5,
            initial_spawn_interval: 0.75,
            min_spawn_interval: 0.3,
            spawn_interval_decrease: 0.05,
            transition_duration: 2.0,
            asteroids_per_spawn: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Unscaled sprite size in pixels
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub scale: f32,
    /// Pixels per second
    pub speed: f32,
    /// Inward padding applied on each side of the sprite rect
    pub hitbox_padding: i32,
    /// Minimum distance kept from every screen edge
    pub edge_margin: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sprite_width: 500.0,
            sprite_height: 500.0,
            scale: 0.20,
            speed: 300.0,
            hitbox_padding: 10,
            edge_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    /// Unscaled sprite sizes of the two asteroid variants
    pub sprite_sizes: [(f32, f32); 2],
    pub min_scale: f32,
    pub max_scale: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Degrees per second, sampled in `-max_spin..max_spin`
    pub max_spin: f32,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            sprite_sizes: [(400.0, 400.0), (360.0, 360.0)],
            min_scale: 0.2,
            max_scale: 0.5,
            min_speed: 100.0,
            max_speed: 500.0,
            max_spin: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub width: i32,
    pub height: i32,
    pub speed: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            speed: 900.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub muted: bool,
    pub gun_sound: PathBuf,
    pub music: PathBuf,
    pub gun_volume: f32,
    pub music_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            muted: false,
            gun_sound: PathBuf::from("assets/gunsound.mp3"),
            music: PathBuf::from("assets/backgroundmusic.mp3"),
            gun_volume: 0.3,
            music_volume: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub frame_count: u32,
    pub frame_delay: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            frame_count: 9,
            frame_delay: 0.1,
        }
    }
}

/// Top-level game tunables. Every value has a default, so a config file
/// only needs the fields it wants to override.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub rounds: RoundRules,
    pub player: PlayerConfig,
    pub asteroids: AsteroidConfig,
    pub projectiles: ProjectileConfig,
    pub audio: AudioConfig,
    pub backdrop: BackdropConfig,
    /// Top-left offset of the round counter
    pub hud_offset: (f32, f32),
    /// Upper bound on the per-frame delta handed to the game
    pub max_frame_dt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            rounds: RoundRules::default(),
            player: PlayerConfig::default(),
            asteroids: AsteroidConfig::default(),
            projectiles: ProjectileConfig::default(),
            audio: AudioConfig::default(),
            backdrop: BackdropConfig::default(),
            hud_offset: (20.0, 20.0),
            max_frame_dt: 0.1,
        }
    }
}

impl GameConfig {
    /// Load from a JSON file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&raw).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    /// Parse and validate a config.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game cannot run with. The negated comparisons also
    /// reject NaN.
    pub fn validate(&self) -> Result<()> {
        let screen = &self.screen;
        ensure!(
            screen.width >= 1.0 && screen.height >= 1.0,
            "screen must be at least 1x1 pixels, got {}x{}",
            screen.width,
            screen.height
        );

        let rounds = &self.rounds;
        ensure!(
            rounds.asteroids_per_spawn > 0,
            "rounds.asteroids_per_spawn must be at least 1"
        );
        ensure!(
            rounds.min_spawn_interval > 0.0,
            "rounds.min_spawn_interval must be positive, got {}",
            rounds.min_spawn_interval
        );
        ensure!(
            !(rounds.initial_spawn_interval < rounds.min_spawn_interval),
            "rounds.initial_spawn_interval ({}) is below rounds.min_spawn_interval ({})",
            rounds.initial_spawn_interval,
            rounds.min_spawn_interval
        );
        ensure!(
            rounds.spawn_interval_decrease >= 0.0,
            "rounds.spawn_interval_decrease must not be negative, got {}",
            rounds.spawn_interval_decrease
        );
        ensure!(
            rounds.transition_duration >= 0.0,
            "rounds.transition_duration must not be negative, got {}",
            rounds.transition_duration
        );

        let asteroids = &self.asteroids;
        ensure!(
            asteroids.min_scale > 0.0 && !(asteroids.min_scale > asteroids.max_scale),
            "asteroids scale range {}..={} is empty or not positive",
            asteroids.min_scale,
            asteroids.max_scale
        );
        for (w, h) in asteroids.sprite_sizes {
            ensure!(
                w * asteroids.min_scale >= 1.0 && h * asteroids.min_scale >= 1.0,
                "asteroid sprite {w}x{h} at scale {} is smaller than a pixel",
                asteroids.min_scale
            );
        }
        ensure!(
            asteroids.min_speed > 0.0 && !(asteroids.min_speed > asteroids.max_speed),
            "asteroids speed range {}..={} is empty or not positive",
            asteroids.min_speed,
            asteroids.max_speed
        );
        ensure!(
            asteroids.max_spin >= 0.0,
            "asteroids.max_spin must not be negative, got {}",
            asteroids.max_spin
        );

        ensure!(
            self.projectiles.width > 0 && self.projectiles.height > 0,
            "projectiles must be at least 1x1 pixels"
        );
        ensure!(
            self.max_frame_dt > 0.0,
            "max_frame_dt must be positive, got {}",
            self.max_frame_dt
        );
        Ok(())
    }
}
