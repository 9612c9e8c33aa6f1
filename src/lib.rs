// Library exports for testing
pub use collision::{Hit, player_hit, projectile_hits};
pub use config::GameConfig;
pub use entities::{
    Asteroid, AsteroidVariant, Direction, EntityPool, Handle, Player, PlayerInput, Projectile,
};
pub use game::{Game, GameEvent, GamePhase};
pub use geometry::Aabb;
pub use renderer::{Canvas, Sprite, TextAnchor, TextSize};
pub use round::{RoundPhase, RoundProgression, SpawnDecision};

pub mod app;
pub mod audio;
pub mod backdrop;
pub mod collision;
pub mod config;
pub mod entities;
pub mod game;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod renderer;
pub mod round;
