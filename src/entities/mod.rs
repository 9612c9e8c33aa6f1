mod asteroid;
mod player;
mod pool;
mod projectile;

// Re-export all public types
pub use asteroid::{Asteroid, AsteroidVariant};
pub use player::{Direction, Player, PlayerInput};
pub use pool::{EntityPool, Handle};
pub use projectile::Projectile;
