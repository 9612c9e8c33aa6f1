use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::style::Color;

use crate::audio::SoundEffects;
use crate::collision::{player_hit, projectile_hits};
use crate::config::GameConfig;
use crate::entities::{
    Asteroid, AsteroidVariant, EntityPool, Handle, Player, PlayerInput, Projectile,
};
use crate::geometry::Aabb;
use crate::renderer::{Canvas, TextAnchor, TextSize};
use crate::round::{RoundProgression, SpawnDecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    Playing,
    Over,
}

/// Input the game reacts to while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Fire,
    Player(PlayerInput),
}

/// Owns every live entity and the round state. The only thing the frame
/// driver talks to.
pub struct Game {
    config: GameConfig,
    phase: GamePhase,
    player: Option<Player>,
    projectiles: EntityPool<Projectile>,
    asteroids: EntityPool<Asteroid>,
    rounds: RoundProgression,
    /// Last known pointer position in world pixels
    pointer: Vec2,
    sounds: Box<dyn SoundEffects>,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, sounds: Box<dyn SoundEffects>) -> Self {
        Self::with_rng(config, sounds, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn with_rng(config: GameConfig, sounds: Box<dyn SoundEffects>, rng: StdRng) -> Self {
        Self {
            rounds: RoundProgression::new(config.rounds),
            pointer: config.screen.center(),
            config,
            phase: GamePhase::NotStarted,
            player: None,
            projectiles: EntityPool::new(),
            asteroids: EntityPool::new(),
            sounds,
            rng,
        }
    }

    /// Start or restart. The ship is created once and kept across restarts;
    /// rounds and every other entity are reset.
    pub fn initialize(&mut self) {
        match &mut self.player {
            Some(player) => player.halt(),
            None => self.player = Some(Player::new(&self.config.player, &self.config.screen)),
        }
        self.rounds.reset_to_round_one();
        self.projectiles.clear();
        self.asteroids.clear();
        self.phase = GamePhase::Playing;
        log::info!("game started at round {}", self.rounds.current_round());
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    pub fn handle_event(&mut self, event: GameEvent) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };

        match event {
            GameEvent::Fire => {
                let projectile = player.shoot(self.pointer, &self.config.projectiles);
                self.projectiles.insert(projectile);
                self.sounds.play_gun_sound();
            }
            GameEvent::Player(input) => player.handle_input(input),
        }
    }

    /// Advance one frame. Returns false once the player has been hit.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.phase != GamePhase::Playing {
            return self.phase != GamePhase::Over;
        }
        let Some(player) = self.player.as_mut() else {
            return true;
        };
        let screen = self.config.screen;

        self.rounds.update_transition_timer(dt);

        let (decision, rounds) = self.rounds.spawn_step(dt);
        self.rounds = rounds;
        if decision == SpawnDecision::Spawn {
            let count = self.rounds.asteroids_per_spawn().min(self.rounds.remaining());
            let target = player.position;
            for slot in 0..count {
                let asteroid = Asteroid::spawn(
                    &mut self.rng,
                    AsteroidVariant::for_spawn_slot(slot),
                    &self.config.asteroids,
                    &screen,
                    target,
                );
                self.asteroids.insert(asteroid);
            }
            self.rounds.mark_asteroids_spawned(count);
            log::debug!(
                "spawned {count} asteroids ({}/{})",
                self.rounds.spawned(),
                self.rounds.quota()
            );
        }

        if self.rounds.is_round_complete(self.asteroids.len()) {
            self.rounds.advance_to_next_round();
            self.projectiles.clear();
            log::info!(
                "round {} begins: {} asteroids, {:.2}s spawn interval",
                self.rounds.current_round(),
                self.rounds.quota(),
                self.rounds.spawn_interval()
            );
        }

        player.update(dt, &screen);
        let target = player.position;
        let hitbox = player.hitbox();

        self.projectiles.for_each_mut(|projectile| projectile.update(dt));
        self.projectiles
            .retain(|projectile| !projectile.is_off_screen(&screen));

        self.asteroids
            .for_each_mut(|asteroid| asteroid.update(dt, target));
        self.asteroids.retain(|asteroid| !asteroid.is_off_screen(&screen));

        self.resolve_projectile_hits();

        if player_hit(hitbox, self.asteroids.values().map(Asteroid::rect)) {
            self.phase = GamePhase::Over;
            log::info!("ship destroyed in round {}", self.rounds.current_round());
            return false;
        }

        true
    }

    fn resolve_projectile_hits(&mut self) {
        let projectiles: Vec<(Handle, Aabb)> = self
            .projectiles
            .iter()
            .map(|(handle, projectile)| (handle, projectile.rect()))
            .collect();
        let asteroids: Vec<(Handle, Aabb)> = self
            .asteroids
            .iter()
            .map(|(handle, asteroid)| (handle, asteroid.rect()))
            .collect();

        for hit in projectile_hits(&projectiles, &asteroids) {
            self.projectiles.remove(hit.projectile);
            self.asteroids.remove(hit.asteroid);
            log::debug!("asteroid destroyed, {} left", self.asteroids.len());
        }
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        let Some(player) = &self.player else {
            return;
        };
        if self.phase == GamePhase::NotStarted {
            return;
        }

        for asteroid in self.asteroids.values() {
            asteroid.render(canvas);
        }
        for projectile in self.projectiles.values() {
            projectile.render(canvas);
        }
        player.render(canvas, self.pointer);

        let label = format!("Round {}", self.rounds.current_round());
        let (x, y) = self.config.hud_offset;
        canvas.draw_text(
            &label,
            TextAnchor::TopLeft(Vec2::new(x, y)),
            TextSize::Normal,
            Color::White,
        );
        if self.rounds.is_showing_transition() {
            canvas.draw_text(
                &label,
                TextAnchor::Center(self.config.screen.center()),
                TextSize::Large,
                Color::Yellow,
            );
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::NotStarted
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    pub fn rounds(&self) -> &RoundProgression {
        &self.rounds
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn projectiles(&self) -> &EntityPool<Projectile> {
        &self.projectiles
    }

    pub fn asteroids(&self) -> &EntityPool<Asteroid> {
        &self.asteroids
    }

    /// Place an asteroid directly, bypassing spawning and round quotas
    pub fn insert_asteroid(&mut self, asteroid: Asteroid) -> Handle {
        self.asteroids.insert(asteroid)
    }

    pub fn insert_projectile(&mut self, projectile: Projectile) -> Handle {
        self.projectiles.insert(projectile)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoundRules;
    use crate::entities::Direction;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CountingSounds(Rc<Cell<u32>>);

    impl SoundEffects for CountingSounds {
        fn play_gun_sound(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn game_with(config: GameConfig) -> (Game, CountingSounds) {
        let sounds = CountingSounds::default();
        let game = Game::with_rng(config, Box::new(sounds.clone()), StdRng::seed_from_u64(7));
        (game, sounds)
    }

    fn started() -> (Game, CountingSounds) {
        let (mut game, sounds) = game_with(GameConfig::default());
        game.initialize();
        (game, sounds)
    }

    fn still_asteroid(x: f32, y: f32, size: i32) -> Asteroid {
        let position = Vec2::new(x, y);
        Asteroid::new(position, size, size, 0.0, position, AsteroidVariant::Cratered)
    }

    fn still_projectile(game: &Game, x: f32, y: f32) -> Projectile {
        let at = Vec2::new(x, y);
        Projectile::new(at, at, &game.config().projectiles)
    }

    #[test]
    fn test_events_ignored_before_start() {
        let (mut game, sounds) = game_with(GameConfig::default());
        game.handle_event(GameEvent::Fire);
        game.handle_event(GameEvent::Player(PlayerInput::Press(Direction::Up)));

        assert!(game.projectiles().is_empty());
        assert_eq!(sounds.0.get(), 0);
        assert!(game.player().is_none());
        assert!(game.update(0.1));
        assert_eq!(game.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_initialize_places_player_at_center() {
        let (game, _) = started();
        let player = game.player().unwrap();
        assert_eq!(player.position, Vec2::new(960.0, 540.0));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.rounds().current_round(), 1);
        assert!(game.rounds().is_showing_transition());
    }

    #[test]
    fn test_fire_spawns_projectile_and_plays_sound() {
        let (mut game, sounds) = started();
        game.set_pointer(Vec2::new(1500.0, 590.0));
        game.handle_event(GameEvent::Fire);

        assert_eq!(game.projectiles().len(), 1);
        assert_eq!(sounds.0.get(), 1);
        let projectile = game.projectiles().values().next().unwrap();
        assert_eq!(projectile.position, Vec2::new(1010.0, 590.0));
        assert!(projectile.velocity.x > 0.0);
        assert_eq!(projectile.velocity.y, 0.0);
    }

    #[test]
    fn test_initialize_keeps_player_position_but_stops_movement() {
        let (mut game, _) = started();
        game.handle_event(GameEvent::Player(PlayerInput::Press(Direction::Right)));
        game.update(0.5);
        assert_eq!(game.player().unwrap().position.x, 1110.0);

        game.insert_asteroid(still_asteroid(100.0, 100.0, 50));
        game.initialize();

        let player = game.player().unwrap();
        assert_eq!(player.position.x, 1110.0);
        assert!(!player.is_moving());
        assert!(game.asteroids().is_empty());
        assert!(game.projectiles().is_empty());
    }

    #[test]
    fn test_projectile_destroys_asteroid() {
        let (mut game, _) = started();
        game.insert_asteroid(still_asteroid(100.0, 100.0, 100));
        let projectile = still_projectile(&game, 150.0, 150.0);
        game.insert_projectile(projectile);

        assert!(game.update(0.01));
        assert!(game.asteroids().is_empty());
        assert!(game.projectiles().is_empty());
    }

    #[test]
    fn test_one_projectile_destroys_one_asteroid() {
        let (mut game, _) = started();
        game.insert_asteroid(still_asteroid(100.0, 100.0, 100));
        game.insert_asteroid(still_asteroid(120.0, 120.0, 100));
        let projectile = still_projectile(&game, 150.0, 150.0);
        game.insert_projectile(projectile);

        game.update(0.01);
        assert_eq!(game.asteroids().len(), 1);
        assert_eq!(game.asteroids().values().next().unwrap().position.x, 120.0);
    }

    #[test]
    fn test_asteroid_on_player_ends_game() {
        let (mut game, _) = started();
        game.insert_asteroid(still_asteroid(980.0, 560.0, 40));

        assert!(!game.update(0.01));
        assert!(game.is_over());

        // frozen once over
        game.handle_event(GameEvent::Fire);
        assert!(game.projectiles().is_empty());
        assert!(!game.update(0.01));
        assert_eq!(game.asteroids().len(), 1);
    }

    #[test]
    fn test_sprite_touching_only_padding_is_not_a_hit() {
        let (mut game, _) = started();
        // overlaps the sprite's padded border, not the hitbox
        game.insert_asteroid(still_asteroid(915.0, 545.0, 50));
        assert!(game.update(0.01));
    }

    #[test]
    fn test_spawn_events_stop_at_quota() {
        let mut config = GameConfig::default();
        config.rounds = RoundRules {
            initial_quota: 4,
            asteroids_per_spawn: 3,
            transition_duration: 0.5,
            initial_spawn_interval: 0.5,
            ..RoundRules::default()
        };
        config.asteroids.min_speed = 1.0;
        config.asteroids.max_speed = 2.0;
        let (mut game, _) = game_with(config);
        game.initialize();

        assert!(game.update(0.5));
        assert_eq!(game.asteroids().len(), 3);
        assert_eq!(game.rounds().spawned(), 3);

        assert!(game.update(0.5));
        assert_eq!(game.asteroids().len(), 4);
        assert_eq!(game.rounds().spawned(), 4);
        assert_eq!(game.rounds().remaining(), 0);

        let variants: Vec<_> = game.asteroids().values().map(|a| a.variant).collect();
        assert_eq!(
            variants,
            vec![
                AsteroidVariant::Cratered,
                AsteroidVariant::Jagged,
                AsteroidVariant::Cratered,
                AsteroidVariant::Cratered,
            ]
        );

        assert!(game.update(0.5));
        assert_eq!(game.asteroids().len(), 4);
    }

    #[test]
    fn test_round_advance_clears_projectiles() {
        let mut config = GameConfig::default();
        config.rounds.initial_quota = 0;
        config.rounds.quota_increment = 0;
        let (mut game, _) = game_with(config);
        game.initialize();
        let projectile = still_projectile(&game, 100.0, 100.0);
        game.insert_projectile(projectile);

        assert!(game.update(1.0));
        assert_eq!(game.rounds().current_round(), 1);
        assert_eq!(game.projectiles().len(), 1);

        assert!(game.update(1.0));
        assert_eq!(game.rounds().current_round(), 2);
        assert!(game.rounds().is_showing_transition());
        assert!(game.projectiles().is_empty());
    }

    #[test]
    fn test_far_projectiles_are_culled() {
        let (mut game, _) = started();
        let projectile = still_projectile(&game, -51.0, 300.0);
        game.insert_projectile(projectile);
        let projectile = still_projectile(&game, -50.0, 300.0);
        game.insert_projectile(projectile);

        game.update(0.01);
        assert_eq!(game.projectiles().len(), 1);
        assert_eq!(game.projectiles().values().next().unwrap().position.x, -50.0);
    }
}
