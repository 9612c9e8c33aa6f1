use color_eyre::Result;
use glam::Vec2;
use ratatui::{Terminal, backend::Backend, layout::Rect};
use std::time::{Duration, Instant};

use crate::backdrop::Backdrop;
use crate::config::GameConfig;
use crate::entities::PlayerInput;
use crate::game::{Game, GameEvent};
use crate::input::{InputAction, InputManager};
use crate::menu::StartScreen;
use crate::renderer::{GameRenderer, RenderView};

/// Which screen is in front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    screen: Screen,
    game: Game,
    menu: StartScreen,
    backdrop: Backdrop,
    /// Pointer in world pixels
    pointer: Vec2,
    /// Terminal area of the last drawn frame, for mapping mouse cells
    area: Rect,
    max_frame_dt: f32,
    world: Vec2,
    last_frame_time: Instant,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    pub fn new(config: &GameConfig, game: Game, input_manager: InputManager) -> Self {
        Self {
            running: true,
            screen: Screen::Menu,
            game,
            menu: StartScreen::new(&config.screen),
            backdrop: Backdrop::new(&config.backdrop),
            pointer: config.screen.center(),
            area: Rect::default(),
            max_frame_dt: config.max_frame_dt,
            world: config.screen.size(),
            last_frame_time: Instant::now(),
            input_manager,
            renderer: GameRenderer::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        log::info!("main loop started");
        while self.running {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame_time).as_secs_f32();
            self.last_frame_time = now;

            let size = terminal.size()?;
            self.area = Rect::new(0, 0, size.width, size.height);

            let actions = self.input_manager.poll_events()?;
            self.process_actions(&actions);

            self.step(dt);

            terminal.draw(|frame| {
                let view = RenderView {
                    screen: self.screen,
                    game: &self.game,
                    menu: &self.menu,
                    backdrop: &self.backdrop,
                    pointer: self.pointer,
                    area: frame.area(),
                    world: self.world,
                };
                self.renderer.render(frame, &view);
            })?;

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        log::info!("main loop stopped");
        Ok(())
    }

    /// Advance one frame of simulation by a clamped `dt`.
    fn step(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.max_frame_dt);
        if self.screen == Screen::Playing && !self.game.update(dt) {
            self.screen = Screen::GameOver;
        }
        self.backdrop.update(dt);
    }

    fn start_game(&mut self) {
        self.game.initialize();
        self.game.set_pointer(self.pointer);
        self.screen = Screen::Playing;
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for &action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::PointerMoved { column, row } => {
                    self.pointer = self.world_point(column, row);
                    self.game.set_pointer(self.pointer);
                    if self.screen == Screen::Menu {
                        self.menu.pointer_moved(self.pointer);
                    }
                }
                InputAction::Click { column, row } => {
                    let point = self.world_point(column, row);
                    match self.screen {
                        Screen::Menu => {
                            if self.menu.click(point) {
                                self.start_game();
                            }
                        }
                        Screen::Playing => self.game.handle_event(GameEvent::Fire),
                        Screen::GameOver => {}
                    }
                }
                InputAction::Confirm => {
                    if self.screen != Screen::Playing {
                        self.start_game();
                    }
                }
                InputAction::Press(direction) => {
                    self.game
                        .handle_event(GameEvent::Player(PlayerInput::Press(direction)));
                }
                InputAction::Release(direction) => {
                    self.game
                        .handle_event(GameEvent::Player(PlayerInput::Release(direction)));
                }
            }
        }
    }

    fn world_point(&self, column: u16, row: u16) -> Vec2 {
        GameRenderer::viewport(self.area, self.world).world_of(column, row)
    }
}
