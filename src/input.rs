use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::{Duration, Instant};

use crate::entities::Direction;

/// Semantic actions produced from raw terminal events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Press(Direction),
    Release(Direction),
    /// Left mouse button went down at a terminal cell
    Click { column: u16, row: u16 },
    /// Pointer moved to a terminal cell
    PointerMoved { column: u16, row: u16 },
    Confirm,
    Quit,
}

/// How long a key counts as held when the terminal never reports releases
const SYNTHETIC_HOLD: Duration = Duration::from_millis(500);

/// Polls crossterm and translates raw events into [`InputAction`]s
pub struct InputManager {
    /// Terminal reports key release events
    reports_release: bool,
    /// Last press time of each held direction, used without release events
    held: Vec<(Direction, Instant)>,
    actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            held: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn poll_events(&mut self) -> color_eyre::Result<Vec<InputAction>> {
        self.actions.clear();
        let now = Instant::now();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            self.handle_event(event, now);
        }

        if !self.reports_release {
            self.release_stale(now);
        }

        Ok(std::mem::take(&mut self.actions))
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event, now),
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, now),
            KeyEventKind::Release => {
                if let Some(direction) = direction_for(key_event.code) {
                    self.actions.push(InputAction::Release(direction));
                }
            }
            KeyEventKind::Repeat => {
                // auto-repeat only refreshes a synthetic hold
                if let Some(direction) = direction_for(key_event.code) {
                    self.refresh_hold(direction, now);
                }
            }
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, now: Instant) {
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.actions.push(InputAction::Quit);
            return;
        }

        if matches!(
            key_event.code,
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R')
        ) {
            self.actions.push(InputAction::Confirm);
            return;
        }

        if let Some(direction) = direction_for(key_event.code) {
            if self.reports_release {
                self.actions.push(InputAction::Press(direction));
            } else {
                // without releases, a repeated press only extends the hold
                if !self.held.iter().any(|(d, _)| *d == direction) {
                    self.actions.push(InputAction::Press(direction));
                }
                self.refresh_hold(direction, now);
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let (column, row) = (mouse_event.column, mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.actions.push(InputAction::PointerMoved { column, row });
                self.actions.push(InputAction::Click { column, row });
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.actions.push(InputAction::PointerMoved { column, row });
            }
            _ => {}
        }
    }

    fn refresh_hold(&mut self, direction: Direction, now: Instant) {
        if self.reports_release {
            return;
        }
        match self.held.iter_mut().find(|(d, _)| *d == direction) {
            Some((_, pressed)) => *pressed = now,
            None => self.held.push((direction, now)),
        }
    }

    fn release_stale(&mut self, now: Instant) {
        let actions = &mut self.actions;
        self.held.retain(|&(direction, pressed)| {
            let stale = now.duration_since(pressed) >= SYNTHETIC_HOLD;
            if stale {
                actions.push(InputAction::Release(direction));
            }
            !stale
        });
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn feed(input: &mut InputManager, events: Vec<Event>, now: Instant) -> Vec<InputAction> {
        input.actions.clear();
        for event in events {
            input.handle_event(event, now);
        }
        std::mem::take(&mut input.actions)
    }

    #[test]
    fn test_press_and_release_map_to_directions() {
        let mut input = InputManager::new(true);
        let actions = feed(
            &mut input,
            vec![
                key(KeyCode::Char('w'), KeyEventKind::Press),
                key(KeyCode::Left, KeyEventKind::Press),
                key(KeyCode::Char('w'), KeyEventKind::Release),
            ],
            Instant::now(),
        );
        assert_eq!(
            actions,
            vec![
                InputAction::Press(Direction::Up),
                InputAction::Press(Direction::Left),
                InputAction::Release(Direction::Up),
            ]
        );
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut input = InputManager::new(true);
        let actions = feed(
            &mut input,
            vec![key(KeyCode::Char('d'), KeyEventKind::Repeat)],
            Instant::now(),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_quit_and_confirm_keys() {
        let mut input = InputManager::new(true);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let actions = feed(
            &mut input,
            vec![key(KeyCode::Esc, KeyEventKind::Press), ctrl_c, key(KeyCode::Enter, KeyEventKind::Press)],
            Instant::now(),
        );
        assert_eq!(
            actions,
            vec![InputAction::Quit, InputAction::Quit, InputAction::Confirm]
        );
    }

    #[test]
    fn test_left_click_reports_position_then_click() {
        let mut input = InputManager::new(true);
        let actions = feed(
            &mut input,
            vec![
                mouse(MouseEventKind::Moved, 4, 5),
                mouse(MouseEventKind::Down(MouseButton::Left), 7, 8),
                mouse(MouseEventKind::Down(MouseButton::Right), 9, 9),
            ],
            Instant::now(),
        );
        assert_eq!(
            actions,
            vec![
                InputAction::PointerMoved { column: 4, row: 5 },
                InputAction::PointerMoved { column: 7, row: 8 },
                InputAction::Click { column: 7, row: 8 },
            ]
        );
    }

    #[test]
    fn test_synthetic_release_without_release_events() {
        let mut input = InputManager::new(false);
        let start = Instant::now();
        let actions = feed(
            &mut input,
            vec![
                key(KeyCode::Char('a'), KeyEventKind::Press),
                key(KeyCode::Char('a'), KeyEventKind::Press),
            ],
            start,
        );
        assert_eq!(actions, vec![InputAction::Press(Direction::Left)]);

        input.release_stale(start + Duration::from_millis(50));
        assert!(input.actions.is_empty());

        // outlasts the usual delay before a terminal's first key repeat
        input.release_stale(start + Duration::from_millis(400));
        assert!(input.actions.is_empty());

        input.release_stale(start + SYNTHETIC_HOLD);
        assert_eq!(input.actions, vec![InputAction::Release(Direction::Left)]);
        assert!(input.held.is_empty());
    }
}
