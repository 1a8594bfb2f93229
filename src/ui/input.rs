/// Input state tracker.
///
/// Turn-based movement wants edge triggers only: one fresh key press is
/// one move attempt, and holding a key must not queue a flood of moves.
/// Repeat events from the terminal are therefore dropped, not treated as
/// presses.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::domain::entity::MoveDir;

pub struct InputState {
    /// Keys freshly pressed during the most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                if key.kind == KeyEventKind::Press {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// First movement direction pressed this frame, if any.
    /// Arrows and WASD both work.
    pub fn move_dir(&self) -> Option<MoveDir> {
        for code in &self.fresh_presses {
            let dir = match code {
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => MoveDir::Up,
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => MoveDir::Down,
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => MoveDir::Left,
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => MoveDir::Right,
                _ => continue,
            };
            return Some(dir);
        }
        None
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
