use crate::windowing::WindowSignal;
use std::collections::HashMap;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

pub type KeyState = ElementState;

/// Keyboard state fed from the window's event pump.
///
/// Edge queries ("just pressed/released") are valid for exactly one tick; the
/// orchestrator clears them with [`InputManager::next_frame`] before pumping
/// the next batch of events.
#[derive(Debug)]
pub struct InputManager {
    key_states: HashMap<KeyCode, KeyState>,
    key_just_updated: Vec<KeyCode>,
    focused: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self {
            key_states: HashMap::new(),
            key_just_updated: Vec::new(),
            focused: true,
        }
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_signal(&mut self, signal: &WindowSignal) {
        match signal {
            WindowSignal::FocusChanged(focused) => self.focused = *focused,
            WindowSignal::Key { code, state } => {
                if !self.focused {
                    return;
                }
                if !state.is_pressed()
                    || self
                        .key_states
                        .get(code)
                        .is_none_or(|state| !state.is_pressed())
                {
                    self.key_just_updated.push(*code);
                }

                self.key_states.insert(*code, *state);
            }
            _ => {}
        }
    }

    pub fn is_window_focused(&self) -> bool {
        self.focused
    }

    pub fn key_state(&self, key_code: KeyCode) -> KeyState {
        *self
            .key_states
            .get(&key_code)
            .unwrap_or(&KeyState::Released)
    }

    // Only is true if the key was JUST pressed
    pub fn is_key_down(&self, key_code: KeyCode) -> bool {
        self.key_state(key_code) == KeyState::Pressed
            && self.key_just_updated.contains(&key_code)
    }

    // true if the key was JUST pressed or is being held
    pub fn is_key_pressed(&self, key_code: KeyCode) -> bool {
        self.key_state(key_code) == KeyState::Pressed
    }

    // Only is true if the key was JUST released
    pub fn is_key_released(&self, key_code: KeyCode) -> bool {
        self.key_state(key_code) == KeyState::Released
            && self.key_just_updated.contains(&key_code)
    }

    pub fn is_key_up(&self, key_code: KeyCode) -> bool {
        self.key_state(key_code) == KeyState::Released
    }

    /// Clears the per-tick edge state.
    pub fn next_frame(&mut self) {
        self.key_just_updated.clear();
    }

    /// Drops all input state, including held keys.
    pub fn clear(&mut self) {
        self.key_states.clear();
        self.key_just_updated.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> WindowSignal {
        WindowSignal::Key {
            code,
            state: ElementState::Pressed,
        }
    }

    #[test]
    fn held_key_edges_only_once() {
        let mut input = InputManager::new();

        input.process_signal(&press(KeyCode::Escape));
        assert!(input.is_key_down(KeyCode::Escape));

        input.next_frame();
        // key repeat from the window backend while held
        input.process_signal(&press(KeyCode::Escape));
        assert!(!input.is_key_down(KeyCode::Escape));
        assert!(input.is_key_pressed(KeyCode::Escape));
    }

    #[test]
    fn release_edges_once_then_stays_up() {
        let mut input = InputManager::new();
        input.process_signal(&press(KeyCode::KeyE));
        input.next_frame();

        input.process_signal(&WindowSignal::Key {
            code: KeyCode::KeyE,
            state: ElementState::Released,
        });
        assert!(input.is_key_released(KeyCode::KeyE));

        input.next_frame();
        assert!(!input.is_key_released(KeyCode::KeyE));
        assert!(input.is_key_up(KeyCode::KeyE));
    }

    #[test]
    fn unfocused_window_drops_keys() {
        let mut input = InputManager::new();
        input.process_signal(&WindowSignal::FocusChanged(false));
        input.process_signal(&press(KeyCode::KeyE));
        assert!(!input.is_key_pressed(KeyCode::KeyE));
    }
}
