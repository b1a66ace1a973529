//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level input state with per-frame deltas.
//
// Architecture:
//   InputEvent → apply() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: begin_frame() → apply()* → end_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Tracks held inputs across frames and press/release edges within one.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: Vec2,
    modifiers: Modifiers,

    //--- Frame Deltas -----------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    wheel: f32,

    //--- Derived ----------------------------------------------------------
    frame_start_position: Vec2,
    mouse_delta: Vec2,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops last frame's edges.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = 0.0;
        self.frame_start_position = self.mouse_position;
    }

    /// Folds one event into the current frame.
    pub fn apply(&mut self, event: &InputEvent) {
        if let Some(modifiers) = event.modifiers() {
            self.modifiers = modifiers;
        }

        match *event {
            InputEvent::KeyDown { key, .. } => {
                // Key repeat must not produce a second press edge
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::KeyUp { key, .. } => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            InputEvent::MouseButtonDown { button, .. } => {
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::MouseButtonUp { button, .. } => {
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            InputEvent::MouseMoved { x, y } => self.mouse_position = Vec2::new(x, y),
            InputEvent::MouseWheel { delta } => self.wheel += delta,
            InputEvent::FocusLost => self.release_all(),
        }
    }

    /// Computes values derived from the whole frame.
    pub(crate) fn end_frame(&mut self) {
        self.mouse_delta = self.mouse_position - self.frame_start_position;
    }

    fn release_all(&mut self) {
        self.keys_released.extend(self.keys_down.drain());
        self.buttons_released.extend(self.buttons_down.drain());
        self.modifiers = Modifiers::NONE;
    }

    //--- Keyboard ---------------------------------------------------------

    /// `true` on the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` on the frame the key went up.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// `true` if any of `keys` is held.
    pub fn any_key_down(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.keys_down.contains(key))
    }

    /// `true` if any of `keys` went down this frame.
    pub fn any_key_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.keys_pressed.contains(key))
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    //--- Mouse ------------------------------------------------------------

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Cursor position in window pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor movement over the last frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll accumulated over the last frame.
    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    //--- Modifiers --------------------------------------------------------

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
