//=========================================================================
// Virtual Controller
//=========================================================================
//
// Gameplay-facing input: a movement axis plus two buttons.
//
// Architecture:
//   StateTracker + ControllerBindings → sample() → VirtualController
//
// Sampled once per frame by the InputSystem, before the physics phase,
// so every hook in a frame reads the same values.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use super::state_tracker::StateTracker;

//=== ControllerBindings ==================================================

/// Keys feeding each controller input. Any bound key activates the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerBindings {
    pub up: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub primary: Vec<KeyCode>,
    pub cancel: Vec<KeyCode>,
}

impl Default for ControllerBindings {
    /// WASD and arrow keys for movement, Space/Enter and Escape for buttons.
    fn default() -> Self {
        Self {
            up: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            down: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            primary: vec![KeyCode::Space, KeyCode::Enter],
            cancel: vec![KeyCode::Escape],
        }
    }
}

//=== VirtualController ===================================================

/// Per-frame controller snapshot.
///
/// The movement axis uses world orientation (+Y is up) and never exceeds
/// unit length, so diagonals are as fast as straight lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VirtualController {
    movement: Vec2,
    primary_down: bool,
    primary_pressed: bool,
    cancel_pressed: bool,
}

impl VirtualController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the snapshot from the tracker's current frame.
    pub fn sample(&mut self, input: &StateTracker, bindings: &ControllerBindings) {
        let axis = |negative: &[KeyCode], positive: &[KeyCode]| -> f32 {
            let neg = if input.any_key_down(negative) { 1.0 } else { 0.0 };
            let pos = if input.any_key_down(positive) { 1.0 } else { 0.0 };
            pos - neg
        };

        self.movement = Vec2::new(
            axis(&bindings.left, &bindings.right),
            axis(&bindings.down, &bindings.up),
        )
        .clamp_length_max(1.0);
        self.primary_down = input.any_key_down(&bindings.primary);
        self.primary_pressed = input.any_key_pressed(&bindings.primary);
        self.cancel_pressed = input.any_key_pressed(&bindings.cancel);
    }

    //--- Queries ----------------------------------------------------------

    /// Movement direction, length in `[0, 1]`.
    pub fn movement_axis(&self) -> Vec2 {
        self.movement
    }

    /// `true` while the movement axis is non-zero.
    pub fn is_moving(&self) -> bool {
        self.movement != Vec2::ZERO
    }

    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    pub fn primary_pressed(&self) -> bool {
        self.primary_pressed
    }

    pub fn cancel_pressed(&self) -> bool {
        self.cancel_pressed
    }

    //--- Overrides --------------------------------------------------------

    /// Replaces the movement axis until the next sample.
    ///
    /// Used by scripted input and tests. The value is clamped to unit length.
    pub fn set_movement_axis(&mut self, axis: Vec2) {
        self.movement = axis.clamp_length_max(1.0);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
