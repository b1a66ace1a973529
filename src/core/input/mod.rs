//=========================================================================
// Input System
//=========================================================================
//
// Turns the frame's raw platform events into queryable state.
//
// Architecture:
//   Vec<Vec<InputEvent>> → StateTracker (edges) → VirtualController (axis)
//
// Runs once at the start of every tick, before the physics phase. Both
// outputs live in GlobalContext so every hook reads the same snapshot.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;
mod virtual_controller;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state_tracker::StateTracker;
pub use virtual_controller::{ControllerBindings, VirtualController};

//=== External Dependencies ===============================================

use log::trace;

//=== InputSystem =========================================================

/// Per-frame input processing and controller bindings.
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// let mut systems = GlobalSystems::new();
/// systems.input.bindings_mut().primary.push(KeyCode::KeyJ);
/// ```
#[derive(Debug, Default)]
pub struct InputSystem {
    bindings: ControllerBindings,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> &ControllerBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut ControllerBindings {
        &mut self.bindings
    }

    /// Applies every batch received this frame, then samples the controller.
    pub fn process_frame(
        &mut self,
        tracker: &mut StateTracker,
        controller: &mut VirtualController,
        batches: &[Vec<InputEvent>],
    ) {
        tracker.begin_frame();
        for event in batches.iter().flatten() {
            tracker.apply(event);
        }
        tracker.end_frame();

        let before = *controller;
        controller.sample(tracker, &self.bindings);
        if *controller != before {
            trace!(target: "platform::input", "Controller: {:?}", controller);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
