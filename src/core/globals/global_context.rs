//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container handed to every lifecycle hook.
//
// Contains state data that components read/write:
// - input: Low-level input state (keys, mouse, modifiers)
// - controller: Virtual controller derived from input each frame
// - scene_requests: Command queue for scene changes
// - clock: Frame counter and elapsed simulation time
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::runtime::EngineStatus;
use crate::core::input::{InputEvent, StateTracker, VirtualController};
use crate::core::scene::{SceneId, TransitionQueue};

//=== GlobalContext =======================================================

/// Shared context data accessible to components during hooks.
///
/// Components reach it through
/// [`ComponentContext::globals`](crate::core::entity::ComponentContext).
/// This separates hook-accessible data from internal engine systems.
///
/// # Available Data
///
/// - `input`: Raw input state (keys pressed/down/released, mouse)
/// - `controller`: Movement axis and button state for gameplay code
/// - scene requests: via [`request_scene`](Self::request_scene)
/// - clock: via [`frame`](Self::frame) and [`elapsed`](Self::elapsed)
pub struct GlobalContext {
    /// Raw input state tracker for low-level input queries.
    pub input: StateTracker,

    /// High-level controller state, rebuilt by the input system each frame.
    pub controller: VirtualController,

    /// Scene change requests, drained by the scene manager.
    pub(crate) scene_requests: TransitionQueue,

    /// Input events for the current frame.
    ///
    /// Filled from the platform channel and consumed by InputSystem at the
    /// start of the tick.
    pub(crate) frame_events: Vec<Vec<InputEvent>>,

    frame: u64,
    elapsed: f64,
    status: Arc<EngineStatus>,
}

impl GlobalContext {
    /// Creates a new context with empty state.
    pub fn new() -> Self {
        Self::with_status(Arc::new(EngineStatus::new()))
    }

    /// Creates a context that publishes its clock and exit flag to `status`.
    pub(crate) fn with_status(status: Arc<EngineStatus>) -> Self {
        Self {
            input: StateTracker::new(),
            controller: VirtualController::new(),
            scene_requests: TransitionQueue::new(),
            frame_events: Vec::new(),
            frame: 0,
            elapsed: 0.0,
            status,
        }
    }

    //--- Scene Requests ---------------------------------------------------

    /// Asks the root scene manager to switch to `scene` at the next safe point.
    ///
    /// Several requests in one frame collapse to the last one.
    pub fn request_scene(&mut self, scene: impl Into<SceneId>) {
        self.scene_requests.push(scene.into());
    }

    //--- Clock ------------------------------------------------------------

    /// Number of completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulation time accumulated over completed frames, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub(crate) fn advance_clock(&mut self, dt: f32) {
        self.frame += 1;
        self.elapsed += f64::from(dt);
        self.status.publish_frame(self.frame);
    }

    //--- Shutdown ---------------------------------------------------------

    /// Asks the engine to stop after the current frame.
    pub fn request_exit(&mut self) {
        self.status.request_exit();
    }

    pub fn exit_requested(&self) -> bool {
        self.status.exit_requested()
    }

    pub(crate) fn status(&self) -> &Arc<EngineStatus> {
        &self.status
    }
}

impl Default for GlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
