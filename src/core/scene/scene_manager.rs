//=========================================================================
// Scene Manager
//=========================================================================
//
// Component that owns the scene registry and runs the safe-swap protocol.
//
// Scenes are registered as factories and built only when they become
// current. Exactly one scene is active at a time.
//
// Per frame:
//   update_physics: current scene (skipped while halted)
//   update_state:   current scene (skipped while halted), then drain requests
//   render:         drain requests ─► apply pending swap ─► render current
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{InstanceManager, Scene, SceneId, SwapPhase};
use crate::core::entity::{Component, ComponentContext, Lifecycle};
use crate::core::error::EngineResult;
use crate::core::globals::GlobalContext;

//=== Scene Manager =======================================================

/// Registers scenes and swaps the active one between frames.
///
/// A change request never touches the running scene. It marks the
/// manager *halted* (its physics and state hooks become no-ops) until the
/// next render phase, where the new scene is constructed, initialized,
/// enabled, and made current. The previous scene is dropped right after.
/// Only then is the current scene rendered.
///
/// The engine attaches one manager to its root entity; it is reachable
/// through [`GlobalSystems::scenes`](crate::core::globals::GlobalSystems::scenes)
/// and accepts requests from any component through
/// [`GlobalContext::request_scene`].
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// let mut scenes = SceneManager::new();
/// scenes.register_default("menu", || Scene::new("menu"));
/// assert!(scenes.register_scene("field", || Scene::new("field")));
/// assert!(!scenes.register_scene("field", || Scene::new("other")));
/// ```
pub struct SceneManager {
    instances: InstanceManager<SceneId, Scene>,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no scenes.
    pub fn new() -> Self {
        Self {
            instances: InstanceManager::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene factory. Returns `false` if `id` is taken.
    pub fn register_scene<F>(&mut self, id: impl Into<SceneId>, factory: F) -> bool
    where
        F: Fn() -> Scene + Send + 'static,
    {
        self.instances.register(id.into(), factory)
    }

    /// Registers a scene and requests it, making it the first scene shown.
    ///
    /// Returns `false` (and requests nothing) if `id` is taken.
    pub fn register_default<F>(&mut self, id: impl Into<SceneId>, factory: F) -> bool
    where
        F: Fn() -> Scene + Send + 'static,
    {
        let id = id.into();
        if !self.instances.register(id.clone(), factory) {
            return false;
        }
        debug!("Registered scene '{}' as default", id);
        self.instances.request_change(id).is_ok()
    }

    pub fn unregister_scene(&mut self, id: &SceneId) -> bool {
        self.instances.unregister(id)
    }

    pub fn is_registered(&self, id: &SceneId) -> bool {
        self.instances.is_registered(id)
    }

    pub fn registered_scenes(&self) -> &[SceneId] {
        self.instances.registered_keys()
    }

    //--- Requests ---------------------------------------------------------

    /// Requests a switch to `id` at the next render phase.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownInstance`](crate::core::error::EngineError::UnknownInstance)
    /// if `id` is not registered.
    pub fn request_change(&mut self, id: impl Into<SceneId>) -> EngineResult<()> {
        self.instances.request_change(id.into())
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> Option<&Scene> {
        self.instances.current()
    }

    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.instances.current_mut()
    }

    pub fn current_id(&self) -> Option<&SceneId> {
        self.instances.current_key()
    }

    pub fn pending_id(&self) -> Option<&SceneId> {
        self.instances.pending_key()
    }

    pub fn swap_phase(&self) -> SwapPhase {
        self.instances.swap_phase()
    }

    /// `true` between a change request and the safe point that applies it.
    pub fn is_halted(&self) -> bool {
        self.instances.is_halted()
    }

    //--- Internal Helpers -------------------------------------------------

    /// Moves queued requests into the instance manager; the last one wins.
    fn drain_requests(&mut self, globals: &mut GlobalContext) -> EngineResult<()> {
        if globals.scene_requests.is_empty() {
            return Ok(());
        }
        for id in globals.scene_requests.take() {
            self.instances.request_change(id)?;
        }
        Ok(())
    }

    /// The safe point. Drops the retired scene before returning.
    fn apply_pending(&mut self, globals: &mut GlobalContext) -> EngineResult<()> {
        let retired = self.instances.apply_pending(globals)?;
        if let Some(id) = self.instances.current_key() {
            if let Some(old) = retired {
                info!("Scene '{}' replaced by '{}'", old.id(), id);
            } else if self.instances.swap_phase() == SwapPhase::Steady {
                debug!("Scene '{}' active", id);
            }
        }
        Ok(())
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

//=== Component ===========================================================

impl Component for SceneManager {
    fn update_physics(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        if self.is_halted() {
            return Ok(());
        }
        match self.instances.current_mut() {
            Some(scene) => scene.update_physics(cx.globals, dt),
            None => Ok(()),
        }
    }

    fn update_state(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        if !self.is_halted() {
            if let Some(scene) = self.instances.current_mut() {
                scene.update_state(cx.globals, dt)?;
            }
        }
        self.drain_requests(cx.globals)
    }

    fn render(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        self.drain_requests(cx.globals)?;
        self.apply_pending(cx.globals)?;

        let target = cx.render_context().copied();
        match self.instances.current_mut() {
            Some(scene) => scene.render(cx.globals, target.as_ref(), dt),
            None => Ok(()),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
