//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems with logic.
//
// Contains the input system and the root entity. The root carries the
// root SceneManager as its first component; everything else a game
// attaches to it runs alongside, in attachment order. Optional phase
// hooks wrap the state and render passes.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::phase_hooks::{Phase, PhaseHooks};
use super::GlobalContext;
use crate::core::entity::{Component, Entity, Lifecycle};
use crate::core::error::{EngineError, EngineResult};
use crate::core::input::InputSystem;
use crate::core::scene::SceneManager;

/// Name of the engine-owned root entity.
pub const ROOT_ENTITY: &str = "engine";

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
///
/// Holds systems that process data and drive the frame schedule.
/// These systems operate on the shared [`GlobalContext`] during ticks.
///
/// # Available Systems
///
/// - `input`: Turns raw events into input state and controller state
/// - root entity: Owns the root [`SceneManager`] and engine-wide components
/// - phase hooks: Optional callbacks before and after state and render
pub struct GlobalSystems {
    /// Input processing and movement-axis bindings.
    pub input: InputSystem,

    root: Entity,
    hooks: PhaseHooks,
}

impl GlobalSystems {
    /// Creates a systems container whose root owns an empty scene manager.
    pub fn new() -> Self {
        let mut root = Entity::new(ROOT_ENTITY);
        root.add_component(SceneManager::new());

        Self {
            input: InputSystem::new(),
            root,
            hooks: PhaseHooks::default(),
        }
    }

    //--- Access -----------------------------------------------------------

    /// The root scene manager.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingComponent`] if a game removed it from the root.
    pub fn scenes(&mut self) -> EngineResult<&mut SceneManager> {
        self.root
            .component_mut::<SceneManager>()
            .ok_or_else(|| EngineError::MissingComponent {
                entity: ROOT_ENTITY.to_string(),
                kind: "SceneManager",
            })
    }

    /// Attaches an engine-wide component to the root entity.
    pub fn add_component<T: Component>(&mut self, component: T) -> bool {
        self.root.add_component(component)
    }

    pub fn root(&self) -> &Entity {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Entity {
        &mut self.root
    }

    //--- Phase Hooks ------------------------------------------------------

    /// Runs `hook` at `phase` every frame, replacing any hook already there.
    ///
    /// Returns `true` if a previous hook was replaced.
    pub fn set_hook<F>(&mut self, phase: Phase, hook: F) -> bool
    where
        F: FnMut(&mut GlobalContext, f32) -> EngineResult<()> + Send + 'static,
    {
        debug!("Phase hook installed at {:?}", phase);
        self.hooks.set(phase, Box::new(hook)).is_some()
    }

    /// Removes the hook at `phase`. Returns `false` if the slot was empty.
    pub fn clear_hook(&mut self, phase: Phase) -> bool {
        self.hooks.clear(phase).is_some()
    }

    //--- Frame Phases -----------------------------------------------------

    /// Initializes the root tree on first use. Later calls are no-ops.
    pub(crate) fn start(&mut self, context: &mut GlobalContext) -> EngineResult<()> {
        if self.root.is_initialized() {
            return Ok(());
        }
        debug!("Initializing root entity");
        self.root.initialize(context)
    }

    /// Runs one full frame over the root tree.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Input**: Converts queued platform events into input and controller state
    /// 2. **Physics**: `update_physics` over the whole tree
    /// 3. **State**: `update_state` over the whole tree, between the
    ///    `PreState` and `PostState` hooks
    /// 4. **Render**: `render` over the whole tree, applying scene swaps first,
    ///    between the `PreRender` and `PostRender` hooks
    pub(crate) fn update(&mut self, context: &mut GlobalContext, dt: f32) -> EngineResult<()> {
        self.start(context)?;

        let batches = std::mem::take(&mut context.frame_events);
        self.input
            .process_frame(&mut context.input, &mut context.controller, &batches);

        self.root.update_physics(context, dt)?;

        self.hooks.run(Phase::PreState, context, dt)?;
        self.root.update_state(context, dt)?;
        self.hooks.run(Phase::PostState, context, dt)?;

        self.hooks.run(Phase::PreRender, context, dt)?;
        self.root.render(context, None, dt)?;
        self.hooks.run(Phase::PostRender, context, dt)
    }
}

impl Default for GlobalSystems {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
