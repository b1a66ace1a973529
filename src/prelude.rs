//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use hearth_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::core::TickControl;
pub use crate::engine::{Engine, EngineBuilder};

// Errors
pub use crate::core::error::{EngineError, EngineResult};

// Entities and components
pub use crate::core::entity::{Component, ComponentContext, ComponentKind, Entity, EntityId, Lifecycle};

// Built-in components
pub use crate::core::components::{
    AssetCache, AssetHandle, AssetKind, AssetLoader, BodyId, BodyState, Camera2D, KinematicWorld,
    PhysicsBody, PhysicsWorld, RenderContext, Simulation, SimulationHandle, Transform2D,
};

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems, Phase};

// Input system
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton, VirtualController};

// Scene system
pub use crate::core::scene::{InstanceKey, InstanceManager, Scene, SceneId, SceneManager, SwapPhase};

// Behaviors
pub use crate::core::behavior::{FnState, StateHandler, StateId, StateMachine};

// Math
pub use glam::{Mat4, Vec2};
