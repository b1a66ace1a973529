//=========================================================================
// Global Engine State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: InputSystem + root Entity (SceneManager first) + phase hooks
//   GlobalContext: StateTracker + VirtualController + TransitionQueue + clock
//   runtime:       process-wide EngineStatus registry
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;
mod phase_hooks;
pub mod runtime;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use global_systems::{GlobalSystems, ROOT_ENTITY};
pub use phase_hooks::{Phase, PhaseHook};
pub use runtime::EngineStatus;
