//=========================================================================
// Lifecycle
//=========================================================================
//
// The capability set shared by every composite node (Entity, Scene).
//
//   initialize ─► [ update_physics ─► update_state ─► render ] per frame
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::components::RenderContext;
use crate::core::error::EngineResult;
use crate::core::globals::GlobalContext;

//=== Lifecycle Trait =====================================================

/// Uniform hook interface for nodes that own other nodes.
///
/// Implementations fan every call out to their owned components and
/// children in attachment order. Leaf behavior implements
/// [`Component`](super::Component) instead.
pub trait Lifecycle: Send {
    /// Runs once, before any phase hook.
    fn initialize(&mut self, globals: &mut GlobalContext) -> EngineResult<()>;

    /// Physics phase. Skipped by the node itself while disabled.
    fn update_physics(&mut self, globals: &mut GlobalContext, dt: f32) -> EngineResult<()>;

    /// Logic phase. Skipped by the node itself while disabled.
    fn update_state(&mut self, globals: &mut GlobalContext, dt: f32) -> EngineResult<()>;

    /// Render phase. Always dispatched.
    fn render(
        &mut self,
        globals: &mut GlobalContext,
        target: Option<&RenderContext>,
        dt: f32,
    ) -> EngineResult<()>;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn is_initialized(&self) -> bool;
}
