//=========================================================================
// Phase Hooks
//=========================================================================
//
// Optional engine-wide callbacks around the state and render phases.
//
//   physics ─► PreState ─► state ─► PostState ─► PreRender ─► render ─► PostRender
//
// Each slot holds at most one hook. A failing hook aborts the frame like
// a failing component does.
//
//=========================================================================

use std::fmt;

use super::GlobalContext;
use crate::core::error::EngineResult;

/// Callback run at a [`Phase`] boundary with the frame's delta time.
pub type PhaseHook = Box<dyn FnMut(&mut GlobalContext, f32) -> EngineResult<()> + Send>;

/// Hook points around the state and render phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PreState,
    PostState,
    PreRender,
    PostRender,
}

#[derive(Default)]
pub(crate) struct PhaseHooks {
    pre_state: Option<PhaseHook>,
    post_state: Option<PhaseHook>,
    pre_render: Option<PhaseHook>,
    post_render: Option<PhaseHook>,
}

impl PhaseHooks {
    fn slot(&mut self, phase: Phase) -> &mut Option<PhaseHook> {
        match phase {
            Phase::PreState => &mut self.pre_state,
            Phase::PostState => &mut self.post_state,
            Phase::PreRender => &mut self.pre_render,
            Phase::PostRender => &mut self.post_render,
        }
    }

    /// Installs `hook` at `phase`, returning the one it replaces.
    pub(crate) fn set(&mut self, phase: Phase, hook: PhaseHook) -> Option<PhaseHook> {
        self.slot(phase).replace(hook)
    }

    pub(crate) fn clear(&mut self, phase: Phase) -> Option<PhaseHook> {
        self.slot(phase).take()
    }

    pub(crate) fn run(&mut self, phase: Phase, cx: &mut GlobalContext, dt: f32) -> EngineResult<()> {
        match self.slot(phase) {
            Some(hook) => hook(cx, dt),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for PhaseHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseHooks")
            .field("pre_state", &self.pre_state.is_some())
            .field("post_state", &self.post_state.is_some())
            .field("pre_render", &self.pre_render.is_some())
            .field("post_render", &self.post_render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slots_are_no_ops() {
        let mut hooks = PhaseHooks::default();
        let mut cx = GlobalContext::new();
        assert!(hooks.run(Phase::PostRender, &mut cx, 0.016).is_ok());
    }

    #[test]
    fn setting_a_slot_replaces_the_previous_hook() {
        let mut hooks = PhaseHooks::default();
        assert!(hooks.set(Phase::PreState, Box::new(|_, _| Ok(()))).is_none());
        assert!(hooks.set(Phase::PreState, Box::new(|_, _| Ok(()))).is_some());
        assert!(hooks.clear(Phase::PreState).is_some());
        assert!(hooks.clear(Phase::PreState).is_none());
    }

    #[test]
    fn hooks_see_the_context_and_delta() {
        let mut hooks = PhaseHooks::default();
        let mut cx = GlobalContext::new();
        hooks.set(
            Phase::PreRender,
            Box::new(|cx: &mut GlobalContext, dt: f32| {
                assert_eq!(dt, 0.25);
                cx.request_exit();
                Ok(())
            }),
        );

        hooks.run(Phase::PreRender, &mut cx, 0.25).unwrap();
        assert!(cx.exit_requested());
    }
}
