//=========================================================================
// Test Support
//=========================================================================
//
// Shared fixtures for unit tests: a call journal and a recorder component
// that records every hook it receives.
//
//=========================================================================

use std::sync::{Arc, Mutex};

use crate::core::entity::{Component, ComponentContext};
use crate::core::error::EngineResult;

//=== Journal =============================================================

/// Shared, ordered record of hook calls.
#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Number of entries equal to `entry`.
    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

//=== Recorder ============================================================

/// Component that logs `"<label>.<hook>"` for every hook call.
pub(crate) struct Recorder {
    label: String,
    journal: Journal,
}

impl Recorder {
    pub(crate) fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: journal.clone(),
        }
    }

    fn record(&self, hook: &str) {
        self.journal.push(format!("{}.{}", self.label, hook));
    }
}

impl Component for Recorder {
    fn initialize(&mut self, _cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        self.record("init");
        Ok(())
    }

    fn update_physics(&mut self, _cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        self.record("physics");
        Ok(())
    }

    fn update_state(&mut self, _cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        self.record("state");
        Ok(())
    }

    fn render(&mut self, _cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        self.record("render");
        Ok(())
    }
}

/// Second recorder type, so one entity can carry two recording components.
pub(crate) struct OtherRecorder(pub(crate) Recorder);

impl Component for OtherRecorder {
    fn initialize(&mut self, cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        self.0.initialize(cx)
    }

    fn update_physics(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        self.0.update_physics(cx, dt)
    }

    fn update_state(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        self.0.update_state(cx, dt)
    }

    fn render(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        self.0.render(cx, dt)
    }
}
