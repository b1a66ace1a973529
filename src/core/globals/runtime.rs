//=========================================================================
// Runtime Status
//=========================================================================
//
// Process-wide handle to the running engine.
//
// Architecture:
//   Engine::run ─► install() ─► ACTIVE = Some(status)
//   core thread  ─► GlobalContext ─► status.frame / status.exit
//   platform     ─► active()? ─► exit_requested() ─► close window
//   Engine::run ─► shutdown() ─► ACTIVE = None
//
// Exactly one engine may be installed at a time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, EngineResult};

//=== EngineStatus ========================================================

/// Frame counter and exit flag shared between the core and platform threads.
#[derive(Debug, Default)]
pub struct EngineStatus {
    frame: AtomicU64,
    exit_requested: AtomicBool,
}

impl EngineStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last completed frame number.
    pub fn frame(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }

    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }

    pub(crate) fn publish_frame(&self, frame: u64) {
        self.frame.store(frame, Ordering::Release);
    }
}

//=== Registry ============================================================

static ACTIVE: Mutex<Option<Arc<EngineStatus>>> = Mutex::new(None);

/// Registers `status` as the running engine.
///
/// Fails with [`EngineError::AlreadyRunning`] if another engine is installed.
pub(crate) fn install(status: Arc<EngineStatus>) -> EngineResult<()> {
    let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
    if active.is_some() {
        return Err(EngineError::AlreadyRunning);
    }
    *active = Some(status);
    debug!("Engine runtime installed");
    Ok(())
}

/// Clears the running-engine registration.
pub(crate) fn shutdown() {
    let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
    if active.take().is_some() {
        debug!("Engine runtime shut down");
    }
}

/// Returns the status of the running engine.
///
/// Fails with [`EngineError::NotRunning`] when no engine is installed.
pub fn active() -> EngineResult<Arc<EngineStatus>> {
    ACTIVE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(EngineError::NotRunning)
}

//=========================================================================
// Unit Tests
//=========================================================================
