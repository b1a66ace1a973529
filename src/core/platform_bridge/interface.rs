//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events and errors).
//
// Defines the contract for communication between platform and core threads.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::error::EngineError;
use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Messages sent from the platform thread to the core thread.
///
/// These are the only values that cross the thread boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Input gathered between two redraws.
    ///
    /// - `discrete`: key/button/focus events, order significant
    /// - `continuous`: cursor and wheel, coalesced per kind
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// The window is closing; the core thread should stop.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// Fatal: without an event loop the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),
}

impl From<PlatformError> for EngineError {
    fn from(err: PlatformError) -> Self {
        EngineError::Platform(err.to_string())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
