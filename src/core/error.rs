//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy shared by every lifecycle hook.
//
// Configuration errors (broken object graph) travel up through hook
// results and stop the frame loop. Soft errors (duplicate registration)
// never reach this type: they are logged and reported as `false`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== EngineError =========================================================

/// Errors raised by the entity/scene runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A component looked up a sibling kind that is not attached.
    #[error("entity '{entity}' has no '{kind}' component")]
    MissingComponent { entity: String, kind: &'static str },

    /// A component declared a dependency that is not satisfied at initialize.
    #[error("component '{component}' on entity '{entity}' requires '{requires}'")]
    MissingDependency {
        entity: String,
        component: String,
        requires: &'static str,
    },

    /// An instance manager was asked for a key nothing was registered under.
    #[error("no instance registered under {0}")]
    UnknownInstance(String),

    /// A state machine reached an identifier without a registered handler.
    #[error("state machine '{machine}' has no handler for state {state}")]
    UnregisteredState { machine: String, state: String },

    /// A phase hook was invoked on a node whose initialize never ran.
    #[error("'{0}' received a phase call before initialize")]
    NotInitialized(String),

    /// The active-engine registry was read while no engine was running.
    #[error("no engine is running")]
    NotRunning,

    /// A second engine tried to register while one is already running.
    #[error("an engine is already running")]
    AlreadyRunning,

    /// The process-wide logger was installed twice.
    #[error("logger already initialized")]
    LoggerAlreadyInitialized,

    /// The stepped simulation could not be accessed or advanced.
    #[error("simulation error: {0}")]
    Simulation(String),

    /// An asset name could not be resolved to a handle.
    #[error("asset error: {0}")]
    Asset(String),

    /// The platform layer failed to start or run.
    #[error("platform error: {0}")]
    Platform(String),

    /// The core thread panicked instead of returning.
    #[error("core thread panicked: {0}")]
    CoreThreadPanicked(String),
}

/// Result alias used by every lifecycle hook.
pub type EngineResult<T> = Result<T, EngineError>;

//=========================================================================
// Unit Tests
//=========================================================================
