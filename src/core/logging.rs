//=========================================================================
// Logging
//=========================================================================
//
// Installs `env_logger` as the sink for the `log` facade.
//
// `RUST_LOG` overrides the level passed to `init`.
//
//=========================================================================

//=== External Dependencies ===============================================

use env_logger::{Builder, Env};
use log::{debug, LevelFilter};
use std::sync::atomic::{AtomicBool, Ordering};

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, EngineResult};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the global logger with `level` as the default filter.
///
/// # Errors
///
/// [`EngineError::LoggerAlreadyInitialized`] if a logger was already set,
/// by this function or by anyone else.
pub fn init(level: LevelFilter) -> EngineResult<()> {
    if INITIALIZED.load(Ordering::Acquire) {
        return Err(EngineError::LoggerAlreadyInitialized);
    }

    let default_filter = level.to_string().to_lowercase();
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .map_err(|_| EngineError::LoggerAlreadyInitialized)?;

    INITIALIZED.store(true, Ordering::Release);
    debug!("Logger initialized (default level: {})", level);
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================
