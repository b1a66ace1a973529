//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the platform layer (winit) and the core thread.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side per-frame channel draining
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== API =================================================================

pub(crate) use event_collector::EventCollector;
pub use interface::{PlatformError, PlatformEvent};
