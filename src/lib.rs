//=========================================================================
// Hearth Engine Library Root
//
// This crate defines the public API surface of the Hearth Engine.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the entity/component model, scenes and behaviors under `core`
// - Keep the winit platform layer hidden from end users
//
// Typical usage:
// ```no_run
// use hearth_engine::prelude::*;
//
// fn main() -> EngineResult<()> {
//     EngineBuilder::new().build().run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine systems: entities and components, scenes,
// input, behaviors and the frame loop. Most applications only need the
// prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and the winit event loop; `engine` wires it
// to the core thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::error::{EngineError, EngineResult};
pub use engine::{Engine, EngineBuilder};
