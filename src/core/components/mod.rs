//=========================================================================
// Built-in Components
//=========================================================================
//
// Components the engine ships with, and the narrow interfaces to the
// outside systems they wrap (rendering, physics, assets).
//
//=========================================================================

//=== Module Declarations =================================================

mod assets;
mod camera;
mod physics;
mod transform;

//=== Public API ==========================================================

pub use assets::{AssetCache, AssetHandle, AssetKind, AssetLoader, SequentialLoader};
pub use camera::{Camera2D, RenderContext};
pub use physics::{
    BodyId, BodyState, KinematicWorld, PhysicsBody, PhysicsWorld, Simulation, SimulationHandle,
    POSITION_ITERATIONS, VELOCITY_ITERATIONS,
};
pub use transform::Transform2D;
