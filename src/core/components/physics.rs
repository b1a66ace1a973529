//=========================================================================
// Physics Bridge
//=========================================================================
//
// Narrow interface to an external stepped 2D simulation.
//
// Architecture:
//   PhysicsWorld<S> (scene root)   ─ update_physics ─► S::step()
//   PhysicsBody<S>  (per entity)   ─ update_state   ─► S::body() ─► Transform2D
//
// Both share the simulation through a SimulationHandle. The world steps
// before any body reads back, because every physics phase completes
// before the state phase starts.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::Transform2D;
use crate::core::entity::{Component, ComponentContext, ComponentKind};
use crate::core::error::{EngineError, EngineResult};

/// Solver iterations used unless overridden.
pub const VELOCITY_ITERATIONS: u32 = 8;
pub const POSITION_ITERATIONS: u32 = 3;

//=== Simulation Trait ====================================================

/// Identifier of a body inside a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Read-back state of one simulated body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyState {
    pub position: Vec2,

    /// Radians, counter-clockwise.
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
}

/// A stepped rigid-body simulation.
pub trait Simulation: Send + 'static {
    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32);

    /// Current state of a body, `None` if `id` is unknown.
    fn body(&self, id: BodyId) -> Option<BodyState>;
}

/// Shared ownership of a simulation between the world and its bodies.
pub struct SimulationHandle<S: Simulation>(Arc<Mutex<S>>);

impl<S: Simulation> SimulationHandle<S> {
    pub fn new(simulation: S) -> Self {
        Self(Arc::new(Mutex::new(simulation)))
    }

    /// Locks the simulation for direct access (body creation, forces).
    pub fn lock(&self) -> EngineResult<MutexGuard<'_, S>> {
        self.0
            .lock()
            .map_err(|_| EngineError::Simulation("simulation lock poisoned".to_string()))
    }
}

impl<S: Simulation> Clone for SimulationHandle<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

//=== PhysicsWorld ========================================================

/// Steps the shared simulation once per physics phase.
pub struct PhysicsWorld<S: Simulation> {
    simulation: SimulationHandle<S>,
    velocity_iterations: u32,
    position_iterations: u32,
}

impl<S: Simulation> PhysicsWorld<S> {
    pub fn new(simulation: SimulationHandle<S>) -> Self {
        Self {
            simulation,
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
        }
    }

    pub fn with_iterations(mut self, velocity: u32, position: u32) -> Self {
        self.velocity_iterations = velocity;
        self.position_iterations = position;
        self
    }

    pub fn handle(&self) -> SimulationHandle<S> {
        self.simulation.clone()
    }
}

impl<S: Simulation> Component for PhysicsWorld<S> {
    fn update_physics(&mut self, _cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        self.simulation
            .lock()?
            .step(dt, self.velocity_iterations, self.position_iterations);
        Ok(())
    }
}

//=== PhysicsBody =========================================================

/// Mirrors one simulated body into its entity's [`Transform2D`].
pub struct PhysicsBody<S: Simulation> {
    simulation: SimulationHandle<S>,
    body: BodyId,
}

impl<S: Simulation> PhysicsBody<S> {
    pub fn new(simulation: SimulationHandle<S>, body: BodyId) -> Self {
        Self { simulation, body }
    }

    pub fn body_id(&self) -> BodyId {
        self.body
    }

    /// Current simulated state of this body.
    pub fn state(&self) -> EngineResult<BodyState> {
        self.simulation
            .lock()?
            .body(self.body)
            .ok_or_else(|| EngineError::Simulation(format!("unknown body {:?}", self.body)))
    }

    fn sync(&self, cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        let state = self.state()?;
        let transform = cx.require_mut::<Transform2D>()?;
        transform.set_position(state.position);
        transform.set_rotation(state.angle.to_degrees());
        Ok(())
    }
}

impl<S: Simulation> Component for PhysicsBody<S> {
    fn dependencies(&self) -> Vec<ComponentKind> {
        vec![ComponentKind::of::<Transform2D>()]
    }

    fn initialize(&mut self, cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        self.sync(cx)
    }

    fn update_state(&mut self, cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        self.sync(cx)
    }
}

//=== KinematicWorld ======================================================

/// Minimal integrator: constant gravity, no collisions.
#[derive(Debug, Default)]
pub struct KinematicWorld {
    gravity: Vec2,
    bodies: Vec<BodyState>,
}

impl KinematicWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
        }
    }

    pub fn add_body(&mut self, state: BodyState) -> BodyId {
        self.bodies.push(state);
        BodyId(self.bodies.len() - 1)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut BodyState> {
        self.bodies.get_mut(id.0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Simulation for KinematicWorld {
    fn step(&mut self, dt: f32, _velocity_iterations: u32, _position_iterations: u32) {
        for body in &mut self.bodies {
            body.linear_velocity += self.gravity * dt;
            body.position += body.linear_velocity * dt;
            body.angle += body.angular_velocity * dt;
        }
    }

    fn body(&self, id: BodyId) -> Option<BodyState> {
        self.bodies.get(id.0).copied()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
