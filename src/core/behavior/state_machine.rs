//=========================================================================
// Behavior State Machine
//=========================================================================
//
// Component advancing exactly one active state per logic step.
//
// Architecture:
//   StateMachine<S>
//     ├─ handlers: HashMap<S, Box<dyn StateHandler<S>>>
//     └─ current: S
//
// Flow (update_state):
//   handlers[current].update(cx, dt) ─► next ─► current = next
//
// A handler's return value is the whole transition API. There are no
// enter/exit callbacks and no hidden state besides `current` and the
// time spent in it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::entity::{Component, ComponentContext};
use crate::core::error::{EngineError, EngineResult};

//=== State Traits ========================================================

/// Marker trait for state identifiers, typically a fieldless enum.
pub trait StateId: Copy + Eq + Hash + Debug + Send + 'static {}

/// Logic for one state.
///
/// Called once per logic step while its state is current. Returns the
/// state to be current for the next step (itself to stay).
pub trait StateHandler<S: StateId>: Send {
    fn update(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<S>;
}

/// Adapter turning a closure into a [`StateHandler`].
pub struct FnState<F>(pub F);

impl<S, F> StateHandler<S> for FnState<F>
where
    S: StateId,
    F: FnMut(&mut ComponentContext<'_>, f32) -> EngineResult<S> + Send,
{
    fn update(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<S> {
        (self.0)(cx, dt)
    }
}

//=== StateMachine ========================================================

/// Finite-state behavior component.
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Guard { Patrol, Alert }
/// impl StateId for Guard {}
///
/// let brain = StateMachine::new("guard", Guard::Patrol)
///     .with_fn_state(Guard::Patrol, |cx, _dt| {
///         Ok(if cx.globals.controller.primary_pressed() { Guard::Alert } else { Guard::Patrol })
///     })
///     .with_fn_state(Guard::Alert, |_cx, _dt| Ok(Guard::Alert));
///
/// assert_eq!(brain.current(), Guard::Patrol);
/// assert!(brain.has_state(Guard::Alert));
/// ```
pub struct StateMachine<S: StateId> {
    name: String,
    handlers: HashMap<S, Box<dyn StateHandler<S>>>,
    current: S,
    time_in_state: f32,
}

impl<S: StateId> StateMachine<S> {
    //--- Construction -----------------------------------------------------

    /// Creates a machine starting in `initial`.
    ///
    /// `initial` needs a handler by the time the component initializes.
    pub fn new(name: impl Into<String>, initial: S) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
            current: initial,
            time_in_state: 0.0,
        }
    }

    /// Builder variant of [`add_state`](Self::add_state).
    pub fn with_state<H>(mut self, id: S, handler: H) -> Self
    where
        H: StateHandler<S> + 'static,
    {
        self.add_state(id, handler);
        self
    }

    /// Builder variant of [`add_fn_state`](Self::add_fn_state).
    pub fn with_fn_state<F>(mut self, id: S, handler: F) -> Self
    where
        F: FnMut(&mut ComponentContext<'_>, f32) -> EngineResult<S> + Send + 'static,
    {
        self.add_fn_state(id, handler);
        self
    }

    //--- Registration -----------------------------------------------------

    /// Registers the handler for `id`.
    ///
    /// Returns `false` and keeps the first handler if `id` is taken.
    pub fn add_state<H>(&mut self, id: S, handler: H) -> bool
    where
        H: StateHandler<S> + 'static,
    {
        if self.handlers.contains_key(&id) {
            warn!(
                "State machine '{}' already has a handler for {:?}, keeping the first",
                self.name, id
            );
            return false;
        }
        self.handlers.insert(id, Box::new(handler));
        true
    }

    /// Registers a closure as the handler for `id`.
    pub fn add_fn_state<F>(&mut self, id: S, handler: F) -> bool
    where
        F: FnMut(&mut ComponentContext<'_>, f32) -> EngineResult<S> + Send + 'static,
    {
        self.add_state(id, FnState(handler))
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> S {
        self.current
    }

    pub fn has_state(&self, id: S) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Seconds accumulated by updates since the last state change.
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    //--- Transitions ------------------------------------------------------

    /// Forces the current state from outside a handler.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnregisteredState`] if `id` has no handler.
    pub fn transition_to(&mut self, id: S) -> EngineResult<()> {
        if !self.handlers.contains_key(&id) {
            return Err(self.unregistered(id));
        }
        self.enter(id);
        Ok(())
    }

    /// Runs the current state's handler once and adopts its result.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnregisteredState`] if the current state has no
    /// handler, or whatever the handler returns.
    pub fn update(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<S> {
        let current = self.current;
        let handler = self
            .handlers
            .get_mut(&current)
            .ok_or_else(|| EngineError::UnregisteredState {
                machine: self.name.clone(),
                state: format!("{:?}", current),
            })?;

        let next = handler.update(cx, dt)?;
        self.time_in_state += dt;
        if next != current {
            self.enter(next);
        }
        Ok(next)
    }

    //--- Internal Helpers -------------------------------------------------

    fn enter(&mut self, id: S) {
        if id != self.current {
            debug!("State machine '{}': {:?} -> {:?}", self.name, self.current, id);
        }
        self.current = id;
        self.time_in_state = 0.0;
    }

    fn unregistered(&self, id: S) -> EngineError {
        EngineError::UnregisteredState {
            machine: self.name.clone(),
            state: format!("{:?}", id),
        }
    }
}

//=== Component ===========================================================

impl<S: StateId> Component for StateMachine<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        if !self.handlers.contains_key(&self.current) {
            return Err(self.unregistered(self.current));
        }
        Ok(())
    }

    fn update_state(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
        self.update(cx, dt).map(|_| ())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::Transform2D;
    use crate::core::entity::{Entity, Lifecycle};
    use crate::core::globals::GlobalContext;
    use glam::Vec2;

    //--- Fixtures ---------------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Mood {
        Idle,
        Walking,
    }
    impl StateId for Mood {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Cycle {
        A,
        B,
        C,
    }
    impl StateId for Cycle {}

    const SPEED: f32 = 4.0;

    struct Walk;

    impl StateHandler<Mood> for Walk {
        fn update(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<Mood> {
            let axis = cx.globals.controller.movement_axis();
            if axis == Vec2::ZERO {
                return Ok(Mood::Idle);
            }
            cx.require_mut::<Transform2D>()?.translate(axis * SPEED * dt);
            Ok(Mood::Walking)
        }
    }

    fn walker() -> Entity {
        let brain = StateMachine::new("walker", Mood::Idle)
            .with_fn_state(Mood::Idle, |cx, _dt| {
                Ok(if cx.globals.controller.is_moving() { Mood::Walking } else { Mood::Idle })
            })
            .with_state(Mood::Walking, Walk);

        let mut entity = Entity::new("walker");
        entity.add_component(Transform2D::new());
        entity.add_component(brain);
        entity
    }

    fn mood(entity: &Entity) -> Mood {
        entity.component::<StateMachine<Mood>>().unwrap().current()
    }

    fn cycle_machine() -> StateMachine<Cycle> {
        StateMachine::new("cycle", Cycle::A)
            .with_fn_state(Cycle::A, |_cx, _dt| Ok(Cycle::B))
            .with_fn_state(Cycle::B, |_cx, _dt| Ok(Cycle::C))
            .with_fn_state(Cycle::C, |_cx, _dt| Ok(Cycle::A))
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn idle_walking_follows_the_movement_axis() {
        let mut globals = GlobalContext::new();
        let mut entity = walker();
        entity.initialize(&mut globals).unwrap();

        for _ in 0..5 {
            entity.update_state(&mut globals, 0.5).unwrap();
            assert_eq!(mood(&entity), Mood::Idle);
        }

        globals.controller.set_movement_axis(Vec2::X);
        entity.update_state(&mut globals, 0.5).unwrap();
        assert_eq!(mood(&entity), Mood::Walking);

        entity.update_state(&mut globals, 0.5).unwrap();
        assert_eq!(mood(&entity), Mood::Walking);
        let position = entity.component::<Transform2D>().unwrap().position();
        assert_eq!(position, Vec2::new(2.0, 0.0));

        globals.controller.set_movement_axis(Vec2::ZERO);
        entity.update_state(&mut globals, 0.5).unwrap();
        assert_eq!(mood(&entity), Mood::Idle);
    }

    #[test]
    fn same_inputs_reproduce_the_same_sequence() {
        let run = || {
            let mut globals = GlobalContext::new();
            let mut entity = Entity::new("cycler");
            entity.add_component(cycle_machine());
            entity.initialize(&mut globals).unwrap();

            (0..7)
                .map(|_| {
                    entity.update_state(&mut globals, 0.016).unwrap();
                    entity.component::<StateMachine<Cycle>>().unwrap().current()
                })
                .collect::<Vec<_>>()
        };

        let first = run();
        assert_eq!(first, run());
        assert_eq!(
            first,
            [Cycle::B, Cycle::C, Cycle::A, Cycle::B, Cycle::C, Cycle::A, Cycle::B]
        );
    }

    #[test]
    fn duplicate_state_keeps_the_first_handler() {
        let mut machine = cycle_machine();
        assert!(!machine.add_fn_state(Cycle::A, |_cx, _dt| Ok(Cycle::C)));

        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("cycler");
        entity.add_component(machine);
        entity.initialize(&mut globals).unwrap();
        entity.update_state(&mut globals, 0.016).unwrap();
        assert_eq!(entity.component::<StateMachine<Cycle>>().unwrap().current(), Cycle::B);
    }

    #[test]
    fn initial_state_without_handler_fails_initialize() {
        let machine = StateMachine::new("empty", Cycle::A).with_fn_state(Cycle::B, |_cx, _dt| Ok(Cycle::B));
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("broken");
        entity.add_component(machine);

        let err = entity.initialize(&mut globals).unwrap_err();
        assert!(matches!(err, EngineError::UnregisteredState { .. }));
    }

    #[test]
    fn returning_an_unregistered_state_fails_the_next_update() {
        let machine = StateMachine::new("leaky", Cycle::A).with_fn_state(Cycle::A, |_cx, _dt| Ok(Cycle::C));
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("leaky");
        entity.add_component(machine);
        entity.initialize(&mut globals).unwrap();

        entity.update_state(&mut globals, 0.016).unwrap();
        let err = entity.update_state(&mut globals, 0.016).unwrap_err();
        assert!(matches!(err, EngineError::UnregisteredState { state, .. } if state == "C"));
    }

    #[test]
    fn transition_to_validates_and_resets_the_timer() {
        let mut machine = cycle_machine();
        assert!(machine.transition_to(Cycle::C).is_ok());
        assert_eq!(machine.current(), Cycle::C);
        assert_eq!(machine.time_in_state(), 0.0);

        let mut partial = StateMachine::new("partial", Cycle::A)
            .with_fn_state(Cycle::A, |_cx, _dt| Ok(Cycle::A));
        assert!(partial.transition_to(Cycle::B).is_err());
        assert_eq!(partial.current(), Cycle::A);
    }

    #[test]
    fn component_name_is_the_machine_name() {
        assert_eq!(Component::name(&cycle_machine()), "cycle");
    }
}
