//=========================================================================
// Component
//=========================================================================
//
// Leaf behavior unit attached to exactly one Entity.
//
// Architecture:
//   Entity
//     ├─ slots: Vec<ComponentSlot>        (attachment order)
//     └─ kinds: HashMap<TypeId, usize>    (one slot per concrete kind)
//
//   hook(cx) → ComponentContext { siblings, globals, render }
//
// Components never hold pointers to their owner or siblings. Everything
// they need during a hook arrives through the `ComponentContext`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::entity::EntityId;
use crate::core::components::RenderContext;
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::GlobalContext;

//=== AsAny ===============================================================

/// Downcasting support for boxed components.
///
/// Implemented automatically for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

//=== ComponentKind =======================================================

/// Stable identifier of a concrete component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKind {
    id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    /// Returns the kind of `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Strips the module path from a type name, keeping generic arguments.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

//=== Component Trait =====================================================

/// A unit of behavior attachable to an [`Entity`](super::Entity).
///
/// Every hook has a default no-op implementation. Hooks return
/// [`EngineResult`]; an `Err` is a configuration error and stops the
/// frame loop.
///
/// # Hook Order
///
/// `initialize` runs exactly once, after the owning entity and all of its
/// construction-time siblings are attached. Sibling lookups belong there,
/// never in a constructor. Afterwards, once per frame:
///
/// 1. `update_physics` (skipped while disabled)
/// 2. `update_state` (skipped while disabled)
/// 3. `render` (always called)
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// struct Spinner { degrees_per_second: f32 }
///
/// impl Component for Spinner {
///     fn dependencies(&self) -> Vec<ComponentKind> {
///         vec![ComponentKind::of::<Transform2D>()]
///     }
///
///     fn update_state(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<()> {
///         let transform = cx.require_mut::<Transform2D>()?;
///         let rotation = transform.rotation() + self.degrees_per_second * dt;
///         transform.set_rotation(rotation);
///         Ok(())
///     }
/// }
/// ```
pub trait Component: AsAny + Send {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Component kinds that must be attached to the same entity.
    ///
    /// Checked by the owning entity right before `initialize`.
    fn dependencies(&self) -> Vec<ComponentKind> {
        Vec::new()
    }

    /// Called once before any other hook.
    fn initialize(&mut self, _cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Called once per frame, before `update_state`, while enabled.
    fn update_physics(&mut self, _cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        Ok(())
    }

    /// Called once per frame, after `update_physics`, while enabled.
    fn update_state(&mut self, _cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        Ok(())
    }

    /// Called once per frame, after `update_state`, regardless of enabled.
    ///
    /// Drawing only. Gameplay state must not change here.
    fn render(&mut self, _cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        Ok(())
    }
}

//=== ComponentSlot =======================================================

/// Storage cell for one attached component.
pub(crate) struct ComponentSlot {
    pub(crate) component: Box<dyn Component>,
    pub(crate) kind: ComponentKind,
    pub(crate) enabled: bool,
    pub(crate) initialized: bool,
}

impl ComponentSlot {
    pub(crate) fn new<T: Component>(component: T) -> Self {
        Self {
            component: Box::new(component),
            kind: ComponentKind::of::<T>(),
            enabled: false,
            initialized: false,
        }
    }

    pub(crate) fn downcast_ref<T: Component>(&self) -> Option<&T> {
        (*self.component).as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        (*self.component).as_any_mut().downcast_mut::<T>()
    }
}

//=== Siblings ============================================================

/// Typed view over the other components of the entity being dispatched.
///
/// The component currently running its hook is excluded, so a lookup of
/// its own kind returns `None`.
pub struct Siblings<'a> {
    before: &'a mut [ComponentSlot],
    after: &'a mut [ComponentSlot],
    kinds: &'a HashMap<TypeId, usize>,
    own_index: usize,
}

impl<'a> Siblings<'a> {
    pub(crate) fn new(
        before: &'a mut [ComponentSlot],
        after: &'a mut [ComponentSlot],
        kinds: &'a HashMap<TypeId, usize>,
        own_index: usize,
    ) -> Self {
        Self {
            before,
            after,
            kinds,
            own_index,
        }
    }

    /// Returns `true` if a sibling of kind `T` is attached.
    pub fn contains<T: Component>(&self) -> bool {
        self.slot_index::<T>().is_some()
    }

    /// Looks up a sibling by concrete type.
    pub fn get<T: Component>(&self) -> Option<&T> {
        let index = self.slot_index::<T>()?;
        let slot = if index < self.own_index {
            self.before.get(index)?
        } else {
            self.after.get(index - self.own_index - 1)?
        };
        slot.downcast_ref::<T>()
    }

    /// Looks up a sibling by concrete type, mutably.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let index = self.slot_index::<T>()?;
        let slot = if index < self.own_index {
            self.before.get_mut(index)?
        } else {
            self.after.get_mut(index - self.own_index - 1)?
        };
        slot.downcast_mut::<T>()
    }

    fn slot_index<T: Component>(&self) -> Option<usize> {
        self.kinds
            .get(&TypeId::of::<T>())
            .copied()
            .filter(|&index| index != self.own_index)
    }
}

//=== ComponentContext ====================================================

/// Everything a component may touch while one of its hooks runs.
pub struct ComponentContext<'a> {
    entity_id: EntityId,
    entity_name: &'a str,
    siblings: Siblings<'a>,
    render: Option<&'a RenderContext>,

    /// Engine-wide shared data (input, scene requests, frame clock).
    pub globals: &'a mut GlobalContext,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        entity_id: EntityId,
        entity_name: &'a str,
        siblings: Siblings<'a>,
        globals: &'a mut GlobalContext,
        render: Option<&'a RenderContext>,
    ) -> Self {
        Self {
            entity_id,
            entity_name,
            siblings,
            render,
            globals,
        }
    }

    /// Identifier of the owning entity.
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Name of the owning entity.
    pub fn entity_name(&self) -> &str {
        self.entity_name
    }

    /// View/projection of the scene's active camera, during render only.
    pub fn render_context(&self) -> Option<&RenderContext> {
        self.render
    }

    pub fn siblings(&self) -> &Siblings<'a> {
        &self.siblings
    }

    pub fn siblings_mut(&mut self) -> &mut Siblings<'a> {
        &mut self.siblings
    }

    /// Shorthand for `siblings().get::<T>()`.
    pub fn sibling<T: Component>(&self) -> Option<&T> {
        self.siblings.get::<T>()
    }

    /// Shorthand for `siblings_mut().get_mut::<T>()`.
    pub fn sibling_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.siblings.get_mut::<T>()
    }

    /// Looks up a required sibling, failing with a configuration error.
    pub fn require<T: Component>(&self) -> EngineResult<&T> {
        let entity = self.entity_name;
        self.siblings.get::<T>().ok_or_else(|| missing::<T>(entity))
    }

    /// Mutable variant of [`require`](Self::require).
    pub fn require_mut<T: Component>(&mut self) -> EngineResult<&mut T> {
        let entity = self.entity_name;
        self.siblings
            .get_mut::<T>()
            .ok_or_else(|| missing::<T>(entity))
    }
}

fn missing<T: Component>(entity: &str) -> EngineError {
    EngineError::MissingComponent {
        entity: entity.to_string(),
        kind: ComponentKind::of::<T>().name(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    impl Component for Marker {}

    struct Counter(u32);
    impl Component for Counter {}

    fn slots() -> (Vec<ComponentSlot>, HashMap<TypeId, usize>) {
        let slots = vec![ComponentSlot::new(Marker), ComponentSlot::new(Counter(7))];
        let mut kinds = HashMap::new();
        kinds.insert(TypeId::of::<Marker>(), 0);
        kinds.insert(TypeId::of::<Counter>(), 1);
        (slots, kinds)
    }

    #[test]
    fn short_type_name_strips_module_path() {
        assert_eq!(short_type_name("a::b::Transform2D"), "Transform2D");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(
            short_type_name("a::PhysicsWorld<a::b::KinematicWorld>"),
            "PhysicsWorld<a::b::KinematicWorld>"
        );
    }

    #[test]
    fn component_name_defaults_to_type_name() {
        assert_eq!(Marker.name(), "Marker");
        assert_eq!(ComponentKind::of::<Counter>().name(), "Counter");
    }

    #[test]
    fn siblings_exclude_the_running_component() {
        let (mut slots, kinds) = slots();
        let (before, rest) = slots.split_at_mut(0);
        let (_own, after) = rest.split_first_mut().unwrap();
        let siblings = Siblings::new(before, after, &kinds, 0);

        assert!(siblings.get::<Marker>().is_none());
        assert_eq!(siblings.get::<Counter>().map(|c| c.0), Some(7));
    }

    #[test]
    fn siblings_resolve_slots_on_either_side() {
        let (mut slots, kinds) = slots();
        let (before, rest) = slots.split_at_mut(1);
        let (_own, after) = rest.split_first_mut().unwrap();
        let mut siblings = Siblings::new(before, after, &kinds, 1);

        assert!(siblings.contains::<Marker>());
        assert!(!siblings.contains::<Counter>());
        assert!(siblings.get_mut::<Marker>().is_some());
    }
}
