//=========================================================================
// Entity
//=========================================================================
//
// Composite node owning components and child entities.
//
// Architecture:
//   Entity
//     ├─ components: Vec<ComponentSlot>   (attachment order)
//     ├─ kinds: HashMap<TypeId, usize>    (at most one slot per kind)
//     └─ children: Vec<Entity>            (attachment order)
//
// Dispatch per phase: own components first, then children, recursively.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::component::{Component, ComponentContext, ComponentKind, ComponentSlot, Siblings};
use super::Lifecycle;
use crate::core::components::RenderContext;
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::GlobalContext;

//=== EntityId ============================================================

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Visit ===============================================================

/// Which component slots a dispatch pass touches.
#[derive(Debug, Clone, Copy)]
enum Visit {
    Enabled,
    All,
}

//=== Entity ==============================================================

/// A node in the scene tree.
///
/// Components added before the entity is initialized are initialized
/// together with it, in attachment order, so sibling lookups inside
/// `initialize` always see the full construction-time component set.
/// Components or children added afterwards are initialized at the
/// entity's next phase boundary, before they receive any other hook.
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// let mut player = Entity::new("player");
/// assert!(player.add_component(Transform2D::new()));
/// assert!(!player.add_component(Transform2D::new())); // one per kind
///
/// let shadow = player.spawn("shadow").id();
/// assert!(player.find(shadow).is_some());
/// ```
pub struct Entity {
    id: EntityId,
    name: String,
    enabled: bool,
    initialized: bool,
    pending: bool,
    components: Vec<ComponentSlot>,
    kinds: HashMap<TypeId, usize>,
    children: Vec<Entity>,
}

impl Entity {
    //--- Construction -----------------------------------------------------

    /// Creates an empty, enabled, uninitialized entity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            enabled: true,
            initialized: false,
            pending: false,
            components: Vec::new(),
            kinds: HashMap::new(),
            children: Vec::new(),
        }
    }

    //--- Identity ---------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Components -------------------------------------------------------

    /// Attaches a component.
    ///
    /// Returns `false` (and keeps the existing one) if a component of the
    /// same concrete kind is already attached.
    pub fn add_component<T: Component>(&mut self, component: T) -> bool {
        let kind = ComponentKind::of::<T>();
        if self.kinds.contains_key(&kind.type_id()) {
            warn!(
                "Entity '{}' already has a {} component, keeping the first one",
                self.name,
                kind.name()
            );
            return false;
        }

        self.kinds.insert(kind.type_id(), self.components.len());
        self.components.push(ComponentSlot::new(component));
        if self.initialized {
            self.pending = true;
        }
        true
    }

    /// Detaches and returns the component of kind `T`.
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        let index = self.kinds.remove(&TypeId::of::<T>())?;
        let slot = self.components.remove(index);
        for value in self.kinds.values_mut() {
            if *value > index {
                *value -= 1;
            }
        }
        slot.component.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.kinds.contains_key(&TypeId::of::<T>())
    }

    /// Typed lookup by concrete component kind.
    pub fn component<T: Component>(&self) -> Option<&T> {
        let index = *self.kinds.get(&TypeId::of::<T>())?;
        self.components.get(index)?.downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let index = *self.kinds.get(&TypeId::of::<T>())?;
        self.components.get_mut(index)?.downcast_mut::<T>()
    }

    /// Enables or disables the physics/state hooks of one component.
    ///
    /// Returns `false` if no component of kind `T` is attached.
    pub fn set_component_enabled<T: Component>(&mut self, enabled: bool) -> bool {
        match self.kinds.get(&TypeId::of::<T>()) {
            Some(&index) => {
                self.components[index].enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_component_enabled<T: Component>(&self) -> bool {
        self.kinds
            .get(&TypeId::of::<T>())
            .map(|&index| self.components[index].enabled)
            .unwrap_or(false)
    }

    /// Kinds of the attached components, in attachment order.
    pub fn component_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.iter().map(|slot| slot.kind)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    //--- Children ---------------------------------------------------------

    /// Attaches an existing entity as the last child.
    pub fn add_child(&mut self, child: Entity) -> &mut Entity {
        if self.initialized && !child.initialized {
            self.pending = true;
        }
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Creates a named child entity and returns it for configuration.
    pub fn spawn(&mut self, name: impl Into<String>) -> &mut Entity {
        self.add_child(Entity::new(name))
    }

    /// Detaches a direct child.
    pub fn remove_child(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }

    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Entity] {
        &mut self.children
    }

    /// Depth-first search of this entity and its descendants.
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// First descendant (or self) with the given name, depth-first.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_name(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Entity> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_name_mut(name))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Initializes every component slot that has not been initialized yet.
    fn initialize_components(&mut self, globals: &mut GlobalContext) -> EngineResult<()> {
        for index in 0..self.components.len() {
            if self.components[index].initialized {
                continue;
            }

            // Declared dependencies must be attached before initialize runs
            let slot = &self.components[index];
            for required in slot.component.dependencies() {
                if !self.kinds.contains_key(&required.type_id()) {
                    return Err(EngineError::MissingDependency {
                        entity: self.name.clone(),
                        component: slot.component.name().to_string(),
                        requires: required.name(),
                    });
                }
            }

            let (before, rest) = self.components.split_at_mut(index);
            let Some((slot, after)) = rest.split_first_mut() else {
                break;
            };
            let siblings = Siblings::new(before, after, &self.kinds, index);
            let mut cx = ComponentContext::new(self.id, &self.name, siblings, globals, None);
            slot.component.initialize(&mut cx)?;
            slot.initialized = true;
            slot.enabled = true;

            debug!("Initialized {} on entity '{}'", slot.kind.name(), self.name);
        }
        Ok(())
    }

    /// Runs one hook over the selected component slots, in attachment order.
    fn for_each_component<F>(
        &mut self,
        globals: &mut GlobalContext,
        render: Option<&RenderContext>,
        visit: Visit,
        mut hook: F,
    ) -> EngineResult<()>
    where
        F: FnMut(&mut dyn Component, &mut ComponentContext<'_>) -> EngineResult<()>,
    {
        for index in 0..self.components.len() {
            let (before, rest) = self.components.split_at_mut(index);
            let Some((slot, after)) = rest.split_first_mut() else {
                break;
            };

            let selected = match visit {
                Visit::Enabled => slot.initialized && slot.enabled,
                Visit::All => slot.initialized,
            };
            if !selected {
                continue;
            }

            let siblings = Siblings::new(before, after, &self.kinds, index);
            let mut cx = ComponentContext::new(self.id, &self.name, siblings, globals, render);
            hook(&mut *slot.component, &mut cx)?;
        }
        Ok(())
    }

    /// Rejects phase calls before initialize and flushes late attachments.
    fn ensure_ready(&mut self, globals: &mut GlobalContext) -> EngineResult<()> {
        if !self.initialized {
            return Err(EngineError::NotInitialized(self.name.clone()));
        }

        // Stays pending until every late attachment initialized, so a
        // failed one is retried (and fails) on every later hook.
        if self.pending {
            self.initialize_components(globals)?;
            for child in &mut self.children {
                if !child.initialized {
                    child.initialize(globals)?;
                }
            }
            self.pending = false;
        }
        Ok(())
    }
}

//=== Lifecycle ===========================================================

impl Lifecycle for Entity {
    fn initialize(&mut self, globals: &mut GlobalContext) -> EngineResult<()> {
        if self.initialized {
            warn!("Entity '{}' is already initialized, skipping", self.name);
            return Ok(());
        }

        self.initialize_components(globals)?;
        for child in &mut self.children {
            child.initialize(globals)?;
        }

        self.initialized = true;
        self.pending = false;
        debug!("Entity '{}' ({}) initialized", self.name, self.id);
        Ok(())
    }

    fn update_physics(&mut self, globals: &mut GlobalContext, dt: f32) -> EngineResult<()> {
        self.ensure_ready(globals)?;
        if !self.enabled {
            return Ok(());
        }

        self.for_each_component(globals, None, Visit::Enabled, |component, cx| {
            component.update_physics(cx, dt)
        })?;
        for child in &mut self.children {
            child.update_physics(globals, dt)?;
        }
        Ok(())
    }

    fn update_state(&mut self, globals: &mut GlobalContext, dt: f32) -> EngineResult<()> {
        self.ensure_ready(globals)?;
        if !self.enabled {
            return Ok(());
        }

        self.for_each_component(globals, None, Visit::Enabled, |component, cx| {
            component.update_state(cx, dt)
        })?;
        for child in &mut self.children {
            child.update_state(globals, dt)?;
        }
        Ok(())
    }

    fn render(
        &mut self,
        globals: &mut GlobalContext,
        target: Option<&RenderContext>,
        dt: f32,
    ) -> EngineResult<()> {
        self.ensure_ready(globals)?;

        self.for_each_component(globals, target, Visit::All, |component, cx| {
            component.render(cx, dt)
        })?;
        for child in &mut self.children {
            child.render(globals, target, dt)?;
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Soft pause: physics/state are skipped for the whole subtree,
    /// render still runs.
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: Vec<_> = self.components.iter().map(|slot| slot.kind.name()).collect();

        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("initialized", &self.initialized)
            .field("components", &components)
            .field("children", &self.children)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::Transform2D;
    use crate::core::test_support::{Journal, OtherRecorder, Recorder};

    //--- Test Helpers -----------------------------------------------------

    fn frame(entity: &mut Entity, globals: &mut GlobalContext) {
        entity.update_physics(globals, 0.016).unwrap();
        entity.update_state(globals, 0.016).unwrap();
        entity.render(globals, None, 0.016).unwrap();
    }

    /// Component that needs a Transform2D and nudges it every state step.
    struct Mover;

    impl Component for Mover {
        fn dependencies(&self) -> Vec<ComponentKind> {
            vec![ComponentKind::of::<Transform2D>()]
        }

        fn initialize(&mut self, cx: &mut ComponentContext<'_>) -> EngineResult<()> {
            cx.require::<Transform2D>()?;
            Ok(())
        }

        fn update_state(&mut self, cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
            cx.require_mut::<Transform2D>()?.translate(glam::Vec2::X);
            Ok(())
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn hooks_fan_out_in_attachment_order() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();

        let mut root = Entity::new("root");
        root.add_component(Recorder::new("root", &journal));
        root.spawn("a").add_component(Recorder::new("a", &journal));
        let b = root.spawn("b");
        b.add_component(Recorder::new("b", &journal));
        b.spawn("b1").add_component(Recorder::new("b1", &journal));

        root.initialize(&mut globals).unwrap();
        assert_eq!(journal.entries(), ["root.init", "a.init", "b.init", "b1.init"]);

        journal.clear();
        frame(&mut root, &mut globals);
        assert_eq!(
            journal.entries(),
            [
                "root.physics", "a.physics", "b.physics", "b1.physics",
                "root.state", "a.state", "b.state", "b1.state",
                "root.render", "a.render", "b.render", "b1.render",
            ]
        );
    }

    #[test]
    fn components_on_one_entity_follow_attachment_order() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();

        let mut entity = Entity::new("e");
        entity.add_component(OtherRecorder(Recorder::new("second", &journal)));
        entity.add_component(Recorder::new("first", &journal));
        entity.initialize(&mut globals).unwrap();

        assert_eq!(journal.entries(), ["second.init", "first.init"]);
    }

    #[test]
    fn duplicate_component_kind_is_rejected() {
        let journal = Journal::new();
        let mut entity = Entity::new("e");

        assert!(entity.add_component(Recorder::new("kept", &journal)));
        assert!(!entity.add_component(Recorder::new("dropped", &journal)));
        assert_eq!(entity.component_count(), 1);

        let mut globals = GlobalContext::new();
        entity.initialize(&mut globals).unwrap();
        assert_eq!(journal.entries(), ["kept.init"]);
    }

    #[test]
    fn sibling_lookup_sees_components_added_later() {
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("walker");

        // Mover is attached before the transform it depends on
        entity.add_component(Mover);
        entity.add_component(Transform2D::new());
        entity.initialize(&mut globals).unwrap();

        entity.update_state(&mut globals, 0.016).unwrap();
        let position = entity.component::<Transform2D>().unwrap().position();
        assert_eq!(position, glam::Vec2::X);
    }

    #[test]
    fn missing_dependency_fails_initialize() {
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("broken");
        entity.add_component(Mover);

        let err = entity.initialize(&mut globals).unwrap_err();
        assert!(matches!(err, EngineError::MissingDependency { requires: "Transform2D", .. }));
    }

    #[test]
    fn phase_call_before_initialize_is_rejected() {
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("early");

        let err = entity.update_state(&mut globals, 0.016).unwrap_err();
        assert!(matches!(err, EngineError::NotInitialized(name) if name == "early"));
    }

    #[test]
    fn initialize_runs_exactly_once() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("e");
        entity.add_component(Recorder::new("p", &journal));

        entity.initialize(&mut globals).unwrap();
        entity.initialize(&mut globals).unwrap();
        assert_eq!(journal.count("p.init"), 1);
    }

    #[test]
    fn disabled_entity_skips_physics_and_state_but_renders() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();

        let mut root = Entity::new("root");
        root.spawn("child").add_component(Recorder::new("child", &journal));
        root.initialize(&mut globals).unwrap();
        journal.clear();

        root.set_enabled(false);
        frame(&mut root, &mut globals);
        assert_eq!(journal.entries(), ["child.render"]);
    }

    #[test]
    fn disabled_component_still_renders() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("e");
        entity.add_component(Recorder::new("p", &journal));
        entity.initialize(&mut globals).unwrap();
        journal.clear();

        assert!(entity.set_component_enabled::<Recorder>(false));
        assert!(!entity.is_component_enabled::<Recorder>());
        frame(&mut entity, &mut globals);
        assert_eq!(journal.entries(), ["p.render"]);
    }

    #[test]
    fn late_additions_initialize_before_their_first_hook() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();
        let mut root = Entity::new("root");
        root.initialize(&mut globals).unwrap();

        root.add_component(Recorder::new("late", &journal));
        root.spawn("kid").add_component(OtherRecorder(Recorder::new("kid", &journal)));
        assert!(journal.entries().is_empty());

        root.update_physics(&mut globals, 0.016).unwrap();
        assert_eq!(journal.entries(), ["late.init", "kid.init", "late.physics", "kid.physics"]);
    }

    #[test]
    fn failed_late_addition_keeps_failing() {
        let journal = Journal::new();
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("e");
        entity.add_component(Recorder::new("p", &journal));
        entity.initialize(&mut globals).unwrap();

        entity.add_component(Mover);

        for _ in 0..2 {
            let err = entity.update_state(&mut globals, 0.016).unwrap_err();
            assert!(matches!(err, EngineError::MissingDependency { requires: "Transform2D", .. }));
        }
        assert_eq!(journal.entries(), ["p.init"]);

        entity.add_component(Transform2D::new());
        entity.update_state(&mut globals, 0.016).unwrap();
        assert_eq!(journal.entries(), ["p.init", "p.state"]);
        assert_eq!(entity.component::<Transform2D>().unwrap().position(), glam::Vec2::X);
    }

    #[test]
    fn remove_component_reindexes_remaining_kinds() {
        let journal = Journal::new();
        let mut entity = Entity::new("e");
        entity.add_component(Recorder::new("p", &journal));
        entity.add_component(Transform2D::new());

        assert!(entity.remove_component::<Recorder>().is_some());
        assert!(!entity.has_component::<Recorder>());
        assert!(entity.component::<Transform2D>().is_some());
        assert!(entity.remove_component::<Recorder>().is_none());
    }

    #[test]
    fn find_walks_the_whole_subtree() {
        let mut root = Entity::new("root");
        let deep = root.spawn("mid").spawn("deep").id();

        assert_eq!(root.find(deep).map(Entity::name), Some("deep"));
        assert_eq!(root.find_by_name("mid").map(Entity::children).map(<[Entity]>::len), Some(1));
        assert!(root.remove_child(deep).is_none(), "only direct children are removable");
        assert!(root.find_mut(deep).is_some());
    }
}
