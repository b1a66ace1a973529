//=========================================================================
// Scene
//=========================================================================
//
// Independently initializable world rooted in one Entity.
//
// Architecture:
//   Scene
//     ├─ id: SceneId
//     ├─ root: Entity        (the whole world tree)
//     └─ camera: Option<EntityId>
//
// Render resolves the active camera to a RenderContext and hands it to
// every component in the tree.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::InstanceKey;
use crate::core::components::{Camera2D, RenderContext};
use crate::core::entity::{Component, Entity, EntityId, Lifecycle};
use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::GlobalContext;

//=== SceneId =============================================================

/// Tag a scene is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl InstanceKey for SceneId {}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=== Scene ===============================================================

/// A world of entities that is active as a whole or not at all.
///
/// Scenes are built by factories registered with the
/// [`SceneManager`](super::SceneManager), which constructs, initializes,
/// and drops them at its safe point.
///
/// # Example
///
/// ```
/// use hearth_engine::prelude::*;
///
/// let mut scene = Scene::new("field");
/// let camera = scene.spawn("camera");
/// camera.add_component(Transform2D::new());
/// camera.add_component(Camera2D::new(800.0, 600.0));
/// let camera = camera.id();
/// scene.set_active_camera(camera);
///
/// scene.spawn("player").add_component(Transform2D::new());
/// assert_eq!(scene.root().children().len(), 2);
/// ```
pub struct Scene {
    id: SceneId,
    root: Entity,
    camera: Option<EntityId>,
}

impl Scene {
    /// Creates an empty scene whose root entity shares the scene's name.
    pub fn new(id: impl Into<SceneId>) -> Self {
        let id = id.into();
        let root = Entity::new(id.as_str());
        Self {
            id,
            root,
            camera: None,
        }
    }

    pub fn id(&self) -> &SceneId {
        &self.id
    }

    pub fn root(&self) -> &Entity {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Entity {
        &mut self.root
    }

    //--- Building ---------------------------------------------------------

    /// Creates a top-level entity in this scene.
    pub fn spawn(&mut self, name: impl Into<String>) -> &mut Entity {
        self.root.spawn(name)
    }

    /// Attaches an existing entity at the top level.
    pub fn add_entity(&mut self, entity: Entity) -> &mut Entity {
        self.root.add_child(entity)
    }

    /// Attaches a scene-wide component to the root entity.
    pub fn add_component<T: Component>(&mut self, component: T) -> bool {
        self.root.add_component(component)
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.root.find_mut(id)
    }

    //--- Camera -----------------------------------------------------------

    /// Selects the entity whose [`Camera2D`] drives rendering.
    pub fn set_active_camera(&mut self, entity: EntityId) {
        self.camera = Some(entity);
    }

    pub fn clear_active_camera(&mut self) {
        self.camera = None;
    }

    pub fn active_camera(&self) -> Option<EntityId> {
        self.camera
    }

    /// Resolves the active camera's view and projection.
    ///
    /// `Ok(None)` when no camera is selected.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingComponent`] if the selected entity is gone or
    /// has no [`Camera2D`].
    pub fn render_context(&self) -> EngineResult<Option<RenderContext>> {
        let Some(id) = self.camera else {
            return Ok(None);
        };

        let camera = self
            .root
            .find(id)
            .and_then(Entity::component::<Camera2D>)
            .ok_or_else(|| EngineError::MissingComponent {
                entity: format!("{} (camera of scene '{}')", id, self.id),
                kind: "Camera2D",
            })?;
        Ok(Some(camera.render_context()))
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("camera", &self.camera)
            .field("root", &self.root)
            .finish()
    }
}

//=== Lifecycle ===========================================================

impl Lifecycle for Scene {
    fn initialize(&mut self, globals: &mut GlobalContext) -> EngineResult<()> {
        self.root.initialize(globals)
    }

    fn update_physics(&mut self, globals: &mut GlobalContext, dt: f32) -> EngineResult<()> {
        self.root.update_physics(globals, dt)
    }

    fn update_state(&mut self, globals: &mut GlobalContext, dt: f32) -> EngineResult<()> {
        self.root.update_state(globals, dt)
    }

    /// Renders with the scene's own camera, or `target` when it has none.
    fn render(
        &mut self,
        globals: &mut GlobalContext,
        target: Option<&RenderContext>,
        dt: f32,
    ) -> EngineResult<()> {
        let own = self.render_context()?;
        self.root.render(globals, own.as_ref().or(target), dt)
    }

    fn is_enabled(&self) -> bool {
        self.root.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.root.set_enabled(enabled);
    }

    fn is_initialized(&self) -> bool {
        self.root.is_initialized()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
