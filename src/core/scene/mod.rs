//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene registration, construction, and safe hot-swapping.
//
// Architecture:
//   SceneManager (Component on the engine root)
//     └─ InstanceManager<SceneId, Scene>
//          ├─ factories: HashMap<SceneId, Factory<Scene>>
//          └─ current: Option<(SceneId, Scene)>
//
// Flow:
//   request_scene() ─► TransitionQueue ─► request_change() ─► Pending
//   render()        ─► apply_pending()  ─► Scene::render()
//
//=========================================================================

//=== Module Declarations =================================================

mod instance_manager;
mod scene;
mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use instance_manager::{InstanceKey, InstanceManager, SwapPhase};
pub use scene::{Scene, SceneId};
pub use scene_manager::SceneManager;
pub use transition_queue::TransitionQueue;
