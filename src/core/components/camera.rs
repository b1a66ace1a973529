//=========================================================================
// Camera2D
//=========================================================================
//
// Orthographic camera producing the scene's RenderContext.
//
// Architecture:
//   Scene.camera ─► Entity ─► Camera2D::render_context() ─► RenderContext
//
// The view looks down -Z from above the camera position; the projection
// spans `viewport * zoom` world units centred on it.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

//=== Internal Dependencies ===============================================

use super::Transform2D;
use crate::core::entity::{Component, ComponentContext};
use crate::core::error::EngineResult;

const EYE_HEIGHT: f32 = 1.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 10.0;

//=== RenderContext =======================================================

/// View and projection of the active camera for one render phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub view: Mat4,
    pub projection: Mat4,

    /// `projection * view`.
    pub view_projection: Mat4,
}

//=== Camera2D ============================================================

/// Orthographic 2D camera.
///
/// With [`following`](Self::following) enabled the camera copies its
/// entity's [`Transform2D`] position every state step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    position: Vec2,
    zoom: f32,
    viewport: Vec2,
    follow: bool,
}

impl Camera2D {
    /// Camera at the origin showing `width × height` world units.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: Vec2::new(width, height),
            follow: false,
        }
    }

    /// Makes the camera track its entity's transform.
    pub fn following(mut self) -> Self {
        self.follow = true;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Scales the visible area; values above 1 show more of the world.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    //--- Projection -------------------------------------------------------

    pub fn view(&self) -> Mat4 {
        let eye = Vec3::new(self.position.x, self.position.y, EYE_HEIGHT);
        let target = Vec3::new(self.position.x, self.position.y, 0.0);
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        let half = self.viewport * self.zoom * 0.5;
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, NEAR, FAR)
    }

    pub fn render_context(&self) -> RenderContext {
        let view = self.view();
        let projection = self.projection();
        RenderContext {
            view,
            projection,
            view_projection: projection * view,
        }
    }

    /// Visible world rectangle as `(min, max)` corners.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = self.viewport * self.zoom * 0.5;
        (self.position - half, self.position + half)
    }

    /// Maps a window pixel (top-left origin, viewport-sized window) to world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let ndc = Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        );
        let inverse = self.render_context().view_projection.inverse();
        let world = inverse * ndc.extend(0.0).extend(1.0);
        world.xy() / world.w
    }

    /// Inverse of [`screen_to_world`](Self::screen_to_world).
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let clip = self.render_context().view_projection * world.extend(0.0).extend(1.0);
        let ndc = clip.xy() / clip.w;
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }
}

impl Component for Camera2D {
    fn initialize(&mut self, cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        if self.follow {
            self.position = cx.require::<Transform2D>()?.position();
        }
        Ok(())
    }

    fn update_state(&mut self, cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        if self.follow {
            self.position = cx.require::<Transform2D>()?.position();
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, Lifecycle};
    use crate::core::globals::GlobalContext;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn screen_centre_is_camera_position() {
        let mut camera = Camera2D::new(800.0, 600.0);
        camera.set_position(Vec2::new(50.0, -20.0));
        assert!(close(camera.screen_to_world(Vec2::new(400.0, 300.0)), Vec2::new(50.0, -20.0)));
    }

    #[test]
    fn screen_corner_maps_to_world_corner() {
        let camera = Camera2D::new(800.0, 600.0);
        assert!(close(camera.screen_to_world(Vec2::new(800.0, 0.0)), Vec2::new(400.0, 300.0)));
        assert!(close(camera.world_to_screen(Vec2::new(-400.0, -300.0)), Vec2::new(0.0, 600.0)));
    }

    #[test]
    fn zoom_widens_bounds() {
        let mut camera = Camera2D::new(100.0, 50.0);
        camera.set_zoom(2.0);
        assert_eq!(camera.bounds(), (Vec2::new(-100.0, -50.0), Vec2::new(100.0, 50.0)));
    }

    #[test]
    fn following_camera_tracks_its_transform() {
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("camera");
        entity.add_component(Transform2D::new());
        entity.add_component(Camera2D::new(800.0, 600.0).following());
        entity.initialize(&mut globals).unwrap();

        entity
            .component_mut::<Transform2D>()
            .unwrap()
            .set_position(Vec2::new(7.0, 3.0));
        entity.update_state(&mut globals, 0.016).unwrap();
        assert_eq!(entity.component::<Camera2D>().unwrap().position(), Vec2::new(7.0, 3.0));
    }

    #[test]
    fn following_camera_without_transform_fails() {
        let mut globals = GlobalContext::new();
        let mut entity = Entity::new("camera");
        entity.add_component(Camera2D::new(800.0, 600.0).following());
        assert!(entity.initialize(&mut globals).is_err());
    }
}
