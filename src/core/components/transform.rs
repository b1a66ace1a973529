//=========================================================================
// Transform2D
//=========================================================================
//
// Position, rotation (degrees), and size of an entity in world space.
// The model matrix is rebuilt on every write:
//
//   model = translate(position) * rotate_z(rotation) * scale(size)
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Quat, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::entity::Component;

//=== Transform2D =========================================================

/// 2D placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    position: Vec2,
    rotation: f32,
    size: Vec2,
    model: Mat4,
}

impl Transform2D {
    /// Origin, no rotation, unit size.
    pub fn new() -> Self {
        Self::at(Vec2::ZERO)
    }

    pub fn at(position: Vec2) -> Self {
        let mut transform = Self {
            position,
            rotation: 0.0,
            size: Vec2::ONE,
            model: Mat4::IDENTITY,
        };
        transform.rebuild();
        transform
    }

    /// Builder-style size setter.
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.set_size(size);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.rebuild();
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    /// Rotation around +Z, in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.rebuild();
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.rebuild();
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    fn rebuild(&mut self) {
        self.model = Mat4::from_scale_rotation_translation(
            self.size.extend(1.0),
            Quat::from_rotation_z(self.rotation.to_radians()),
            Vec3::new(self.position.x, self.position.y, 0.0),
        );
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Transform2D {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_matrix_tracks_writes() {
        let mut transform = Transform2D::new();
        assert_eq!(transform.model_matrix(), Mat4::IDENTITY);

        transform.set_position(Vec2::new(3.0, -2.0));
        let origin = transform.model_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(3.0, -2.0, 0.0));
    }

    #[test]
    fn rotation_is_in_degrees() {
        let transform = {
            let mut t = Transform2D::new();
            t.set_rotation(90.0);
            t
        };
        let tip = transform.model_matrix().transform_point3(Vec3::X);
        assert!((tip - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn size_scales_before_translation() {
        let transform = Transform2D::at(Vec2::new(10.0, 0.0)).with_size(Vec2::new(2.0, 4.0));
        let corner = transform.model_matrix().transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((corner - Vec3::new(12.0, 4.0, 0.0)).length() < 1e-5);
    }
}
