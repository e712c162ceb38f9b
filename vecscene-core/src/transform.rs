/// Object transforms: position, orientation and scale
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::math::Orientation;

/// Placement of an object in the world
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub orientation: Orientation,
    pub scale: f32,
    /// Explicit rotation basis. When set it replaces `orientation`
    /// (billboards build their basis directly).
    pub basis: Option<Matrix3<f32>>,
}

impl Transform {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            orientation: Orientation::zero(),
            scale: 1.0,
            basis: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Create a rotation matrix from an orientation
    ///
    /// Euler order is XYZ: pitch is applied last.
    pub fn rotation_matrix(orientation: &Orientation) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(orientation.pitch, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, orientation.yaw, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, orientation.roll));

        rx * ry * rz
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        let rotation = match self.basis {
            Some(basis) => basis.to_homogeneous(),
            None => Self::rotation_matrix(&self.orientation),
        };
        let p = self.position;
        Self::translation_matrix(p.x, p.y, p.z) * rotation * Self::scale_matrix(self.scale)
    }

    /// Map a point from object space to world space
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        self.model_matrix().transform_point(point)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector3::zeros())
    }
}
