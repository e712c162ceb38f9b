/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{Error, Result};
use crate::picking::Ray;
use crate::transform::Transform;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(5.0, 5.0, 10.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 75.0_f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 1000.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Switch between perspective and orthographic projection
    pub fn toggle_projection(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a point to normalized device coordinates.
    ///
    /// Returns `None` for points behind the near plane; points outside the
    /// view frustum sideways are still returned.
    pub fn project_to_ndc(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
    ) -> Option<Point3<f32>> {
        let view = self.view_matrix();
        let eye = (view * model_matrix).transform_point(point);
        if eye.z > -self.near {
            return None;
        }

        let mvp = Transform::mvp_matrix(model_matrix, &view, &self.projection_matrix());
        Some(mvp.transform_point(point))
    }

    /// Project a world-space segment to NDC, trimming the part that lies
    /// behind the near plane. `None` if the whole segment is behind it.
    pub fn project_segment_to_ndc(
        &self,
        a: &Point3<f32>,
        b: &Point3<f32>,
    ) -> Option<(Point3<f32>, Point3<f32>)> {
        let view = self.view_matrix();
        let (mut eye_a, mut eye_b) = (view.transform_point(a), view.transform_point(b));
        let limit = -self.near;

        match (eye_a.z <= limit, eye_b.z <= limit) {
            (false, false) => return None,
            (true, true) => {}
            (a_visible, _) => {
                let t = (limit - eye_a.z) / (eye_b.z - eye_a.z);
                let cut = eye_a + (eye_b - eye_a) * t;
                if a_visible {
                    eye_b = cut;
                } else {
                    eye_a = cut;
                }
            }
        }

        let projection = self.projection_matrix();
        Some((
            projection.transform_point(&eye_a),
            projection.transform_point(&eye_b),
        ))
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let ndc = self.project_to_ndc(point, model_matrix)?;

        // Clip test
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 {
            return None;
        }

        let (x, y) = ndc_to_screen(ndc.x, ndc.y, width, height);
        Some((x, y, ndc.z))
    }

    /// World-space ray through a point given in normalized device
    /// coordinates (`[-1, 1]`, y up), as used for mouse picking.
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Result<Ray> {
        let inverse = (self.projection_matrix() * self.view_matrix())
            .try_inverse()
            .ok_or(Error::SingularMatrix)?;

        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));

        Ray::new(near, far - near)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Convert NDC to pixel coordinates (origin top-left)
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: u32, height: u32) -> (f32, f32) {
    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;
    (screen_x, screen_y)
}

/// Convert pixel coordinates (origin top-left) to NDC
pub fn screen_to_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let ndc_x = x / width.max(1) as f32 * 2.0 - 1.0;
    let ndc_y = 1.0 - y / height.max(1) as f32 * 2.0;
    (ndc_x, ndc_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((camera.fov - 75.0_f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new(800, 600);
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(800, 600);
        let behind = Point3::new(10.0, 10.0, 20.0);
        assert!(camera.project_to_ndc(&behind, &Matrix4::identity()).is_none());
    }

    #[test]
    fn test_segment_is_trimmed_at_near_plane() {
        let camera = Camera::new(800, 600);
        // The z axis runs from in front of the camera to behind it
        let (a, b) = camera
            .project_segment_to_ndc(&Point3::new(0.0, 0.0, -16.0), &Point3::new(0.0, 0.0, 16.0))
            .unwrap();
        assert!(a.z.abs() <= 1.0);
        assert!((b.z + 1.0).abs() < 1e-3, "cut end lies on the near plane");

        let behind = Point3::new(10.0, 10.0, 20.0);
        assert!(camera
            .project_segment_to_ndc(&behind, &Point3::new(11.0, 10.0, 20.0))
            .is_none());
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = Camera::new(800, 600);
        let ray = camera.ray_from_ndc(0.0, 0.0).unwrap();
        let expected = (camera.target - camera.position).normalize();
        assert!((ray.direction - expected).norm() < 1e-4);
    }

    #[test]
    fn test_model_matrix_moves_projected_point() {
        let camera = Camera::new(800, 600);
        let model = Transform::new(Vector3::new(1.0, 2.0, -3.0)).model_matrix();
        let moved = camera.project_to_ndc(&Point3::origin(), &model).unwrap();
        let direct = camera
            .project_to_ndc(&Point3::new(1.0, 2.0, -3.0), &Matrix4::identity())
            .unwrap();
        assert!((moved - direct).norm() < 1e-5);
    }

    #[test]
    fn test_orthographic_projection() {
        let mut camera = Camera::new(800, 600);
        camera.toggle_projection();
        assert_eq!(camera.mode, ProjectionMode::Orthographic);

        let center = camera.project_to_ndc(&Point3::origin(), &Matrix4::identity()).unwrap();
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);

        // Rays stay parallel away from the center
        let a = camera.ray_from_ndc(0.0, 0.0).unwrap();
        let b = camera.ray_from_ndc(0.5, -0.5).unwrap();
        assert!((a.direction - b.direction).norm() < 1e-4);
        assert!((a.origin - b.origin).norm() > 1.0);

        // Points behind the camera are still rejected
        let behind = Point3::new(10.0, 10.0, 20.0);
        assert!(camera.project_to_ndc(&behind, &Matrix4::identity()).is_none());

        camera.toggle_projection();
        assert_eq!(camera.mode, ProjectionMode::Perspective);
    }

    #[test]
    fn test_screen_ndc_roundtrip() {
        let (nx, ny) = screen_to_ndc(200.0, 150.0, 800, 600);
        assert!((nx + 0.5).abs() < 1e-6);
        assert!((ny - 0.5).abs() < 1e-6);
        let (x, y) = ndc_to_screen(nx, ny, 800, 600);
        assert!((x - 200.0).abs() < 1e-4 && (y - 150.0).abs() < 1e-4);
    }
}
