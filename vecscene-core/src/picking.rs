/// Ray casting against meshes for mouse picking
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::Result;
use crate::geometry::Mesh;
use crate::math;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Always unit length
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Result<Self> {
        Ok(Self {
            origin,
            direction: math::try_normalized(&direction)?,
        })
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Nearest intersection of a ray with a mesh
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    pub triangle: usize,
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Möller–Trumbore intersection. Returns the ray parameter of the hit;
/// only hits in front of the origin count. Both faces are hittable.
pub fn intersect_triangle(
    ray: &Ray,
    a: &Point3<f32>,
    b: &Point3<f32>,
    c: &Point3<f32>,
) -> Option<f32> {
    const EPS: f32 = 1e-7;

    let e1 = b - a;
    let e2 = c - a;

    let pvec = math::cross(&ray.direction, &e2);
    let det = math::dot(&e1, &pvec);
    if math::abs_value(det) < EPS {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - a;

    let u = math::dot(&tvec, &pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = math::cross(&tvec, &e1);
    let v = math::dot(&ray.direction, &qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = math::dot(&e2, &qvec) * inv_det;
    (t.is_finite() && t > EPS).then_some(t)
}

/// Cast `ray` against every triangle of `mesh` placed by `model_matrix`
pub fn pick_mesh(ray: &Ray, mesh: &Mesh, model_matrix: &Matrix4<f32>) -> Option<MeshHit> {
    let mut nearest: Option<MeshHit> = None;

    for (index, triangle) in mesh.triangles.iter().enumerate() {
        let [a, b, c] = triangle
            .vertices
            .map(|v| model_matrix.transform_point(&v.position));

        let Some(t) = intersect_triangle(ray, &a, &b, &c) else {
            continue;
        };
        if nearest.map_or(true, |hit| t < hit.distance) {
            nearest = Some(MeshHit {
                triangle: index,
                distance: t,
                point: ray.at(t),
            });
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn ray(origin: [f32; 3], direction: [f32; 3]) -> Ray {
        Ray::new(Point3::from(origin), Vector3::from(direction)).unwrap()
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_err());
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let t = intersect_triangle(&ray([0.25, 0.25, 5.0], [0.0, 0.0, -1.0]), &a, &b, &c);
        assert!((t.unwrap() - 5.0).abs() < 1e-5);

        assert!(intersect_triangle(&ray([0.9, 0.9, 5.0], [0.0, 0.0, -1.0]), &a, &b, &c).is_none());
        // Pointing away
        assert!(intersect_triangle(&ray([0.25, 0.25, 5.0], [0.0, 0.0, 1.0]), &a, &b, &c).is_none());
        // Parallel
        assert!(intersect_triangle(&ray([0.25, 0.25, 5.0], [1.0, 0.0, 0.0]), &a, &b, &c).is_none());
    }

    #[test]
    fn test_pick_mesh_returns_nearest_face() {
        let mesh = Mesh::cuboid(2.0, 2.0, 2.0);
        let hit = pick_mesh(
            &ray([0.3, 0.2, 10.0], [0.0, 0.0, -1.0]),
            &mesh,
            &Matrix4::identity(),
        )
        .unwrap();

        assert!((hit.distance - 9.0).abs() < 1e-5);
        assert!((hit.point.z - 1.0).abs() < 1e-5);
        // Front face is the first two triangles
        assert!(hit.triangle < 2);
    }

    #[test]
    fn test_pick_mesh_uses_model_matrix() {
        let mesh = Mesh::plane(1.0, 1.0);
        let model = Transform::new(Vector3::new(5.0, 0.0, 0.0)).model_matrix();

        let down_z = [0.0, 0.0, -1.0];
        assert!(pick_mesh(&ray([0.0, 0.0, 3.0], down_z), &mesh, &model).is_none());
        assert!(pick_mesh(&ray([5.0, 0.0, 3.0], down_z), &mesh, &model).is_some());
    }
}
