/// Geometry primitives for the scene objects
use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::math;

/// Linear RGB color, each channel in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Perceived brightness in `[0, 1]`.
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A 3D vertex with position, normal and color
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Color,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
            color: Color::WHITE,
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Result<Vector3<f32>> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        math::try_normalized(&math::cross(&edge1, &edge2))
    }

    /// Average of the vertex colors
    pub fn color(&self) -> Color {
        let [a, b, c] = self.vertices.map(|v| v.color);
        Color::new(
            (a.r + b.r + c.r) / 3.0,
            (a.g + b.g + c.g) / 3.0,
            (a.b + b.b + c.b) / 3.0,
        )
    }

    pub fn set_color(&mut self, color: Color) {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Paint one triangle, e.g. to highlight a picked face
    pub fn paint_triangle(&mut self, index: usize, color: Color) -> Result<()> {
        let len = self.triangles.len();
        let triangle = self
            .triangles
            .get_mut(index)
            .ok_or(Error::TriangleOutOfRange { index, len })?;
        triangle.set_color(color);
        Ok(())
    }

    /// Set every vertex to the same color
    pub fn fill(&mut self, color: Color) {
        for triangle in &mut self.triangles {
            triangle.set_color(color);
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.fill(color);
        self
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, hz, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, hz, 0.0, 0.0, 1.0),
            Vertex::new(-hx, hy, hz, 0.0, 0.0, 1.0),
        ));

        // Back face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(-hx, hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, hy, -hz, 0.0, 0.0, -1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, hy, -hz, 0.0, 0.0, -1.0),
            Vertex::new(hx, -hy, -hz, 0.0, 0.0, -1.0),
        ));

        // Top face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, hy, -hz, 0.0, 1.0, 0.0),
            Vertex::new(-hx, hy, hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, hz, 0.0, 1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, hy, -hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, hz, 0.0, 1.0, 0.0),
            Vertex::new(hx, hy, -hz, 0.0, 1.0, 0.0),
        ));

        // Bottom face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, hz, 0.0, -1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, 0.0, -1.0, 0.0),
            Vertex::new(hx, -hy, hz, 0.0, -1.0, 0.0),
            Vertex::new(-hx, -hy, hz, 0.0, -1.0, 0.0),
        ));

        // Right face
        mesh.add_triangle(Triangle::new(
            Vertex::new(hx, -hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, hz, 1.0, 0.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(hx, -hy, -hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, hy, hz, 1.0, 0.0, 0.0),
            Vertex::new(hx, -hy, hz, 1.0, 0.0, 0.0),
        ));

        // Left face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, -hy, hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, hz, -1.0, 0.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, -hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, hz, -1.0, 0.0, 0.0),
            Vertex::new(-hx, hy, -hz, -1.0, 0.0, 0.0),
        ));

        mesh
    }

    /// Quad in the local XY plane, front face toward +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let (hx, hy) = (width / 2.0, height / 2.0);
        let mut mesh = Self::with_capacity(2);

        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hx, -hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, 0.0, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-hx, -hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(hx, hy, 0.0, 0.0, 0.0, 1.0),
            Vertex::new(-hx, hy, 0.0, 0.0, 0.0, 1.0),
        ));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let c = Color::from_hex(0xff0000);
        assert_eq!(c, Color::new(1.0, 0.0, 0.0));
        assert_eq!(Color::from_hex(0x00ffee).to_hex(), 0x00ffee);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = Mesh::cuboid(1.0, 2.0, 1.0);
        assert_eq!(mesh.triangles.len(), 12);
        for triangle in &mesh.triangles {
            let computed = triangle.calculate_normal().unwrap();
            let stored = triangle.vertices[0].normal;
            assert!((computed - stored).norm() < 1e-6);
        }
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let mesh = Mesh::plane(2.0, 2.0);
        for triangle in &mesh.triangles {
            let n = triangle.calculate_normal().unwrap();
            assert!((n - Vector3::z()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_paint_triangle() {
        let mut mesh = Mesh::plane(1.0, 1.0);
        let yellow = Color::from_hex(0xffdd00);
        mesh.paint_triangle(1, yellow).unwrap();
        assert!(mesh.triangles[1].vertices.iter().all(|v| v.color == yellow));
        assert_eq!(mesh.triangles[0].color(), Color::WHITE);

        assert_eq!(
            mesh.paint_triangle(2, yellow),
            Err(Error::TriangleOutOfRange { index: 2, len: 2 })
        );

        mesh.fill(Color::BLACK);
        assert_eq!(mesh.triangles[1].color(), Color::BLACK);
    }

    #[test]
    fn test_degenerate_triangle_normal() {
        let v = Vertex::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0);
        let triangle = Triangle::new(v, v, v);
        assert_eq!(triangle.calculate_normal(), Err(Error::ZeroLengthVector));
    }
}
