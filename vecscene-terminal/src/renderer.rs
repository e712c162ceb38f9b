/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use vecscene_core::axes::{Label, LineSegment};
use vecscene_core::math;
use vecscene_core::projection::ndc_to_screen;
use vecscene_core::{Camera, Mesh, Scene, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lines and labels win depth ties against the surfaces they sit on
const OVERLAY_BIAS: f32 = 1e-6;

/// Minimum light a face receives so unlit faces stay visible
const AMBIENT: f32 = 0.25;

#[derive(Debug, Clone, Copy)]
struct Cell {
    depth: f32,
    character: char,
    color: Option<vecscene_core::Color>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        depth: f32::INFINITY,
        character: ' ',
        color: None,
    };
}

/// ASCII renderer that converts the scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    pub fn render_scene(&mut self, scene: &Scene) {
        let light_dir = scene.light.direction().unwrap_or_else(|_| Vector3::z());

        for object in &scene.objects {
            let model = object.transform.model_matrix();
            self.render_mesh(&object.mesh, &model, &scene.camera, &light_dir);
        }

        for line in &scene.lines {
            self.render_line(line, &scene.camera);
        }
        for arrow in &scene.arrows {
            for segment in arrow.segments() {
                self.render_line(&segment, &scene.camera);
            }
        }
        for label in &scene.labels {
            self.render_label(label, &scene.camera);
        }
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        light_dir: &Vector3<f32>,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, light_dir);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        light_dir: &Vector3<f32>,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_ndc(&vertex.position, model_matrix) {
                Some(ndc) => {
                    let (x, y) = ndc_to_screen(ndc.x, ndc.y, self.width as u32, self.height as u32);
                    *slot = (x, y, ndc.z);
                }
                None => return, // Triangle crosses the near plane
            }
        }

        // Faces are two-sided, so light either side the same
        let brightness = triangle
            .calculate_normal()
            .and_then(|n| math::try_normalized(&model_matrix.transform_vector(&n)))
            .map(|n| math::abs_value(math::dot(&n, light_dir)))
            .unwrap_or(0.0);
        let shade = AMBIENT + (1.0 - AMBIENT) * brightness;

        // Map brightness to character
        let char_index = (shade * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        let base = triangle.color();
        let color = vecscene_core::Color::new(base.r * shade, base.g * shade, base.b * shade);

        self.rasterize_triangle(&screen_coords, character, color);
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        character: char,
        color: vecscene_core::Color,
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates; either winding counts
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x, y, depth, character, color);
                }
            }
        }
    }

    fn render_line(&mut self, line: &LineSegment, camera: &Camera) {
        let Some((a, b)) =
            camera.project_segment_to_ndc(&Point3::from(line.start), &Point3::from(line.end))
        else {
            return;
        };
        let Some((a, b)) = clip_ndc(a, b) else {
            return;
        };

        let (w, h) = (self.width as u32, self.height as u32);
        let (ax, ay) = ndc_to_screen(a.x, a.y, w, h);
        let (bx, by) = ndc_to_screen(b.x, b.y, w, h);
        let (dx, dy) = (bx - ax, by - ay);

        let character = line_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (ax + dx * t).floor() as i32;
            let y = (ay + dy * t).floor() as i32;
            let depth = a.z + (b.z - a.z) * t - OVERLAY_BIAS;
            self.plot(x, y, depth, character, line.color);
        }
    }

    fn render_label(&mut self, label: &Label, camera: &Camera) {
        let Some(ndc) = camera.project_to_ndc(&Point3::from(label.position), &Matrix4::identity())
        else {
            return;
        };
        let (x, y) = ndc_to_screen(ndc.x, ndc.y, self.width as u32, self.height as u32);
        let (x, y) = (x.floor() as i32, y.floor() as i32);

        for (offset, character) in label.text.chars().enumerate() {
            self.plot(x + offset as i32, y, ndc.z - OVERLAY_BIAS, character, label.color);
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: vecscene_core::Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let cell = &mut self.cells[idx];
        if depth < cell.depth {
            *cell = Cell {
                depth,
                character,
                color: Some(color),
            };
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                let color = match cell.color {
                    Some(c) => terminal_color(c),
                    None => Color::Reset,
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(cell.character))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a scene color to a terminal color. Black decorations would vanish
/// on a dark terminal, so very dark colors are drawn grey.
fn terminal_color(color: vecscene_core::Color) -> Color {
    if color.luminance() < 0.1 {
        return Color::Grey;
    }
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

/// Liang-Barsky clip of an NDC segment to the visible square
fn clip_ndc(a: Point3<f32>, b: Point3<f32>) -> Option<(Point3<f32>, Point3<f32>)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);

    for (p, q) in [
        (-d.x, a.x + 1.0),
        (d.x, 1.0 - a.x),
        (-d.y, a.y + 1.0),
        (d.y, 1.0 - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((a + d * t0, a + d * t1))
}

/// Stroke character for a screen-space line direction
fn line_char(dx: f32, dy: f32) -> char {
    let (adx, ady) = (dx.abs(), dy.abs());
    if ady < adx * 0.4 {
        '-'
    } else if adx < ady * 0.4 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        // Screen y grows downward
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
