/// The demo world: player, billboard, enemies, axes and the camera rig
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::axes::{self, Arrow, Label, LineSegment};
use crate::billboard;
use crate::controller::{ThirdPersonController, MOVE_SPEED};
use crate::error::{Error, Result};
use crate::exercises::Exercise;
use crate::geometry::{Color, Mesh};
use crate::math::{self, Orientation};
use crate::picking;
use crate::projection::Camera;
use crate::transform::Transform;

pub const BACKGROUND_COLOR: u32 = 0xffffff;
const PLAYER_COLOR: u32 = 0x44aa88;
const BILLBOARD_COLOR: u32 = 0xffaa00;
const ENEMY_COLOR: u32 = 0xcc3333;

#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Goal speed while a movement key is held
    pub player_speed: f32,
    /// Maximum change of velocity per second
    pub acceleration: f32,
    pub camera_offset: Vector3<f32>,
    /// Maximum camera travel per second while following the player
    pub camera_follow_speed: f32,
    pub enemy_count: usize,
    /// Enemies are placed within [-spread, spread] on x and z
    pub enemy_spread: f32,
    /// Radians of yaw per pixel of mouse drag
    pub mouse_sensitivity: f32,
    pub highlight_color: Color,
    pub seed: u64,
    /// Frame time used by [`Scene::step`]
    pub fixed_dt: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            player_speed: MOVE_SPEED,
            acceleration: 20.0,
            camera_offset: Vector3::new(5.0, 5.0, 10.0),
            camera_follow_speed: 8.0,
            enemy_count: 5,
            enemy_spread: 12.0,
            mouse_sensitivity: 0.01,
            highlight_color: Color::from_hex(0xffdd00),
            seed: 0x5eed,
            fixed_dt: 0.016,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("player_speed", self.player_speed),
            ("acceleration", self.acceleration),
            ("camera_follow_speed", self.camera_follow_speed),
            ("enemy_spread", self.enemy_spread),
            ("fixed_dt", self.fixed_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Sun-like light; only its direction matters for flat shading
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector from the lit surface toward the light
    pub fn direction(&self) -> Result<Vector3<f32>> {
        math::try_normalized(&(self.position - self.target))
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vector3::new(15.0, 5.0, 20.0),
            target: Vector3::zeros(),
            color: Color::WHITE,
            intensity: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Player,
    Billboard,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub mesh: Mesh,
    pub transform: Transform,
    pub base_color: Color,
}

impl SceneObject {
    fn new(name: impl Into<String>, kind: ObjectKind, mesh: Mesh, transform: Transform, hex: u32) -> Self {
        let base_color = Color::from_hex(hex);
        Self {
            name: name.into(),
            kind,
            mesh: mesh.with_color(base_color),
            transform,
            base_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub object: usize,
    pub name: String,
    pub triangle: usize,
    pub distance: f32,
}

pub struct Scene {
    pub config: SceneConfig,
    pub camera: Camera,
    pub light: DirectionalLight,
    pub objects: Vec<SceneObject>,
    pub lines: Vec<LineSegment>,
    pub arrows: Vec<Arrow>,
    pub labels: Vec<Label>,
    pub controller: ThirdPersonController,
    pub velocity: Vector3<f32>,
    pub velocity_goal: Vector3<f32>,
    highlighted: Option<(usize, usize)>,
}

const PLAYER: usize = 0;
const BILLBOARD: usize = 1;

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;

        let mut objects = vec![
            SceneObject::new(
                "player",
                ObjectKind::Player,
                Mesh::cuboid(1.0, 2.0, 1.0),
                Transform::default(),
                PLAYER_COLOR,
            ),
            SceneObject::new(
                "billboard",
                ObjectKind::Billboard,
                Mesh::plane(2.0, 2.0),
                Transform::new(Vector3::new(-4.0, 1.0, -4.0)),
                BILLBOARD_COLOR,
            ),
        ];

        let mut rng = StdRng::seed_from_u64(config.seed);
        let spread = config.enemy_spread;
        for i in 0..config.enemy_count {
            let position = Vector3::new(
                rng.random_range(-spread..=spread),
                0.5,
                rng.random_range(-spread..=spread),
            );
            let yaw = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
            let transform = Transform::new(position).with_orientation(Orientation::new(0.0, yaw, 0.0));
            objects.push(SceneObject::new(
                format!("enemy-{i}"),
                ObjectKind::Enemy,
                Mesh::plane(1.0, 1.0),
                transform,
                ENEMY_COLOR,
            ));
        }

        let mut camera = Camera::default();
        camera.position = Point3::from(config.camera_offset);
        camera.look_at(Point3::origin());

        let mut lines = axes::axis_lines();
        lines.extend(axes::tick_marks());

        info!(
            "scene ready: {} objects ({} enemies, seed {})",
            objects.len(),
            config.enemy_count,
            config.seed
        );

        let mut scene = Self {
            controller: ThirdPersonController::new(config.player_speed),
            config,
            camera,
            light: DirectionalLight::default(),
            objects,
            lines,
            arrows: axes::axis_arrows(),
            labels: axes::axis_labels(),
            velocity: Vector3::zeros(),
            velocity_goal: Vector3::zeros(),
            highlighted: None,
        };
        scene.orient_billboard();
        Ok(scene)
    }

    pub fn player(&self) -> &SceneObject {
        &self.objects[PLAYER]
    }

    pub fn billboard(&self) -> &SceneObject {
        &self.objects[BILLBOARD]
    }

    pub fn enemies(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.kind == ObjectKind::Enemy)
    }

    pub fn highlighted(&self) -> Option<(usize, usize)> {
        self.highlighted
    }

    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.arrows.extend(exercise.arrows);
        self.labels.extend(exercise.labels);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Advance one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.controller.update(&mut self.velocity_goal);
        self.velocity = math::approach_vector(
            &self.velocity_goal,
            &self.velocity,
            self.config.acceleration * dt,
        );

        let delta = self.controller.take_mouse_delta();
        let player = &mut self.objects[PLAYER].transform;
        player.position += self.velocity * dt;
        if self.controller.mouse().down {
            player.orientation.yaw += delta.x * self.config.mouse_sensitivity;
        }
        player.orientation = math::normalize_orientation(&player.orientation);
        let player_position = player.position;

        let camera_goal = player_position + self.config.camera_offset;
        let camera_position = math::approach_vector(
            &camera_goal,
            &self.camera.position.coords,
            self.config.camera_follow_speed * dt,
        );
        self.camera.position = Point3::from(camera_position);
        self.camera.look_at(Point3::from(player_position));

        self.orient_billboard();
    }

    /// Advance one frame of the configured fixed time step
    pub fn step(&mut self) {
        self.update(self.config.fixed_dt);
    }

    fn orient_billboard(&mut self) {
        let target = self.objects[PLAYER].transform.position;
        let billboard = &mut self.objects[BILLBOARD].transform;
        match billboard::face_target_cylindrical(&billboard.position, &target) {
            Ok(basis) => billboard.basis = Some(basis),
            Err(err) => warn!("billboard keeps previous facing: {err}"),
        }
    }

    /// Restore the base color of the highlighted triangle, if any
    pub fn clear_highlight(&mut self) -> Result<()> {
        if let Some((object, triangle)) = self.highlighted.take() {
            let object = &mut self.objects[object];
            object.mesh.paint_triangle(triangle, object.base_color)?;
        }
        Ok(())
    }

    /// Cast a ray through the given NDC point and highlight the nearest
    /// triangle it hits.
    pub fn pick(&mut self, ndc_x: f32, ndc_y: f32) -> Result<Option<PickHit>> {
        let ray = self.camera.ray_from_ndc(ndc_x, ndc_y)?;
        self.clear_highlight()?;

        let nearest = self
            .objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                picking::pick_mesh(&ray, &object.mesh, &object.transform.model_matrix())
                    .map(|hit| (index, hit))
            })
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance));

        let Some((index, hit)) = nearest else {
            return Ok(None);
        };

        let object = &mut self.objects[index];
        object
            .mesh
            .paint_triangle(hit.triangle, self.config.highlight_color)?;
        self.highlighted = Some((index, hit.triangle));
        debug!(
            "picked {} triangle {} at distance {:.2}",
            object.name, hit.triangle, hit.distance
        );

        Ok(Some(PickHit {
            object: index,
            name: object.name.clone(),
            triangle: hit.triangle,
            distance: hit.distance,
        }))
    }
}
