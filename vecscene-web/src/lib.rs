/// VecScene Web - WASM bindings for driving the scene from a browser
///
/// The page owns rendering (three.js or raw WebGL). Each animation frame it
/// forwards input, calls `update`, then reads back transforms as flat
/// `Float32Array`s (matrices are column-major, ready for
/// `Matrix4.fromArray`).

use nalgebra::{Matrix4, Vector3};
use vecscene_core::{math, ExerciseKind, Key, Orientation, ProjectionMode, Scene, SceneConfig};
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn vector(values: &[f32]) -> Result<Vector3<f32>, JsValue> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(JsValue::from_str("expected exactly 3 components")),
    }
}

fn flatten(v: Vector3<f32>) -> Vec<f32> {
    vec![v.x, v.y, v.z]
}

fn flatten_matrix(m: &Matrix4<f32>) -> Vec<f32> {
    m.as_slice().to_vec()
}

/// Parse an exercise name as used by the page's UI
pub fn parse_exercise(name: &str) -> Option<ExerciseKind> {
    match name {
        "cross" => Some(ExerciseKind::CrossProduct),
        "dot" => Some(ExerciseKind::DotProduct),
        "normalize" => Some(ExerciseKind::Normalization),
        _ => None,
    }
}

/// Scene settings collected before the scene is built
#[wasm_bindgen]
#[derive(Default)]
pub struct WebSceneConfig {
    inner: SceneConfig,
}

#[wasm_bindgen]
impl WebSceneConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSceneConfig {
        WebSceneConfig::default()
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.inner.seed = seed as u64;
    }

    pub fn set_enemy_count(&mut self, count: u32) {
        self.inner.enemy_count = count as usize;
    }

    pub fn set_player_speed(&mut self, speed: f32) {
        self.inner.player_speed = speed;
    }

    pub fn set_highlight_color(&mut self, hex: u32) {
        self.inner.highlight_color = vecscene_core::Color::from_hex(hex);
    }
}

#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Result<WebScene, JsValue> {
        let mut config = WebSceneConfig::new();
        config.set_seed(seed);
        Self::with_config(config)
    }

    pub fn with_config(config: WebSceneConfig) -> Result<WebScene, JsValue> {
        let scene = Scene::new(config.inner).map_err(js_error)?;
        Ok(WebScene { scene })
    }

    pub fn add_exercise(&mut self, name: &str) -> Result<(), JsValue> {
        let kind = parse_exercise(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown exercise: {name}")))?;
        let exercise = kind.build().map_err(js_error)?;
        self.scene.add_exercise(exercise);
        Ok(())
    }

    /// Returns false for keys the controller does not use
    pub fn key_down(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.scene.controller.key_down(key);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.scene.controller.key_up(key);
                true
            }
            None => false,
        }
    }

    pub fn mouse_down(&mut self, x: f32, y: f32) {
        self.scene.controller.mouse_down(x, y);
    }

    pub fn mouse_up(&mut self) {
        self.scene.controller.mouse_up();
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.scene.controller.mouse_move(x, y);
    }

    pub fn update(&mut self, dt: f32) {
        self.scene.update(dt);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
    }

    /// Returns true when the camera is now orthographic
    pub fn toggle_projection(&mut self) -> bool {
        self.scene.camera.toggle_projection();
        self.scene.camera.mode == ProjectionMode::Orthographic
    }

    /// Highlight the triangle under an NDC point. Returns the object index,
    /// or `undefined` on a miss.
    pub fn pick(&mut self, ndc_x: f32, ndc_y: f32) -> Result<Option<u32>, JsValue> {
        let hit = self.scene.pick(ndc_x, ndc_y).map_err(js_error)?;
        Ok(hit.map(|hit| hit.object as u32))
    }

    /// `[object, triangle]` of the highlighted face, empty when none
    pub fn highlighted(&self) -> Vec<u32> {
        self.scene
            .highlighted()
            .map(|(object, triangle)| vec![object as u32, triangle as u32])
            .unwrap_or_default()
    }

    pub fn object_count(&self) -> u32 {
        self.scene.objects.len() as u32
    }

    pub fn object_name(&self, index: u32) -> Option<String> {
        self.scene.objects.get(index as usize).map(|o| o.name.clone())
    }

    pub fn object_matrix(&self, index: u32) -> Option<Vec<f32>> {
        self.scene
            .objects
            .get(index as usize)
            .map(|o| flatten_matrix(&o.transform.model_matrix()))
    }

    /// Vertex colors of an object as flat RGB triples, for repainting after
    /// a pick
    pub fn object_colors(&self, index: u32) -> Option<Vec<f32>> {
        self.scene.objects.get(index as usize).map(|o| {
            o.mesh
                .triangles
                .iter()
                .flat_map(|t| t.vertices.iter())
                .flat_map(|v| [v.color.r, v.color.g, v.color.b])
                .collect()
        })
    }

    pub fn player_position(&self) -> Vec<f32> {
        flatten(self.scene.player().transform.position)
    }

    pub fn player_yaw(&self) -> f32 {
        self.scene.player().transform.orientation.yaw
    }

    pub fn camera_position(&self) -> Vec<f32> {
        flatten(self.scene.camera.position.coords)
    }

    pub fn camera_target(&self) -> Vec<f32> {
        flatten(self.scene.camera.target.coords)
    }

    pub fn billboard_matrix(&self) -> Vec<f32> {
        flatten_matrix(&self.scene.billboard().transform.model_matrix())
    }
}

#[wasm_bindgen]
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32, JsValue> {
    Ok(math::dot(&vector(a)?, &vector(b)?))
}

#[wasm_bindgen]
pub fn cross(a: &[f32], b: &[f32]) -> Result<Vec<f32>, JsValue> {
    Ok(flatten(math::cross(&vector(a)?, &vector(b)?)))
}

#[wasm_bindgen]
pub fn length(v: &[f32]) -> Result<f32, JsValue> {
    Ok(math::length(&vector(v)?))
}

/// Unit vector; a zero vector yields NaN components like the core helper
#[wasm_bindgen]
pub fn normalized(v: &[f32]) -> Result<Vec<f32>, JsValue> {
    Ok(flatten(math::normalized(&vector(v)?)))
}

#[wasm_bindgen]
pub fn distance(a: &[f32], b: &[f32]) -> Result<f32, JsValue> {
    Ok(math::distance(&vector(a)?, &vector(b)?))
}

#[wasm_bindgen]
pub fn approach(goal: f32, current: f32, max_delta: f32) -> f32 {
    math::approach(goal, current, max_delta)
}

#[wasm_bindgen]
pub fn orientation_to_forward(pitch: f32, yaw: f32, roll: f32) -> Vec<f32> {
    flatten(math::orientation_to_forward(&Orientation::new(pitch, yaw, roll)))
}

/// Returns `[pitch, yaw, roll]`
#[wasm_bindgen]
pub fn normalize_orientation(pitch: f32, yaw: f32, roll: f32) -> Vec<f32> {
    let o = math::normalize_orientation(&Orientation::new(pitch, yaw, roll));
    vec![o.pitch, o.yaw, o.roll]
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_exports() {
        assert_eq!(dot(&[2.0, 3.0, 0.0], &[5.0, 3.0, 0.0]).unwrap(), 19.0);
        assert_eq!(cross(&[2.0, 3.0, 0.0], &[3.0, 2.0, 0.0]).unwrap(), vec![0.0, 0.0, -5.0]);
        assert_eq!(length(&[3.0, 4.0, 0.0]).unwrap(), 5.0);
        assert_eq!(approach(10.0, 8.0, 3.0), 10.0);
        assert_eq!(normalize_orientation(0.0, 0.0, 0.5), vec![0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_normalize_orientation_export_wraps_large_yaw() {
        let yaw = normalize_orientation(0.0, 2.0e8, 0.0)[1];
        assert!((-std::f32::consts::PI..=std::f32::consts::PI).contains(&yaw));
        assert!((yaw + 2.397795).abs() < 1e-3);
    }

    #[test]
    fn test_parse_exercise() {
        assert_eq!(parse_exercise("dot"), Some(ExerciseKind::DotProduct));
        assert_eq!(parse_exercise("sum"), None);
    }

    #[test]
    fn test_scene_round_trip() {
        let mut scene = WebScene::new(9).ok().unwrap();
        assert_eq!(scene.object_count(), 7);
        assert!(scene.key_down("w"));
        assert!(!scene.key_down("q"));
        for _ in 0..10 {
            scene.update(0.016);
        }
        assert!(scene.player_position()[2] > 0.0);
        assert_eq!(scene.billboard_matrix().len(), 16);
        assert_eq!(scene.object_name(0).as_deref(), Some("player"));
        assert!(scene.object_matrix(99).is_none());
        assert_eq!(scene.object_colors(0).map(|c| c.len()), Some(12 * 3 * 3));
    }

    #[test]
    fn test_pick_through_config() {
        let mut config = WebSceneConfig::new();
        config.set_enemy_count(0);
        let mut scene = WebScene::with_config(config).ok().unwrap();
        assert_eq!(scene.object_count(), 2);

        assert!(scene.highlighted().is_empty());
        assert_eq!(scene.pick(0.0, 0.0).ok().unwrap(), Some(0));
        assert_eq!(scene.highlighted().len(), 2);

        // The camera still looks at the player in orthographic mode
        assert!(scene.toggle_projection());
        assert_eq!(scene.pick(0.0, 0.0).ok().unwrap(), Some(0));
        assert!(!scene.toggle_projection());
    }
}
