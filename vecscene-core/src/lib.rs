/// VecScene Core Library - vector math and scene logic for the demo
///
/// This library holds everything the frontends share: the vector/Euler
/// helpers, geometry and transforms, the camera, picking, the axes grid,
/// the third-person controller and the per-frame scene update.

pub mod axes;
pub mod billboard;
pub mod controller;
pub mod error;
pub mod exercises;
pub mod geometry;
pub mod math;
pub mod picking;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use controller::{Key, ThirdPersonController};
pub use error::{Error, Result};
pub use exercises::{Exercise, ExerciseKind};
pub use geometry::{Color, Mesh, Triangle, Vertex};
pub use math::Orientation;
pub use picking::Ray;
pub use projection::{Camera, ProjectionMode};
pub use scene::{PickHit, Scene, SceneConfig};
pub use transform::Transform;
