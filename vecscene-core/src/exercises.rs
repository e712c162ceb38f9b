/// Vector arithmetic exercises drawn into the scene as annotated arrows
use nalgebra::Vector3;

use crate::axes::{arrow_for, label_for, Arrow, Label};
use crate::error::Result;
use crate::geometry::Color;
use crate::math;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseKind {
    CrossProduct,
    DotProduct,
    Normalization,
}

impl ExerciseKind {
    pub fn build(self) -> Result<Exercise> {
        match self {
            ExerciseKind::CrossProduct => cross_product(),
            ExerciseKind::DotProduct => dot_product(),
            ExerciseKind::Normalization => normalization(),
        }
    }
}

/// Arrows and labels to draw, plus the named scalar results
#[derive(Debug, Clone, Default)]
pub struct Exercise {
    pub arrows: Vec<Arrow>,
    pub labels: Vec<Label>,
    pub values: Vec<(&'static str, f32)>,
}

impl Exercise {
    fn draw(&mut self, v: &Vector3<f32>, start: &Vector3<f32>, hex: u32, prefix: &str) -> Result<()> {
        self.arrows.push(arrow_for(v, start, Color::from_hex(hex))?);
        self.labels.push(label_for(v, prefix, "", None));
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.values.iter().find(|(n, _)| *n == name).map(|&(_, v)| v)
    }
}

/// v1 × v2 for two vectors in the XY plane; the result points along z.
pub fn cross_product() -> Result<Exercise> {
    let origin = Vector3::zeros();
    let v1 = Vector3::new(2.0, 3.0, 0.0);
    let v2 = Vector3::new(3.0, 2.0, 0.0);
    let v3 = math::cross(&v1, &v2);

    let mut exercise = Exercise::default();
    exercise.draw(&v1, &origin, 0xdd0000, "vec1: ")?;
    exercise.draw(&v2, &origin, 0xdd0000, "vec2: ")?;
    exercise.draw(&v3, &origin, 0xdd0000, "vec3: ")?;
    exercise.values.push(("cross_z", v3.z));
    Ok(exercise)
}

pub fn dot_product() -> Result<Exercise> {
    let origin = Vector3::zeros();
    let v1 = Vector3::new(2.0, 3.0, 0.0);
    let v5 = Vector3::new(5.0, 3.0, 0.0);

    let mut exercise = Exercise::default();
    exercise.draw(&v5, &origin, 0x00ffee, "v5: ")?;
    exercise.draw(&v1, &origin, 0xff00ee, "v1: ")?;
    exercise.values.push(("dot", math::dot(&v1, &v5)));
    exercise.values.push(("length_v5", math::length(&v5)));
    Ok(exercise)
}

/// A unit vector, two points, and the difference between them drawn from
/// the first point.
pub fn normalization() -> Result<Exercise> {
    let origin = Vector3::zeros();
    let vec1 = math::normalized(&Vector3::new(2.0, 2.0, 0.0));
    let vec2 = Vector3::new(5.0, 5.0, 0.0);
    let vec3 = Vector3::new(4.0, 2.0, 0.0);
    let dist = vec3 - vec2;

    let mut exercise = Exercise::default();
    exercise.draw(&vec1, &origin, 0xdd0000, "vec1: ")?;
    exercise.draw(&vec2, &origin, 0x0000ff, "vec2: ")?;
    exercise.draw(&vec3, &origin, 0x00aa00, "vec3: ")?;
    exercise.draw(&dist, &vec2, 0xaa0000, "dist: ")?;
    exercise.values.push(("dot", math::dot(&vec1, &dist)));
    exercise.values.push(("distance", math::distance(&vec2, &vec3)));
    Ok(exercise)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product_exercise() {
        let exercise = cross_product().unwrap();
        assert_eq!(exercise.arrows.len(), 3);
        assert_eq!(exercise.value("cross_z"), Some(-5.0));
        assert_eq!(exercise.labels[2].text, "vec3: (0, 0, -5)");
    }

    #[test]
    fn test_dot_product_exercise() {
        let exercise = dot_product().unwrap();
        assert_eq!(exercise.value("dot"), Some(19.0));
        assert_eq!(exercise.labels[0].text, "v5: (5, 3, 0)");
    }

    #[test]
    fn test_normalization_exercise() {
        let exercise = normalization().unwrap();
        assert!((exercise.arrows[0].length - 1.0).abs() < 1e-6);

        // dist = (-1, -3, 0), vec1 = (1/√2, 1/√2, 0)
        let expected_dot = -4.0 / 2.0_f32.sqrt();
        assert!((exercise.value("dot").unwrap() - expected_dot).abs() < 1e-5);
        assert!((exercise.value("distance").unwrap() - 10.0_f32.sqrt()).abs() < 1e-5);

        let dist_arrow = exercise.arrows[3];
        assert!((dist_arrow.tip() - Vector3::new(4.0, 2.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_kind_builds_every_exercise() {
        for kind in [
            ExerciseKind::CrossProduct,
            ExerciseKind::DotProduct,
            ExerciseKind::Normalization,
        ] {
            assert!(!kind.build().unwrap().arrows.is_empty());
        }
    }
}
