/// Rotation bases that turn a flat sprite toward a target
use nalgebra::{Matrix3, Vector3};

use crate::error::Result;
use crate::math;

/// Basis whose columns are (right, up, forward), with local +Z mapped onto
/// the direction from `position` to `target`.
///
/// Fails when the two points coincide or when the direction is parallel
/// to `up`.
pub fn face_target(
    position: &Vector3<f32>,
    target: &Vector3<f32>,
    up: &Vector3<f32>,
) -> Result<Matrix3<f32>> {
    let forward = math::try_normalized(&(target - position))?;
    let right = math::try_normalized(&math::cross(up, &forward))?;
    let true_up = math::cross(&forward, &right);

    Ok(Matrix3::from_columns(&[right, true_up, forward]))
}

/// Like [`face_target`] but the sprite only turns about the vertical axis,
/// so it never tilts toward a target above or below it.
pub fn face_target_cylindrical(
    position: &Vector3<f32>,
    target: &Vector3<f32>,
) -> Result<Matrix3<f32>> {
    let level_target = Vector3::new(target.x, position.y, target.z);
    face_target(position, &level_target, &Vector3::y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_basis_is_orthonormal() {
        let basis = face_target(
            &Vector3::new(-4.0, 1.0, -4.0),
            &Vector3::new(3.0, 2.0, 1.0),
            &Vector3::y(),
        )
        .unwrap();

        assert!((basis.transpose() * basis - Matrix3::identity()).norm() < 1e-5);
        assert!((basis.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_local_z_points_at_target() {
        let position = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(5.0, 0.0, 0.0);
        let basis = face_target(&position, &target, &Vector3::y()).unwrap();

        assert!((basis * Vector3::z() - Vector3::x()).norm() < 1e-6);
        assert!((basis * Vector3::y() - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_cylindrical_stays_upright() {
        let basis = face_target_cylindrical(
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(0.0, 10.0, -3.0),
        )
        .unwrap();

        assert!((basis * Vector3::y() - Vector3::y()).norm() < 1e-6);
        assert!((basis * Vector3::z() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_degenerate_targets() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(face_target(&p, &p, &Vector3::y()), Err(Error::ZeroLengthVector));

        let above = Vector3::new(1.0, 5.0, 1.0);
        assert_eq!(face_target(&p, &above, &Vector3::y()), Err(Error::ZeroLengthVector));
        assert!(face_target_cylindrical(&p, &above).is_err());
    }
}
