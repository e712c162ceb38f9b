/// Vector and Euler-angle helpers used by the scene every frame
///
/// These are written out component by component on purpose: they are the
/// course exercises the demo is built around, so they do not defer to the
/// equivalent nalgebra methods.
use nalgebra::Vector3;
use std::f32::consts::PI;

use crate::error::{Error, Result};

/// Pitch is kept one degree away from straight up/down.
pub const PITCH_LIMIT: f32 = PI / 2.0 - PI / 180.0;

/// Orientation as pitch/yaw/roll (radians)
///
/// Pitch turns about the lateral axis, yaw about the vertical axis and roll
/// about the forward axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

pub fn dot(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Right-handed cross product.
pub fn cross(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

pub fn length(v: &Vector3<f32>) -> f32 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

/// Scale `v` to unit length.
///
/// The zero vector has no direction: every component of the result is NaN.
/// Callers that can see a zero vector should use [`try_normalized`].
pub fn normalized(v: &Vector3<f32>) -> Vector3<f32> {
    let len = length(v);
    Vector3::new(v.x / len, v.y / len, v.z / len)
}

/// Checked [`normalized`].
pub fn try_normalized(v: &Vector3<f32>) -> Result<Vector3<f32>> {
    if length(v) < f32::EPSILON {
        return Err(Error::ZeroLengthVector);
    }
    Ok(normalized(v))
}

/// Euclidean distance between two points.
pub fn distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    length(&(b - a))
}

pub fn abs_value(n: f32) -> f32 {
    if n >= 0.0 {
        n
    } else {
        -n
    }
}

/// Step `current` toward `goal` by at most `max_delta`.
///
/// Returns `goal` exactly once it is within reach, so repeated calls settle
/// on the goal and stay there.
pub fn approach(goal: f32, current: f32, max_delta: f32) -> f32 {
    let difference = goal - current;

    if difference > max_delta {
        return current + max_delta;
    }
    if difference < -max_delta {
        return current - max_delta;
    }

    goal
}

/// Per-component [`approach`].
pub fn approach_vector(
    goal: &Vector3<f32>,
    current: &Vector3<f32>,
    max_delta: f32,
) -> Vector3<f32> {
    Vector3::new(
        approach(goal.x, current.x, max_delta),
        approach(goal.y, current.y, max_delta),
        approach(goal.z, current.z, max_delta),
    )
}

/// Direction vector for a pitch/yaw pair. Roll does not change the
/// direction and is ignored.
pub fn orientation_to_forward(orientation: &Orientation) -> Vector3<f32> {
    let Orientation { pitch, yaw, .. } = *orientation;
    Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
}

/// Clamp pitch short of the poles and wrap yaw into `[-π, π]`.
///
/// Yaw is wrapped, never clamped. Roll is passed through.
pub fn normalize_orientation(orientation: &Orientation) -> Orientation {
    let pitch = orientation.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

    Orientation {
        pitch,
        yaw: wrap_angle(orientation.yaw),
        roll: orientation.roll,
    }
}

/// Wrap an angle into `[-PI, PI]`. Angles already in range are returned
/// unchanged, so both `PI` and `-PI` are fixed points.
fn wrap_angle(angle: f32) -> f32 {
    if (-PI..=PI).contains(&angle) {
        return angle;
    }
    // f64 keeps the remainder accurate for angles of many turns
    let (angle, pi) = (angle as f64, std::f64::consts::PI);
    ((angle + pi).rem_euclid(2.0 * pi) - pi) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).norm() < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_dot_is_commutative() {
        let a = Vector3::new(2.0, 3.0, -1.5);
        let b = Vector3::new(-4.0, 0.5, 7.0);
        assert_eq!(dot(&a, &b), dot(&b, &a));
        assert!((dot(&a, &b) - a.dot(&b)).abs() < EPS);
    }

    #[test]
    fn test_cross_is_anti_commutative() {
        let a = Vector3::new(2.0, 3.0, 0.0);
        let b = Vector3::new(3.0, 2.0, 0.0);
        assert_vec_eq(cross(&a, &b), -cross(&b, &a));
        assert_vec_eq(cross(&a, &b), Vector3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_cross_matches_basis() {
        let x = Vector3::x();
        let y = Vector3::y();
        assert_vec_eq(cross(&x, &y), Vector3::z());
    }

    #[test]
    fn test_normalized_has_unit_length() {
        for v in [
            Vector3::new(2.0, 2.0, 0.0),
            Vector3::new(-0.001, 0.0, 0.002),
            Vector3::new(100.0, -50.0, 25.0),
        ] {
            assert!((length(&normalized(&v)) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_normalized_zero_vector_is_nan() {
        let n = normalized(&Vector3::zeros());
        assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
        assert_eq!(try_normalized(&Vector3::zeros()), Err(Error::ZeroLengthVector));
    }

    #[test]
    fn test_distance() {
        let a = Vector3::new(5.0, 5.0, 0.0);
        let b = Vector3::new(4.0, 2.0, 0.0);
        assert!((distance(&a, &b) - 10.0_f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_abs_value() {
        assert_eq!(abs_value(-3.5), 3.5);
        assert_eq!(abs_value(2.0), 2.0);
        assert_eq!(abs_value(0.0), 0.0);
    }

    #[test]
    fn test_approach_steps() {
        assert_eq!(approach(10.0, 0.0, 3.0), 3.0);
        assert_eq!(approach(10.0, 8.0, 3.0), 10.0);
        assert_eq!(approach(-10.0, 0.0, 3.0), -3.0);
    }

    #[test]
    fn test_approach_converges_and_stays() {
        let mut current = 0.0;
        for _ in 0..4 {
            current = approach(10.0, current, 3.0);
        }
        assert_eq!(current, 10.0);
        assert_eq!(approach(10.0, current, 3.0), 10.0);
    }

    #[test]
    fn test_approach_vector() {
        let goal = Vector3::new(5.0, 0.0, -5.0);
        let v = approach_vector(&goal, &Vector3::zeros(), 1.0);
        assert_vec_eq(v, Vector3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_normalize_orientation() {
        let o = normalize_orientation(&Orientation::new(2.0, 4.0, 0.0));
        assert!((o.pitch - (PI / 2.0 - PI / 180.0)).abs() < EPS);
        assert!((o.yaw - (4.0 - 2.0 * PI)).abs() < EPS);
        assert_eq!(o.roll, 0.0);
    }

    #[test]
    fn test_normalize_orientation_wraps_many_turns() {
        let o = normalize_orientation(&Orientation::new(-3.0, -7.0 * PI + 0.5, 1.25));
        assert!((o.pitch + PITCH_LIMIT).abs() < EPS);
        assert!(o.yaw >= -PI && o.yaw <= PI);
        assert!((o.yaw - (-PI + 0.5)).abs() < 1e-4);
        assert_eq!(o.roll, 1.25);
    }

    #[test]
    fn test_normalize_orientation_huge_yaw() {
        // f32 steps of 2*PI vanish at this magnitude
        let o = normalize_orientation(&Orientation::new(0.0, 2.0e8, 0.0));
        assert!((o.yaw - -2.397795).abs() < 1e-3);

        let o = normalize_orientation(&Orientation::new(0.0, 1.0e7, 0.0));
        assert!((o.yaw - 2.7075436).abs() < 1e-3);

        let o = normalize_orientation(&Orientation::new(0.0, -1.0e7, 0.0));
        assert!((o.yaw + 2.7075436).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_orientation_keeps_pi_boundaries() {
        assert_eq!(normalize_orientation(&Orientation::new(0.0, PI, 0.0)).yaw, PI);
        assert_eq!(normalize_orientation(&Orientation::new(0.0, -PI, 0.0)).yaw, -PI);

        let o = normalize_orientation(&Orientation::new(0.0, 3.0 * PI, 0.0));
        assert!(o.yaw >= -PI && o.yaw <= PI);
        assert!((o.yaw.abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_forward_from_zero_orientation() {
        assert_vec_eq(orientation_to_forward(&Orientation::zero()), Vector3::x());
    }

    #[test]
    fn test_forward_is_unit_length() {
        let mut pitch = -1.5;
        while pitch < 1.5 {
            for yaw in [-3.0, -1.0, 0.0, 0.7, 2.5] {
                let f = orientation_to_forward(&Orientation::new(pitch, yaw, 0.3));
                assert!((length(&f) - 1.0).abs() < EPS);
            }
            pitch += 0.25;
        }
    }
}
