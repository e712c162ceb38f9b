/// Scene decorations: coordinate axes, tick marks, labels and arrows
use nalgebra::Vector3;

use crate::error::Result;
use crate::geometry::Color;
use crate::math;

/// Axes run from -AXIS_EXTENT to AXIS_EXTENT
pub const AXIS_EXTENT: f32 = 16.0;
/// Ticks and numbers are drawn for every integer in -TICK_RANGE..=TICK_RANGE
pub const TICK_RANGE: i32 = 15;

pub const X_AXIS_COLOR: u32 = 0xff0000;
pub const Y_AXIS_COLOR: u32 = 0x00ff00;
pub const Z_AXIS_COLOR: u32 = 0x0000ff;

const HEAD_LENGTH: f32 = 0.4;
const HEAD_WIDTH: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub color: Color,
}

impl LineSegment {
    pub fn new(start: Vector3<f32>, end: Vector3<f32>, color: Color) -> Self {
        Self { start, end, color }
    }
}

/// Arrow from `origin` along the unit `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub length: f32,
    pub color: Color,
    pub head_length: f32,
    pub head_width: f32,
}

impl Arrow {
    pub fn tip(&self) -> Vector3<f32> {
        self.origin + self.direction * self.length
    }

    /// Shaft plus two head strokes, for renderers that only draw lines.
    ///
    /// The head strokes lie in the plane spanned by the direction and the
    /// axis least aligned with it.
    pub fn segments(&self) -> Vec<LineSegment> {
        let tip = self.tip();
        let mut segments = vec![LineSegment::new(self.origin, tip, self.color)];

        let helper = [Vector3::x(), Vector3::y(), Vector3::z()]
            .into_iter()
            .min_by(|a, b| {
                math::abs_value(math::dot(a, &self.direction))
                    .total_cmp(&math::abs_value(math::dot(b, &self.direction)))
            })
            .unwrap_or_else(Vector3::y);

        if let Ok(side) = math::try_normalized(&math::cross(&self.direction, &helper)) {
            let base = tip - self.direction * self.head_length;
            let half = self.head_width / 2.0;
            segments.push(LineSegment::new(base + side * half, tip, self.color));
            segments.push(LineSegment::new(base - side * half, tip, self.color));
        }

        segments
    }
}

/// Text placed in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Vector3<f32>,
    pub size: f32,
    pub color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>, position: Vector3<f32>, size: f32) -> Self {
        Self {
            text: text.into(),
            position,
            size,
            color: Color::BLACK,
        }
    }
}

/// The three colored axis lines
pub fn axis_lines() -> Vec<LineSegment> {
    let e = AXIS_EXTENT;
    vec![
        LineSegment::new(
            Vector3::new(-e, 0.0, 0.0),
            Vector3::new(e, 0.0, 0.0),
            Color::from_hex(X_AXIS_COLOR),
        ),
        LineSegment::new(
            Vector3::new(0.0, -e, 0.0),
            Vector3::new(0.0, e, 0.0),
            Color::from_hex(Y_AXIS_COLOR),
        ),
        LineSegment::new(
            Vector3::new(0.0, 0.0, -e),
            Vector3::new(0.0, 0.0, e),
            Color::from_hex(Z_AXIS_COLOR),
        ),
    ]
}

/// Arrow heads at the positive end of each axis
pub fn axis_arrows() -> Vec<Arrow> {
    [
        (Vector3::x(), X_AXIS_COLOR),
        (Vector3::y(), Y_AXIS_COLOR),
        (Vector3::z(), Z_AXIS_COLOR),
    ]
    .into_iter()
    .map(|(direction, hex)| Arrow {
        origin: direction * 13.0,
        direction,
        length: 3.0,
        color: Color::from_hex(hex),
        head_length: HEAD_LENGTH,
        head_width: HEAD_WIDTH,
    })
    .collect()
}

/// Short black ticks at every integer on all three axes
pub fn tick_marks() -> Vec<LineSegment> {
    let mut ticks = Vec::new();
    for i in (-TICK_RANGE..=TICK_RANGE).filter(|&i| i != 0) {
        let i = i as f32;
        ticks.push(LineSegment::new(
            Vector3::new(i, -0.2, 0.0),
            Vector3::new(i, 0.2, 0.0),
            Color::BLACK,
        ));
        ticks.push(LineSegment::new(
            Vector3::new(-0.2, i, 0.0),
            Vector3::new(0.2, i, 0.0),
            Color::BLACK,
        ));
        ticks.push(LineSegment::new(
            Vector3::new(0.0, -0.2, i),
            Vector3::new(0.0, 0.2, i),
            Color::BLACK,
        ));
    }
    ticks
}

/// Axis names and the numbers next to each tick
pub fn axis_labels() -> Vec<Label> {
    let mut labels = vec![
        Label::new("X", Vector3::new(15.5, 1.0, 0.0), 0.5),
        Label::new("Y", Vector3::new(-1.0, 15.5, 0.0), 0.5),
        Label::new("Z", Vector3::new(-1.0, 0.0, 15.5), 0.5),
    ];

    // Negative numbers carry a minus sign, so they shift a bit further.
    for i in (-TICK_RANGE..=TICK_RANGE).filter(|&i| i != 0) {
        let f = i as f32;
        let negative = i < 0;
        let text = i.to_string();

        let x = if negative { f - 0.2 } else { f - 0.1 };
        labels.push(Label::new(&text, Vector3::new(x, 0.5, 0.0), 0.2));

        let x = if negative { -0.6 } else { -0.5 };
        labels.push(Label::new(&text, Vector3::new(x, f - 0.1, 0.0), 0.2));

        let x = if negative { -0.2 } else { -0.1 };
        labels.push(Label::new(text, Vector3::new(x, 0.5, f), 0.2));
    }

    labels
}

/// Arrow drawing vector `v` starting at `start`
pub fn arrow_for(v: &Vector3<f32>, start: &Vector3<f32>, color: Color) -> Result<Arrow> {
    Ok(Arrow {
        origin: *start,
        direction: math::try_normalized(v)?,
        length: math::length(v),
        color,
        head_length: HEAD_LENGTH,
        head_width: HEAD_WIDTH,
    })
}

/// Label showing the rounded components of `v`, e.g. `vec1: (2, 3, 0)`.
///
/// Placed at the tip of `v`, shifted along x by `offset`.
pub fn label_for(v: &Vector3<f32>, prefix: &str, suffix: &str, offset: Option<f32>) -> Label {
    // Adding zero turns a rounded -0 into 0
    let text = format!(
        "{prefix}({}, {}, {}){suffix}",
        v.x.round() + 0.0,
        v.y.round() + 0.0,
        v.z.round() + 0.0
    );
    let x = v.x + offset.unwrap_or(0.0);
    Label::new(text, Vector3::new(x, v.y, v.z), 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_lines() {
        let lines = axis_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].color, Color::from_hex(0xff0000));
        assert_eq!(lines[2].end, Vector3::new(0.0, 0.0, 16.0));
    }

    #[test]
    fn test_tick_marks_skip_origin() {
        let ticks = tick_marks();
        assert_eq!(ticks.len(), 30 * 3);
        assert!(ticks.iter().all(|t| t.start != Vector3::new(0.0, -0.2, 0.0)));
    }

    #[test]
    fn test_axis_label_offsets() {
        let labels = axis_labels();
        assert_eq!(labels.len(), 3 + 30 * 3);

        let minus_three = labels
            .iter()
            .find(|l| l.text == "-3" && l.position.y == 0.5 && l.position.z == 0.0)
            .unwrap();
        assert!((minus_three.position.x - (-3.2)).abs() < 1e-6);

        let four_on_y = labels
            .iter()
            .find(|l| l.text == "4" && l.position.x == -0.5)
            .unwrap();
        assert!((four_on_y.position.y - 3.9).abs() < 1e-6);
    }

    #[test]
    fn test_arrow_for() {
        let arrow = arrow_for(&Vector3::new(3.0, 4.0, 0.0), &Vector3::zeros(), Color::BLACK).unwrap();
        assert!((arrow.length - 5.0).abs() < 1e-6);
        assert!((arrow.tip() - Vector3::new(3.0, 4.0, 0.0)).norm() < 1e-5);
        assert_eq!(arrow.segments().len(), 3);

        assert!(arrow_for(&Vector3::zeros(), &Vector3::zeros(), Color::BLACK).is_err());
    }

    #[test]
    fn test_label_for_rounds_components() {
        let label = label_for(&Vector3::new(0.7071, 2.5, -0.4), "vec1: ", "", None);
        assert_eq!(label.text, "vec1: (1, 3, 0)");
        assert_eq!(label.position, Vector3::new(0.7071, 2.5, -0.4));

        let label = label_for(&Vector3::new(2.0, 3.0, 0.0), "", "!", Some(1.0));
        assert_eq!(label.text, "(2, 3, 0)!");
        assert_eq!(label.position.x, 3.0);

        let label = label_for(&Vector3::new(-0.0, -0.2, -1.6), "", "", None);
        assert_eq!(label.text, "(0, 0, -2)");
    }
}
