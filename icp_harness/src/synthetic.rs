//! Synthetic freehand-like curves for demos and tests.

use clap::ValueEnum;
use icp_math::icp::rotate_about;
use icp_math::{calculate_centroid, IcpError, Point};

/// Built-in curve shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoShape {
    /// Closed lumpy loop with no rotational symmetry
    Blob,
    /// Open curve that bends up at one end
    Hook,
    /// Two periods of a sine wave
    Wave,
}

impl std::fmt::Display for DemoShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoShape::Blob => write!(f, "blob"),
            DemoShape::Hook => write!(f, "hook"),
            DemoShape::Wave => write!(f, "wave"),
        }
    }
}

impl DemoShape {
    /// Raw polyline with `segments + 1` points.
    pub fn curve(&self, segments: usize) -> Vec<Point> {
        let n = segments.max(1) as f64;
        (0..=segments.max(1))
            .map(|i| {
                let t = i as f64 / n;
                match self {
                    DemoShape::Blob => {
                        let a = 2.0 * std::f64::consts::PI * t;
                        let r = 40.0 + 12.0 * (2.0 * a).cos() + 6.0 * (3.0 * a).sin();
                        Point::new(r * a.cos() + 60.0, r * a.sin() * 0.7 + 40.0)
                    }
                    DemoShape::Hook => {
                        Point::new(100.0 * t, 30.0 * (2.5 * t).sin() + 15.0 * t.powi(3))
                    }
                    DemoShape::Wave => Point::new(
                        120.0 * t,
                        20.0 * (4.0 * std::f64::consts::PI * t).sin(),
                    ),
                }
            })
            .collect()
    }
}

/// Rotates `curve` by `angle` radians about its own centroid, then translates it.
pub fn rigidly_moved(
    curve: &[Point],
    angle: f64,
    translation: Point,
) -> Result<Vec<Point>, IcpError> {
    let pivot = calculate_centroid(curve)?;
    Ok(rotate_about(curve, angle, &pivot)
        .into_iter()
        .map(|p| p + translation)
        .collect())
}
