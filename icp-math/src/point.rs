//! Point model shared by every stage of the alignment pipeline.

use nalgebra::Vector2;

use crate::icp::IcpError;

/// A 2D point in canvas coordinates.
pub type Point = Vector2<f64>;

/// Trait for objects that can be located in a 2D Cartesian coordinate system.
pub trait Locatable2d {
    /// Returns the x-coordinate of the object.
    fn x(&self) -> f64;

    /// Returns the y-coordinate of the object.
    fn y(&self) -> f64;

    /// Returns the object's position as a [`Point`].
    fn to_point(&self) -> Point {
        Point::new(self.x(), self.y())
    }
}

impl Locatable2d for Vector2<f64> {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl Locatable2d for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

/// Calculates the geometric centroid (center of mass) of a point set.
pub fn calculate_centroid(points: &[Point]) -> Result<Point, IcpError> {
    if points.is_empty() {
        return Err(IcpError::ArgumentError(
            "cannot compute centroid of empty point set".to_string(),
        ));
    }

    let sum = points.iter().fold(Point::zeros(), |acc, p| acc + p);
    Ok(sum / points.len() as f64)
}
