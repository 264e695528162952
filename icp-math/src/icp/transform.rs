//! Closed-form rigid transform estimation for matched 2D point sets.
//!
//! In 2D the least-squares rotation between two centred point sets reduces
//! to a single angle, `atan2(Σ cross, Σ dot)`, so no SVD is needed.

use nalgebra::Rotation2;

use super::{Correspondence, IcpError};
use crate::point::{calculate_centroid, Point};

/// Rotation and translation deltas produced by one ICP iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidStep {
    /// Rotation about `source_centroid`, in radians
    pub delta_rotation: f64,
    /// Translation applied after the rotation
    pub delta_translation: Point,
    /// Centroid of the current source points
    pub source_centroid: Point,
    /// Centroid of the corresponded target points
    pub target_centroid: Point,
}

/// Estimates the rotation/translation that best maps `current` onto its matches.
///
/// The rotation pivot is the centroid of all current points; the target
/// centroid is taken over the corresponded target points (with repeats), not
/// the raw target set. After rotating, the translation moves the recomputed
/// source centroid exactly onto the target centroid.
///
/// Returns the step together with the transformed points.
///
/// # Errors
/// * `IcpError::ArgumentError` - If there are no correspondences or an index is out of range
pub fn estimate_rigid_step(
    current: &[Point],
    target: &[Point],
    correspondences: &[Correspondence],
) -> Result<(RigidStep, Vec<Point>), IcpError> {
    if let Some(&(src_idx, tgt_idx)) = correspondences
        .iter()
        .find(|&&(s, t)| s >= current.len() || t >= target.len())
    {
        return Err(IcpError::ArgumentError(format!(
            "correspondence ({src_idx}, {tgt_idx}) out of range for {} source / {} target points",
            current.len(),
            target.len()
        )));
    }

    let matched_targets: Vec<Point> = correspondences
        .iter()
        .map(|&(_, tgt_idx)| target[tgt_idx])
        .collect();

    let source_centroid = calculate_centroid(current)?;
    let target_centroid = calculate_centroid(&matched_targets)?;

    let mut numerator: f64 = 0.0;
    let mut denominator: f64 = 0.0;

    for &(src_idx, tgt_idx) in correspondences {
        let src = current[src_idx] - source_centroid;
        let tgt = target[tgt_idx] - target_centroid;

        numerator += src.x * tgt.y - src.y * tgt.x;
        denominator += src.x * tgt.x + src.y * tgt.y;
    }

    let delta_rotation = numerator.atan2(denominator);
    let rotated = rotate_about(current, delta_rotation, &source_centroid);

    let rotated_centroid = calculate_centroid(&rotated)?;
    let delta_translation = target_centroid - rotated_centroid;

    let transformed = rotated.into_iter().map(|p| p + delta_translation).collect();

    Ok((
        RigidStep {
            delta_rotation,
            delta_translation,
            source_centroid,
            target_centroid,
        },
        transformed,
    ))
}

/// Rotates every point by `angle` radians about `pivot`.
pub fn rotate_about(points: &[Point], angle: f64, pivot: &Point) -> Vec<Point> {
    let rotation = Rotation2::new(angle);
    points
        .iter()
        .map(|p| rotation * (p - pivot) + pivot)
        .collect()
}

/// Applies rigid transformation (rotation + translation) to a set of points.
///
/// Each point is transformed according to: p' = R × p + t
pub fn transform_points(
    points: &[Point],
    rotation: &Rotation2<f64>,
    translation: &Point,
) -> Vec<Point> {
    points.iter().map(|p| rotation * p + translation).collect()
}
