//! Iterative Closest Point alignment of one sampled curve onto another.
//!
//! Each iteration matches every current source point to its nearest target
//! point, solves the closed-form 2D rotation for those matches, rotates about
//! the source centroid and translates so the centroids coincide. Every
//! iteration is captured as an immutable [`IterationState`] so a caller can
//! replay the run step by step.

mod correspondence;
mod metric;
mod transform;

use std::fmt;
use std::sync::Arc;

use nalgebra::Rotation2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::{calculate_centroid, Locatable2d, Point};
use crate::sampling::sample_points;

pub use correspondence::{find_closest_point, find_correspondences};
pub use metric::{mean_squared_error, try_mean_squared_error};
pub use transform::{estimate_rigid_step, rotate_about, transform_points, RigidStep};

/// Matched pair of (source_index, target_index).
///
/// Many source points may share one target index.
pub type Correspondence = (usize, usize);

/// Minimum number of raw points a curve needs before a run can start.
pub const MIN_CURVE_POINTS: usize = 2;

/// Which of the two input curves a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveRole {
    Source,
    Target,
}

impl fmt::Display for CurveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveRole::Source => write!(f, "source"),
            CurveRole::Target => write!(f, "target"),
        }
    }
}

/// Errors that can occur during ICP operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IcpError {
    #[error("{role} curve needs at least 2 points, got {points}")]
    InsufficientInput { role: CurveRole, points: usize },

    #[error("{role} point {index} has a non-finite coordinate")]
    NonFinitePoint { role: CurveRole, index: usize },

    #[error("{role} spacing must be positive and finite, got {spacing}")]
    InvalidSpacing { role: CurveRole, spacing: f64 },

    #[error("Invalid argument: {0}")]
    ArgumentError(String),

    #[error("point sets differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
}

/// Parameters of a single alignment run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IcpParams {
    /// Arc-length spacing used to resample the source curve
    pub source_spacing: f64,
    /// Arc-length spacing used to resample the target curve
    pub target_spacing: f64,
    /// Number of correspondence/estimate steps after iteration 0
    pub max_iterations: usize,
}

impl Default for IcpParams {
    fn default() -> Self {
        Self {
            source_spacing: 10.0,
            target_spacing: 10.0,
            max_iterations: 20,
        }
    }
}

impl IcpParams {
    /// Checks both spacings are positive and finite.
    pub fn validate(&self) -> Result<(), IcpError> {
        for (role, spacing) in [
            (CurveRole::Source, self.source_spacing),
            (CurveRole::Target, self.target_spacing),
        ] {
            if !(spacing.is_finite() && spacing > 0.0) {
                return Err(IcpError::InvalidSpacing { role, spacing });
            }
        }
        Ok(())
    }
}

/// Accumulated rigid transform from the iteration-0 sampled source points.
///
/// `rotation` is the sum of per-iteration rotation deltas and `translation`
/// the sum of per-iteration translation deltas. Together they map the
/// original sampled source points `p` as
///
/// ```text
/// p' = R(rotation) * (p - c0) + c0 + translation
/// ```
///
/// where `c0` is the centroid of those original points. Every step moves the
/// source centroid exactly onto the corresponded target centroid and only
/// rotates offsets from it, so this closed form reproduces the iterated points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// Accumulated rotation in radians
    pub rotation: f64,
    /// Accumulated translation
    pub translation: Point,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    pub fn identity() -> Self {
        Self {
            rotation: 0.0,
            translation: Point::zeros(),
        }
    }

    /// Folds one iteration's deltas into the accumulated transform.
    pub fn compose(&self, step: &RigidStep) -> Self {
        Self {
            rotation: self.rotation + step.delta_rotation,
            translation: self.translation + step.delta_translation,
        }
    }

    /// Applies the accumulated transform to `points`, rotating about `pivot`.
    ///
    /// `R (p - pivot) + pivot + t` is folded into a single `R p + offset`.
    pub fn apply_about(&self, points: &[Point], pivot: &Point) -> Vec<Point> {
        let rotation = Rotation2::new(self.rotation);
        let offset = pivot + self.translation - rotation * pivot;
        transform_points(points, &rotation, &offset)
    }

    /// Accumulated rotation in degrees, for readouts.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// Immutable snapshot of one ICP iteration.
///
/// `source_points` and `target_points` are the sampled inputs shared by all
/// states of a run; they are never mutated after sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationState {
    /// Iteration number, 0 for the untransformed input
    pub iteration: usize,
    /// Sampled source points before any transformation
    pub source_points: Arc<[Point]>,
    /// Sampled target points
    pub target_points: Arc<[Point]>,
    /// Source points after this iteration's transformation
    pub transformed_points: Vec<Point>,
    /// Nearest-target matches used by this iteration
    pub correspondences: Vec<Correspondence>,
    /// Transform accumulated up to and including this iteration
    pub transformation: Transformation,
    /// Mean squared distance between transformed points and their matches
    pub error: f64,
    /// Error of the preceding state, `None` for iteration 0
    pub prev_error: Option<f64>,
}

impl IterationState {
    /// How much the error dropped relative to the previous state.
    ///
    /// Negative when the error rose. `None` for iteration 0.
    pub fn error_decrease(&self) -> Option<f64> {
        self.prev_error.map(|prev| prev - self.error)
    }

    /// Rebuilds the transformed curve from the original sampled source points.
    ///
    /// Renderers that only keep the accumulated [`Transformation`] use this;
    /// the result matches `transformed_points` up to floating point error.
    pub fn reconstruct_transformed(&self) -> Result<Vec<Point>, IcpError> {
        let pivot = calculate_centroid(&self.source_points)?;
        Ok(self.transformation.apply_about(&self.source_points, &pivot))
    }

    /// Corresponded target point for each source index, in source order.
    pub fn matched_targets(&self) -> Vec<Point> {
        self.correspondences
            .iter()
            .map(|&(_, tgt_idx)| self.target_points[tgt_idx])
            .collect()
    }
}

/// Samples both curves and runs `max_iterations` ICP steps.
///
/// Returns exactly `max_iterations + 1` states: index 0 holds the untransformed
/// sampled source with the identity transform, the last index the final
/// alignment. There is no early exit on convergence.
///
/// # Errors
/// * `IcpError::InsufficientInput` - If either curve has fewer than two raw points
/// * `IcpError::NonFinitePoint` - If either curve holds a NaN or infinite coordinate
/// * `IcpError::ArgumentError` - If a curve segment is too long to measure in `f64`
/// * `IcpError::InvalidSpacing` - If either spacing is not positive and finite
pub fn run_icp(
    source_curve: &[Point],
    target_curve: &[Point],
    source_spacing: f64,
    target_spacing: f64,
    max_iterations: usize,
) -> Result<Vec<IterationState>, IcpError> {
    let params = IcpParams {
        source_spacing,
        target_spacing,
        max_iterations,
    };
    run_icp_with_params(source_curve, target_curve, &params)
}

/// [`run_icp`] with the parameters bundled in an [`IcpParams`].
pub fn run_icp_with_params(
    source_curve: &[Point],
    target_curve: &[Point],
    params: &IcpParams,
) -> Result<Vec<IterationState>, IcpError> {
    for (role, curve) in [
        (CurveRole::Source, source_curve),
        (CurveRole::Target, target_curve),
    ] {
        if curve.len() < MIN_CURVE_POINTS {
            return Err(IcpError::InsufficientInput {
                role,
                points: curve.len(),
            });
        }
        if let Some(index) = curve
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(IcpError::NonFinitePoint { role, index });
        }
    }
    params.validate()?;

    let source: Arc<[Point]> = sample_points(source_curve, params.source_spacing)?.into();
    let target: Arc<[Point]> = sample_points(target_curve, params.target_spacing)?.into();

    let mut states = Vec::new();
    let mut current = initial_state(source, target)?;

    for _ in 0..params.max_iterations {
        let next = advance(&current)?;
        states.push(current);
        current = next;
    }

    log::info!(
        "ICP finished after {} iterations: error {:.6}, rotation {:.3} deg, translation ({:.3}, {:.3})",
        current.iteration,
        current.error,
        current.transformation.rotation_degrees(),
        current.transformation.translation.x,
        current.transformation.translation.y
    );
    states.push(current);

    Ok(states)
}

/// Runs ICP on arbitrary locatable objects, treating each slice as a raw curve.
pub fn run_icp_on_objects<R1, R2>(
    source: &[R1],
    target: &[R2],
    params: &IcpParams,
) -> Result<Vec<IterationState>, IcpError>
where
    R1: Locatable2d,
    R2: Locatable2d,
{
    let source_curve: Vec<Point> = source.iter().map(Locatable2d::to_point).collect();
    let target_curve: Vec<Point> = target.iter().map(Locatable2d::to_point).collect();
    run_icp_with_params(&source_curve, &target_curve, params)
}

/// Iteration 0: matches from the untransformed source, identity transform.
fn initial_state(source: Arc<[Point]>, target: Arc<[Point]>) -> Result<IterationState, IcpError> {
    let correspondences = find_correspondences(&source, &target)?;
    let matched: Vec<Point> = correspondences
        .iter()
        .map(|&(_, tgt_idx)| target[tgt_idx])
        .collect();
    let error = try_mean_squared_error(&source, &matched)?;

    log::debug!(
        "ICP start: {} source samples, {} target samples, error {error:.6}",
        source.len(),
        target.len()
    );

    Ok(IterationState {
        iteration: 0,
        transformed_points: source.to_vec(),
        source_points: source,
        target_points: target,
        correspondences,
        transformation: Transformation::identity(),
        error,
        prev_error: None,
    })
}

/// Produces the next state from `prev` without touching it.
fn advance(prev: &IterationState) -> Result<IterationState, IcpError> {
    let current = &prev.transformed_points;
    let target = &prev.target_points;

    let correspondences = find_correspondences(current, target)?;
    let (step, transformed_points) = estimate_rigid_step(current, target, &correspondences)?;
    let transformation = prev.transformation.compose(&step);

    let matched: Vec<Point> = correspondences
        .iter()
        .map(|&(_, tgt_idx)| target[tgt_idx])
        .collect();
    let error = mean_squared_error(&transformed_points, &matched);

    let iteration = prev.iteration + 1;
    log::debug!(
        "ICP iteration {iteration}: error {error:.6} (prev {:.6}), delta rotation {:.5} rad",
        prev.error,
        step.delta_rotation
    );

    Ok(IterationState {
        iteration,
        source_points: Arc::clone(&prev.source_points),
        target_points: Arc::clone(&prev.target_points),
        transformed_points,
        correspondences,
        transformation,
        error,
        prev_error: Some(prev.error),
    })
}

#[cfg(test)]
mod tests;
