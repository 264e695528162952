//! Geometry and alignment primitives for hand-drawn 2D curves.
//!
//! The crate turns freehand polylines into evenly spaced point sets and
//! aligns one onto the other with a point-to-point Iterative Closest Point
//! loop, recording every iteration so callers can step through the run.

pub mod icp;
pub mod point;
pub mod sampling;

pub use icp::{
    run_icp, run_icp_on_objects, run_icp_with_params, Correspondence, CurveRole, IcpError,
    IcpParams, IterationState, Transformation,
};
pub use point::{calculate_centroid, Locatable2d, Point};
pub use sampling::sample_points;
