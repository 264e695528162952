//! Arc-length resampling of freehand polylines.
//!
//! Raw pointer input is dense where the pen moved slowly and sparse where it
//! moved fast. Resampling at a fixed path distance gives the alignment loop
//! point sets whose density does not depend on drawing speed.

use crate::icp::IcpError;
use crate::point::Point;

/// Per-axis tolerance under which the final raw point counts as already emitted.
pub const ENDPOINT_TOLERANCE: f64 = 1e-3;

/// Resamples `curve` so consecutive output points are `spacing` apart along the path.
///
/// The first raw point is always emitted. Walking the polyline, an interpolated
/// point is emitted each time the accumulated arc length reaches a multiple of
/// `spacing`; the remainder carries across segment boundaries. The last raw
/// point is appended unless the final emitted point already lies within
/// [`ENDPOINT_TOLERANCE`] of it, so both endpoints always survive.
///
/// Curves with zero or one point are returned unchanged.
///
/// # Errors
/// * `IcpError::ArgumentError` - If `spacing` is not a positive finite number,
///   or a segment's length is not finite (non-finite or overflowing coordinates)
pub fn sample_points(curve: &[Point], spacing: f64) -> Result<Vec<Point>, IcpError> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(IcpError::ArgumentError(format!(
            "spacing must be positive and finite, got {spacing}"
        )));
    }

    if curve.len() <= 1 {
        return Ok(curve.to_vec());
    }

    let mut result = vec![curve[0]];
    let mut distance_to_next_sample = spacing;

    for (index, segment) in curve.windows(2).enumerate() {
        let (start, end) = (segment[0], segment[1]);
        let segment_length = (end - start).norm();
        if !segment_length.is_finite() {
            return Err(IcpError::ArgumentError(format!(
                "segment {index} has non-finite length {segment_length}"
            )));
        }

        // Offsets from the segment start, so rounding does not accumulate.
        let mut emitted = 0usize;
        let mut offset = distance_to_next_sample;
        while offset <= segment_length {
            result.push(start + (end - start) * (offset / segment_length));
            emitted += 1;
            offset = distance_to_next_sample + spacing * emitted as f64;
        }

        distance_to_next_sample = offset - segment_length;
    }

    let last_raw = curve[curve.len() - 1];
    if let Some(last_emitted) = result.last() {
        let gap = last_emitted - last_raw;
        if gap.x.abs() > ENDPOINT_TOLERANCE || gap.y.abs() > ENDPOINT_TOLERANCE {
            result.push(last_raw);
        }
    }

    log::trace!(
        "sampled {} raw points into {} at spacing {spacing}",
        curve.len(),
        result.len()
    );

    Ok(result)
}
