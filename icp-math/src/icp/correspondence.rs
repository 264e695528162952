//! Point correspondence via nearest-neighbor matching.
//!
//! Point counts here are tens to low hundreds of samples per curve, so a
//! linear scan is used instead of a spatial index.

use super::{Correspondence, IcpError};
use crate::point::Point;

/// Index of the candidate closest to `point` by Euclidean distance.
///
/// Ties go to the lowest index. Returns `None` when `candidates` is empty.
pub fn find_closest_point(point: &Point, candidates: &[Point]) -> Option<usize> {
    let mut min_dist = f64::INFINITY;
    let mut closest_idx = None;

    for (j, candidate) in candidates.iter().enumerate() {
        let dist = (point - candidate).norm_squared();

        if dist < min_dist {
            min_dist = dist;
            closest_idx = Some(j);
        }
    }

    closest_idx
}

/// Finds the closest target point for each source point using brute-force search.
///
/// Returns one (source_index, target_index) pair per source point, in source order.
///
/// Time complexity: O(n × m) where n = source points, m = target points.
pub fn find_correspondences(
    source_points: &[Point],
    target_points: &[Point],
) -> Result<Vec<Correspondence>, IcpError> {
    if target_points.is_empty() {
        return Err(IcpError::ArgumentError(
            "cannot match against an empty target set".to_string(),
        ));
    }

    source_points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            // Non-empty targets always produce a match; NaN coordinates do not.
            find_closest_point(p, target_points)
                .map(|j| (i, j))
                .ok_or_else(|| {
                    IcpError::ArgumentError(format!("source point {i} has no finite distance"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let matches = find_correspondences(&points, &points).unwrap();
        assert_eq!(matches, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_asymmetric_sizes() {
        let source = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let target = vec![
            Point::new(0.1, 0.0),
            Point::new(5.0, 5.0),
            Point::new(9.9, 10.0),
        ];
        let matches = find_correspondences(&source, &target).unwrap();
        // source[0] closest to target[0], source[1] closest to target[2]
        assert_eq!(matches, vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn test_many_to_one() {
        let source = vec![
            Point::new(0.0, 0.0),
            Point::new(0.1, 0.0),
            Point::new(0.2, 0.0),
        ];
        let target = vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0)];
        let matches = find_correspondences(&source, &target).unwrap();
        assert_eq!(matches, vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let point = Point::new(0.0, 0.0);
        let candidates = vec![
            Point::new(5.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(find_closest_point(&point, &candidates), Some(1));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(find_closest_point(&Point::new(1.0, 2.0), &[]), None);
        assert!(matches!(
            find_correspondences(&[Point::new(1.0, 2.0)], &[]),
            Err(IcpError::ArgumentError(_))
        ));
    }
}
