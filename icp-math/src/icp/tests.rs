use super::*;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Closed, asymmetric loop with no rotational symmetry.
fn blob_curve() -> Vec<Point> {
    let n = 120;
    (0..=n)
        .map(|i| {
            let a = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            let r = 40.0 + 12.0 * (2.0 * a).cos() + 6.0 * (3.0 * a).sin();
            Point::new(r * a.cos() + 60.0, r * a.sin() * 0.7 + 40.0)
        })
        .collect()
}

fn rigidly_moved(curve: &[Point], angle: f64, translation: Point) -> Vec<Point> {
    let pivot = calculate_centroid(curve).unwrap();
    rotate_about(curve, angle, &pivot)
        .into_iter()
        .map(|p| p + translation)
        .collect()
}

fn line(points: &[(f64, f64)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn test_state_count_is_iterations_plus_one() {
    let source = blob_curve();
    let target = rigidly_moved(&source, 0.1, Point::new(2.0, -1.0));

    for max_iterations in [0, 1, 7, 20] {
        let states = run_icp(&source, &target, 5.0, 5.0, max_iterations).unwrap();
        assert_eq!(states.len(), max_iterations + 1);
        for (i, state) in states.iter().enumerate() {
            assert_eq!(state.iteration, i);
        }
    }
}

#[test]
fn test_zero_iterations_returns_identity_state() {
    let source = line(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    let target = line(&[(0.0, 3.0), (20.0, 3.0)]);

    let states = run_icp(&source, &target, 5.0, 5.0, 0).unwrap();
    assert_eq!(states.len(), 1);

    let state = &states[0];
    assert_eq!(state.transformation, Transformation::identity());
    assert_eq!(state.prev_error, None);
    assert_eq!(&state.transformed_points[..], &state.source_points[..]);
    assert_eq!(state.correspondences.len(), state.source_points.len());
    assert_relative_eq!(state.error, 9.0, epsilon = 1e-12);
}

#[test]
fn test_pure_vertical_translation() {
    let source = line(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    let target = line(&[(0.0, 10.0), (10.0, 10.0), (20.0, 10.0)]);

    let states = run_icp(&source, &target, 5.0, 5.0, 5).unwrap();
    let last = states.last().unwrap();

    assert_abs_diff_eq!(last.transformation.rotation, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(last.transformation.translation.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(last.transformation.translation.y, 10.0, epsilon = 1e-9);

    for (p, q) in last.transformed_points.iter().zip(last.matched_targets()) {
        assert!((p - q).norm() < 0.5);
    }
}

#[test]
fn test_identical_curves_stay_put() {
    let curve = blob_curve();
    let states = run_icp(&curve, &curve, 4.0, 4.0, 10).unwrap();

    for state in &states {
        assert_abs_diff_eq!(state.error, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.transformation.rotation, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.transformation.translation.norm(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_recovers_rotation_and_translation() {
    let angle = 0.3;
    let source = blob_curve();
    let target = rigidly_moved(&source, angle, Point::new(6.0, 4.0));

    let states = run_icp(&source, &target, 1.0, 1.0, 20).unwrap();
    let first = &states[0];
    let last = states.last().unwrap();

    assert_abs_diff_eq!(last.transformation.rotation, angle, epsilon = 0.03);
    assert!(last.error < 1.0, "final error {}", last.error);
    assert!(last.error < first.error / 10.0);
}

#[test]
fn test_prev_error_chains_through_states() {
    let source = blob_curve();
    let target = rigidly_moved(&source, -0.2, Point::new(-3.0, 5.0));
    let states = run_icp(&source, &target, 3.0, 2.0, 12).unwrap();

    assert_eq!(states[0].prev_error, None);
    assert_eq!(states[0].error_decrease(), None);
    for pair in states.windows(2) {
        assert_eq!(pair[1].prev_error, Some(pair[0].error));
    }
}

#[test]
fn test_state_invariants_hold_with_mismatched_spacing() {
    let source = blob_curve();
    let target = rigidly_moved(&source, 0.4, Point::new(10.0, 0.0));
    let states = run_icp(&source, &target, 7.0, 3.0, 8).unwrap();

    let sampled_source = sample_points(&source, 7.0).unwrap();
    let sampled_target = sample_points(&target, 3.0).unwrap();

    for state in &states {
        assert_eq!(&state.source_points[..], &sampled_source[..]);
        assert_eq!(&state.target_points[..], &sampled_target[..]);
        assert_eq!(state.transformed_points.len(), state.source_points.len());
        assert_eq!(state.correspondences.len(), state.source_points.len());
        assert!(state.error >= 0.0 && state.error.is_finite());
        for (i, &(src_idx, tgt_idx)) in state.correspondences.iter().enumerate() {
            assert_eq!(src_idx, i);
            assert!(tgt_idx < state.target_points.len());
        }
    }
}

#[test]
fn test_reconstruction_matches_stored_points() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x1C9);

    for _ in 0..20 {
        let source: Vec<Point> = (0..8)
            .map(|_| Point::new(rng.random_range(0.0..500.0), rng.random_range(0.0..500.0)))
            .collect();
        let target: Vec<Point> = (0..8)
            .map(|_| Point::new(rng.random_range(0.0..500.0), rng.random_range(0.0..500.0)))
            .collect();
        let spacing = rng.random_range(5.0..40.0);

        let states = run_icp(&source, &target, spacing, spacing, 30).unwrap();
        for state in &states {
            let rebuilt = state.reconstruct_transformed().unwrap();
            for (r, p) in rebuilt.iter().zip(&state.transformed_points) {
                assert_relative_eq!(*r, *p, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn test_runs_are_deterministic() {
    let source = blob_curve();
    let target = rigidly_moved(&source, 0.25, Point::new(1.0, 2.0));
    let a = run_icp(&source, &target, 2.0, 2.0, 10).unwrap();
    let b = run_icp(&source, &target, 2.0, 2.0, 10).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_insufficient_input_rejected() {
    let good = line(&[(0.0, 0.0), (1.0, 0.0)]);
    let single = line(&[(0.0, 0.0)]);

    assert_eq!(
        run_icp(&single, &good, 1.0, 1.0, 5),
        Err(IcpError::InsufficientInput {
            role: CurveRole::Source,
            points: 1
        })
    );
    assert_eq!(
        run_icp(&good, &[], 1.0, 1.0, 5),
        Err(IcpError::InsufficientInput {
            role: CurveRole::Target,
            points: 0
        })
    );
}

#[test]
fn test_invalid_spacing_rejected() {
    let curve = line(&[(0.0, 0.0), (1.0, 0.0)]);

    assert!(matches!(
        run_icp(&curve, &curve, 0.0, 1.0, 5),
        Err(IcpError::InvalidSpacing {
            role: CurveRole::Source,
            ..
        })
    ));
    assert!(matches!(
        run_icp(&curve, &curve, 1.0, f64::NAN, 5),
        Err(IcpError::InvalidSpacing {
            role: CurveRole::Target,
            ..
        })
    ));
}

#[test]
fn test_non_finite_points_rejected() {
    let good = line(&[(0.0, 0.0), (10.0, 0.0)]);
    let infinite = line(&[(0.0, 0.0), (f64::INFINITY, 0.0)]);
    let nan = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, f64::NAN)]);

    assert_eq!(
        run_icp(&infinite, &good, 5.0, 5.0, 3),
        Err(IcpError::NonFinitePoint {
            role: CurveRole::Source,
            index: 1
        })
    );
    assert_eq!(
        run_icp(&good, &nan, 5.0, 5.0, 3),
        Err(IcpError::NonFinitePoint {
            role: CurveRole::Target,
            index: 2
        })
    );
}

#[test]
fn test_overflowing_segment_rejected() {
    let good = line(&[(0.0, 0.0), (10.0, 0.0)]);
    let huge = line(&[(-1e308, 0.0), (1e308, 0.0)]);

    assert!(matches!(
        run_icp(&huge, &good, 10.0, 10.0, 3),
        Err(IcpError::ArgumentError(_))
    ));
}

#[test]
fn test_apply_about_rotates_around_pivot() {
    let transformation = Transformation {
        rotation: std::f64::consts::FRAC_PI_2,
        translation: Point::new(1.0, -1.0),
    };
    let pivot = Point::new(2.0, 2.0);
    let moved = transformation.apply_about(&[pivot, Point::new(3.0, 2.0)], &pivot);

    assert_relative_eq!(moved[0], Point::new(3.0, 1.0), epsilon = 1e-12);
    assert_relative_eq!(moved[1], Point::new(3.0, 2.0), epsilon = 1e-12);
    assert_eq!(
        Transformation::identity().apply_about(&[pivot], &Point::new(-5.0, 9.0)),
        vec![pivot]
    );
}

#[test]
fn test_error_message_names_curve() {
    let err = IcpError::InsufficientInput {
        role: CurveRole::Target,
        points: 1,
    };
    assert_eq!(err.to_string(), "target curve needs at least 2 points, got 1");
}

/// Simple struct implementing Locatable2d for testing run_icp_on_objects
#[derive(Debug, Clone, PartialEq)]
struct PenSample {
    x_coord: f64,
    y_coord: f64,
}

impl Locatable2d for PenSample {
    fn x(&self) -> f64 {
        self.x_coord
    }
    fn y(&self) -> f64 {
        self.y_coord
    }
}

#[test]
fn test_run_on_locatable_objects() {
    let source: Vec<PenSample> = (0..5)
        .map(|i| PenSample {
            x_coord: i as f64 * 5.0,
            y_coord: 0.0,
        })
        .collect();
    let target: Vec<(f64, f64)> = (0..5).map(|i| (i as f64 * 5.0, 4.0)).collect();

    let params = IcpParams {
        source_spacing: 5.0,
        target_spacing: 5.0,
        max_iterations: 3,
    };
    let states = run_icp_on_objects(&source, &target, &params).unwrap();

    assert_eq!(states.len(), 4);
    let last = states.last().unwrap();
    assert_abs_diff_eq!(last.transformation.translation.y, 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(last.error, 0.0, epsilon = 1e-12);
}

#[test]
fn test_default_params() {
    let params = IcpParams::default();
    assert_eq!(params.source_spacing, 10.0);
    assert_eq!(params.target_spacing, 10.0);
    assert_eq!(params.max_iterations, 20);
    assert!(params.validate().is_ok());
}
