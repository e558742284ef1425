//! Property-based tests for stroke smoothing and simplification.
//!
//! Run with: cargo test -p pl-polish -- proptest

use pl_core::Point2;
use pl_polish::{chaikin_smooth, rdp_simplify, segment_distance};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point2> {
    (-50.0..50.0f64, -50.0..50.0f64).prop_map(|(x, y)| Point2::new(x, y))
}

fn arb_polyline(max_len: usize) -> impl Strategy<Value = Vec<Point2>> {
    prop::collection::vec(arb_point(), 0..=max_len)
}

// =============================================================================
// Property Tests: Smoothing
// =============================================================================

proptest! {
    /// Smoothing never moves the stroke ends.
    #[test]
    fn smoothing_preserves_endpoints(pts in arb_polyline(30), iterations in 0usize..5) {
        let out = chaikin_smooth(&pts, iterations);
        prop_assert_eq!(out.first(), pts.first());
        prop_assert_eq!(out.last(), pts.last());
    }

    /// Every smoothed point stays inside the input bounding box.
    #[test]
    fn smoothing_stays_in_bounds(pts in arb_polyline(30), iterations in 0usize..4) {
        let out = chaikin_smooth(&pts, iterations);
        let tol = 1e-9;
        for p in &out {
            prop_assert!(pts.iter().any(|q| q.x <= p.x + tol));
            prop_assert!(pts.iter().any(|q| q.x >= p.x - tol));
            prop_assert!(pts.iter().any(|q| q.y <= p.y + tol));
            prop_assert!(pts.iter().any(|q| q.y >= p.y - tol));
        }
    }
}

// =============================================================================
// Property Tests: Simplification
// =============================================================================

proptest! {
    #[test]
    fn simplification_preserves_endpoints(pts in arb_polyline(40), eps in 0.0..5.0f64) {
        let out = rdp_simplify(&pts, eps);
        prop_assert_eq!(out.first(), pts.first());
        prop_assert_eq!(out.last(), pts.last());
        prop_assert!(out.len() <= pts.len());
    }

    /// Dropped points lie within `eps` of the retained chord that spans them.
    #[test]
    fn dropped_points_are_within_epsilon(pts in arb_polyline(40), eps in 0.01..5.0f64) {
        let out = rdp_simplify(&pts, eps);
        if pts.len() < 3 {
            prop_assert_eq!(out, pts);
            return Ok(());
        }

        // Retained points are a subsequence; recover their indices.
        let mut kept = Vec::with_capacity(out.len());
        let mut j = 0;
        for (i, p) in pts.iter().enumerate() {
            if j < out.len() && *p == out[j] {
                kept.push(i);
                j += 1;
            }
        }
        prop_assert_eq!(kept.len(), out.len());

        for w in kept.windows(2) {
            let (a, b) = (w[0], w[1]);
            for i in a + 1..b {
                let d = segment_distance(pts[i], pts[a], pts[b]);
                prop_assert!(d <= eps + 1e-9, "point {} deviates {} > {}", i, d, eps);
            }
        }
    }
}
