use pl_core::Point2;

/// Distance from `p` to the segment `a`–`b`, projection clamped to the
/// segment. A degenerate segment measures the distance to `a`.
pub fn segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        return p.distance(a);
    }

    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Ramer–Douglas–Peucker simplification.
///
/// Keeps the endpoints and every point whose deviation from the current
/// chord exceeds `epsilon`. Fewer than three points or `epsilon <= 0` return
/// the input unchanged.
pub fn rdp_simplify(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    let n = points.len();
    if epsilon.is_nan() || epsilon <= 0.0 || n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0_usize, n - 1)];
    while let Some((a, b)) = stack.pop() {
        let mut max_d = -1.0;
        let mut idx = None;
        for i in a + 1..b {
            let d = segment_distance(points[i], points[a], points[b]);
            if d > max_d {
                max_d = d;
                idx = Some(i);
            }
        }

        if let Some(i) = idx
            && max_d > epsilon
        {
            keep[i] = true;
            stack.push((i, b));
            stack.push((a, i));
        }
    }

    points
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &k)| k.then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use pl_core::Point2;

    use super::{rdp_simplify, segment_distance};

    #[test]
    fn projection_is_clamped() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);

        assert!((segment_distance(Point2::new(1.0, 1.0), a, b) - 1.0).abs() < 1e-12);
        assert!((segment_distance(Point2::new(5.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((segment_distance(Point2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_collapse() {
        let pts: Vec<Point2> = (0..10).map(|i| Point2::new(i as f64 * 0.1, 0.0)).collect();
        let out = rdp_simplify(&pts, 0.01);
        assert_eq!(out, vec![pts[0], pts[9]]);
    }

    #[test]
    fn corners_survive() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.02),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.03, 2.0),
            Point2::new(2.0, 3.0),
        ];
        let out = rdp_simplify(&pts, 0.12);
        assert_eq!(out, vec![pts[0], pts[2], pts[5]]);
    }

    #[test]
    fn closed_loop_keeps_far_point() {
        // First and last coincide, so the chord is degenerate.
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let out = rdp_simplify(&pts, 0.1);
        assert!(out.contains(&Point2::new(1.0, 1.0)));
        assert_eq!(out.first(), pts.first());
        assert_eq!(out.last(), pts.last());
    }

    #[test]
    fn non_positive_epsilon_is_a_no_op() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        assert_eq!(rdp_simplify(&pts, 0.0), pts);
        assert_eq!(rdp_simplify(&pts, -1.0), pts);
    }
}
