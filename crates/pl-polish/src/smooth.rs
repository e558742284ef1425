use pl_core::Point2;

/// Chaikin corner cutting.
///
/// Each iteration keeps the first point, replaces every edge by its 1/4 and
/// 3/4 points, and keeps the last point. Fewer than three points or zero
/// iterations return the input unchanged.
pub fn chaikin_smooth(points: &[Point2], iterations: usize) -> Vec<Point2> {
    if iterations == 0 || points.len() < 3 {
        return points.to_vec();
    }

    let mut cur = points.to_vec();
    for _ in 0..iterations {
        let mut next = Vec::with_capacity(2 * cur.len());
        next.push(cur[0]);
        for w in cur.windows(2) {
            next.push(w[0].lerp(w[1], 0.25));
            next.push(w[0].lerp(w[1], 0.75));
        }
        next.push(cur[cur.len() - 1]);
        cur = next;
    }

    cur
}
