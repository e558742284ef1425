use pl_core::{Point2, Stroke};
use tracing::debug;

/// Gaps at or below this distance join without an extra point.
const SAME_POINT_MM: f64 = 1e-9;

/// Joins consecutive strokes whose gap is at most `threshold_mm`.
///
/// The next stroke's first point is kept as a bridging point unless it
/// coincides with the previous stroke's last point. A non-positive threshold
/// returns the input unchanged.
pub fn stitch_strokes(strokes: &[Stroke], threshold_mm: f64) -> Vec<Stroke> {
    let out = join_close(strokes, threshold_mm);
    debug!(
        "stitch: in={}, out={}, threshold_mm={}",
        strokes.len(),
        out.len(),
        threshold_mm
    );
    out
}

/// Same joining rule as [`stitch_strokes`], applied as the wider second pass
/// that lets the pen stay down across small gaps between glyph parts.
pub fn bridge_strokes(strokes: &[Stroke], threshold_mm: f64) -> Vec<Stroke> {
    let out = join_close(strokes, threshold_mm);
    debug!(
        "bridge: in={}, out={}, threshold_mm={}",
        strokes.len(),
        out.len(),
        threshold_mm
    );
    out
}

fn join_close(strokes: &[Stroke], threshold_mm: f64) -> Vec<Stroke> {
    if threshold_mm.is_nan() || threshold_mm <= 0.0 || strokes.is_empty() {
        return strokes.to_vec();
    }

    let mut out = Vec::new();
    let mut cur: Vec<Point2> = strokes[0].points.clone();

    for s in &strokes[1..] {
        let gap = match (cur.last(), s.first()) {
            (Some(&a), Some(b)) => a.distance(b),
            _ => f64::INFINITY,
        };

        if gap <= threshold_mm {
            let skip = usize::from(gap <= SAME_POINT_MM);
            cur.extend_from_slice(&s.points[skip..]);
        } else {
            out.push(Stroke::new(std::mem::replace(&mut cur, s.points.clone())));
        }
    }
    out.push(Stroke::new(cur));

    out
}
