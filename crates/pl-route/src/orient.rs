use pl_core::Stroke;
use tracing::debug;

/// Reverses every stroke whose first point lies right of its last point.
pub fn force_left_to_right(strokes: &[Stroke]) -> Vec<Stroke> {
    let out: Vec<Stroke> = strokes
        .iter()
        .map(|s| match (s.first(), s.last()) {
            (Some(a), Some(b)) if a.x > b.x => s.reversed(),
            _ => s.clone(),
        })
        .collect();

    debug!("force left-to-right: strokes={}", out.len());
    out
}
