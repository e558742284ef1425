//! Stroke polishing: corner smoothing followed by point reduction.
//!
//! Traced strokes follow pixel centers and carry staircase jitter. Chaikin
//! smoothing rounds it off; Ramer–Douglas–Peucker then drops points that lie
//! within `simplify_epsilon_mm` of the retained chord. Both keep the first and
//! last point of every stroke.

mod simplify;
mod smooth;

use pl_core::Stroke;
use tracing::debug;

pub use simplify::{rdp_simplify, segment_distance};
pub use smooth::chaikin_smooth;

#[derive(Debug, Clone, PartialEq)]
pub struct PolishConfig {
    pub smooth_iterations: usize,
    pub simplify_epsilon_mm: f64,
}

impl Default for PolishConfig {
    fn default() -> Self {
        Self {
            smooth_iterations: 2,
            simplify_epsilon_mm: 0.12,
        }
    }
}

/// Smooths then simplifies every stroke, returning a new list.
pub fn polish_strokes(strokes: &[Stroke], cfg: &PolishConfig) -> Vec<Stroke> {
    let out: Vec<Stroke> = strokes
        .iter()
        .map(|s| {
            let smoothed = chaikin_smooth(&s.points, cfg.smooth_iterations);
            Stroke::new(rdp_simplify(&smoothed, cfg.simplify_epsilon_mm))
        })
        .collect();

    debug!(
        "polish: strokes={}, points_in={}, points_out={}, smooth_iterations={}, epsilon_mm={}",
        strokes.len(),
        strokes.iter().map(Stroke::len).sum::<usize>(),
        out.iter().map(Stroke::len).sum::<usize>(),
        cfg.smooth_iterations,
        cfg.simplify_epsilon_mm
    );

    out
}
