//! In-memory pen command stream.

use pl_core::{Point2, Stroke};
use tracing::debug;

/// One plotter move. The pen state applies while moving to `(x_mm, y_mm)`;
/// `dwell_ms` is waited after arriving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotCmd {
    pub x_mm: f64,
    pub y_mm: f64,
    pub pen_down: bool,
    pub dwell_ms: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Longest drawn move; longer segments are subdivided.
    pub poly_step_mm: f64,
    /// Wait after lowering the pen.
    pub pen_settle_ms: u16,
    /// Wait after each drawn move.
    pub segment_dwell_ms: u16,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            poly_step_mm: 0.7,
            pen_settle_ms: 50,
            segment_dwell_ms: 0,
        }
    }
}

/// Subdivides segments longer than `max_step_mm` into equal parts.
///
/// A non-positive step returns the input unchanged.
pub fn resample_polyline(points: &[Point2], max_step_mm: f64) -> Vec<Point2> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if max_step_mm.is_nan() || max_step_mm <= 0.0 {
        return points.to_vec();
    }

    let mut out = vec![first];
    let mut a = first;
    for &b in &points[1..] {
        let d = a.distance(b);
        if d <= max_step_mm {
            out.push(b);
        } else {
            let steps = (d / max_step_mm).ceil() as usize;
            out.extend((1..=steps).map(|s| a.lerp(b, s as f64 / steps as f64)));
        }
        a = b;
    }

    out
}

/// Emits pen commands for `strokes` in order.
///
/// Per stroke: a pen-up travel to the start, a pen-down with settle dwell,
/// every resampled point with the segment dwell, and a pen-up at the end.
/// Strokes with fewer than two points after resampling are skipped.
pub fn to_plot_cmds(strokes: &[Stroke], cfg: &ExportConfig) -> Vec<PlotCmd> {
    let mut cmds = Vec::new();

    for (i, s) in strokes.iter().enumerate() {
        let pts = resample_polyline(&s.points, cfg.poly_step_mm);
        let (Some(&start), Some(&end)) = (pts.first(), pts.last()) else {
            continue;
        };
        if pts.len() < 2 {
            continue;
        }

        cmds.push(cmd(start, false, 0));
        cmds.push(cmd(start, true, cfg.pen_settle_ms));
        cmds.extend(pts[1..].iter().map(|&p| cmd(p, true, cfg.segment_dwell_ms)));
        cmds.push(cmd(end, false, 0));

        debug!(
            "stroke {}: pts_in={}, pts_out={}, start=({:.2},{:.2}), end=({:.2},{:.2})",
            i,
            s.len(),
            pts.len(),
            start.x,
            start.y,
            end.x,
            end.y
        );
    }

    debug!("plot commands: total={}", cmds.len());
    cmds
}

fn cmd(p: Point2, pen_down: bool, dwell_ms: u16) -> PlotCmd {
    PlotCmd {
        x_mm: p.x,
        y_mm: p.y,
        pen_down,
        dwell_ms,
    }
}
