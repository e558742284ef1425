use kurbo::{BezPath, PathEl, Point};
use pl_core::{Image, SET, Sheet};

use crate::FillRule;

/// Non-horizontal polygon edge, stored with `y0 < y1`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    winding: i32,
}

impl Edge {
    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// Scan-converts the flattened outline with `supersample` sub-scanlines per
/// pixel row and exact horizontal span coverage. A pixel is set when its
/// covered fraction reaches `threshold`.
pub(crate) fn mask_by_scan(
    outline: &BezPath,
    sheet: &Sheet,
    rule: FillRule,
    tolerance_mm: f64,
    supersample: usize,
    threshold: f32,
) -> Image<u8> {
    let (width, height) = sheet.grid_size();
    let mut out = Image::new_fill(width, height, 0u8);

    let edges = collect_edges(outline, tolerance_mm);
    if edges.is_empty() {
        return out;
    }

    let samples = supersample.max(1);
    let sample_weight = 1.0 / samples as f32;
    let mut coverage = vec![0.0f32; width];
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for y in 0..height {
        coverage.iter_mut().for_each(|c| *c = 0.0);

        for s in 0..samples {
            let sy = (y as f64 + (s as f64 + 0.5) / samples as f64) * sheet.pixel_mm;

            crossings.clear();
            for e in &edges {
                if sy >= e.y0 && sy < e.y1 {
                    crossings.push((e.x_at(sy), e.winding));
                }
            }
            if crossings.len() < 2 {
                continue;
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if rule.is_inside(winding) {
                    add_span(
                        &mut coverage,
                        pair[0].0 / sheet.pixel_mm,
                        pair[1].0 / sheet.pixel_mm,
                        sample_weight,
                    );
                }
            }
        }

        let row = out.row_mut(y);
        for (px, &c) in row.iter_mut().zip(&coverage) {
            if c >= threshold {
                *px = SET;
            }
        }
    }

    out
}

/// Adds `weight × overlap` to every pixel overlapped by `[a, b)`, in pixel
/// units.
fn add_span(coverage: &mut [f32], a: f64, b: f64, weight: f32) {
    let w = coverage.len() as f64;
    let a = a.clamp(0.0, w);
    let b = b.clamp(0.0, w);
    if b <= a {
        return;
    }

    let first = a.floor() as usize;
    let last = (b.ceil() as usize).min(coverage.len());
    for (i, c) in coverage.iter_mut().enumerate().take(last).skip(first) {
        let lo = a.max(i as f64);
        let hi = b.min(i as f64 + 1.0);
        if hi > lo {
            *c += weight * (hi - lo) as f32;
        }
    }
}

/// Flattens the outline into polygon edges. Every subpath is closed back to
/// its start point, whether or not it ends in `ClosePath`.
fn collect_edges(outline: &BezPath, tolerance_mm: f64) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start: Option<Point> = None;
    let mut last: Option<Point> = None;

    let push = |a: Point, b: Point, edges: &mut Vec<Edge>| {
        if a.y == b.y {
            return;
        }
        let (lo, hi, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        edges.push(Edge {
            x0: lo.x,
            y0: lo.y,
            x1: hi.x,
            y1: hi.y,
            winding,
        });
    };

    kurbo::flatten(outline.elements().iter().copied(), tolerance_mm, |el| match el {
        PathEl::MoveTo(p) => {
            if let (Some(s), Some(l)) = (start, last) {
                push(l, s, &mut edges);
            }
            start = Some(p);
            last = Some(p);
        }
        PathEl::LineTo(p) => {
            if let Some(l) = last {
                push(l, p, &mut edges);
            }
            last = Some(p);
        }
        PathEl::ClosePath => {
            if let (Some(s), Some(l)) = (start, last) {
                push(l, s, &mut edges);
            }
            last = start;
        }
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });

    if let (Some(s), Some(l)) = (start, last) {
        push(l, s, &mut edges);
    }

    edges
}
