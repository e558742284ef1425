//! Skeleton pixel graph to millimeter strokes.
//!
//! The skeleton is read as an implicit graph: set pixels are nodes, linked
//! 8-neighbors are edges (see [`pl_core::adjacency`]). A pixel's degree gives
//! its role:
//! - 0: isolated,
//! - 1: endpoint,
//! - 2: regular chain pixel,
//! - 3 or more: junction.
//!
//! Two tracing policies are available:
//! - [`TracePolicy::Segment`]: one stroke per chain between endpoints and
//!   junctions, short strokes discarded.
//! - [`TracePolicy::SingleWalk`]: one stroke covering every link, with
//!   greedy nearest jumps between disconnected pieces.
//!
//! Pixel centers map to millimeters through [`Sheet::cell_center`].

mod graph;
mod segments;
mod walk;

use pl_core::{Error, ImageView, Point2, Sheet, Stroke};
use tracing::debug;

pub use graph::{PixelDegrees, PixelKind, SkeletonTopology, skeleton_topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePolicy {
    Segment,
    SingleWalk,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    pub policy: TracePolicy,
    /// Segment strokes shorter than this are discarded.
    pub min_stroke_mm: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            policy: TracePolicy::Segment,
            min_stroke_mm: 0.8,
        }
    }
}

/// Traces `skel` into strokes positioned on `sheet`.
///
/// Fails with [`Error::NoUsableStrokes`] when nothing survives.
pub fn trace_skeleton(
    skel: &ImageView<'_, u8>,
    sheet: &Sheet,
    cfg: &TraceConfig,
) -> Result<Vec<Stroke>, Error> {
    let g = PixelDegrees::new(skel);
    let topo = g.topology();
    debug!(
        "trace ({:?}): pixels={}, endpoints={}, junction_pixels={}, isolated={}",
        cfg.policy, topo.pixels, topo.endpoints, topo.junctions, topo.isolated
    );

    let to_stroke = |pixels: &[usize]| {
        Stroke::new(
            pixels
                .iter()
                .map(|&p| {
                    let (x, y) = g.xy(p);
                    sheet.cell_center(x, y)
                })
                .collect::<Vec<Point2>>(),
        )
    };

    let strokes = match cfg.policy {
        TracePolicy::Segment => {
            let walks = segments::trace_segments(&g);
            let raw = walks.len();
            let kept: Vec<Stroke> = walks
                .iter()
                .map(|w| to_stroke(w))
                .filter(|s| s.arc_length() >= cfg.min_stroke_mm)
                .collect();
            debug!(
                "trace strokes: raw={}, kept={}, dropped={}, min_stroke_mm={}",
                raw,
                kept.len(),
                raw - kept.len(),
                cfg.min_stroke_mm
            );
            kept
        }
        TracePolicy::SingleWalk => {
            let path = walk::trace_single_walk(&g);
            debug!("single walk: path_pixels={}", path.len());
            if path.len() >= 2 {
                vec![to_stroke(&path)]
            } else {
                Vec::new()
            }
        }
    };

    if strokes.is_empty() {
        return Err(Error::NoUsableStrokes);
    }
    Ok(strokes)
}
