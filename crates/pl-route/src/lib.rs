//! Route planning over polished strokes.
//!
//! Passes run in a fixed order, each returning a new list:
//! 1. [`reorder_strokes`]: greedy nearest-next ordering with a direction bias.
//! 2. [`force_left_to_right`]: optional per-stroke orientation.
//! 3. [`stitch_strokes`]: join strokes whose ends nearly touch.
//! 4. [`bridge_strokes`]: join across wider gaps with the pen down.
//!
//! The [`export`] module turns the final order into an in-memory pen command
//! stream.

pub mod export;
mod orient;
mod reorder;
mod stitch;

use pl_core::Stroke;
use tracing::debug;

pub use export::{ExportConfig, PlotCmd, resample_polyline, to_plot_cmds};
pub use orient::force_left_to_right;
pub use reorder::{RouteBias, reorder_strokes};
pub use stitch::{bridge_strokes, stitch_strokes};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    /// `None` keeps the traced order.
    pub bias: Option<RouteBias>,
    pub force_left_to_right: bool,
    /// `0` disables stitching.
    pub stitch_mm: f64,
    /// `0` disables bridging.
    pub bridge_mm: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            bias: Some(RouteBias::LeftToRight { left_penalty: 0.0 }),
            force_left_to_right: false,
            stitch_mm: 0.0,
            bridge_mm: 0.0,
        }
    }
}

/// Runs the enabled passes: reorder, force orientation, stitch, bridge.
pub fn plan_route(strokes: &[Stroke], cfg: &RouteConfig) -> Vec<Stroke> {
    let mut out = match &cfg.bias {
        Some(bias) => reorder_strokes(strokes, bias),
        None => strokes.to_vec(),
    };
    if cfg.force_left_to_right {
        out = force_left_to_right(&out);
    }
    out = stitch_strokes(&out, cfg.stitch_mm);
    out = bridge_strokes(&out, cfg.bridge_mm);

    debug!("route: strokes_in={}, strokes_out={}", strokes.len(), out.len());
    out
}

/// Total pen-up distance between consecutive strokes.
pub fn travel_length(strokes: &[Stroke]) -> f64 {
    strokes
        .windows(2)
        .filter_map(|w| Some(w[0].last()?.distance(w[1].first()?)))
        .sum()
}
