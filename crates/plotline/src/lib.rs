//! Umbrella crate for the `plotline` workspace.
//!
//! A glyph outline in millimeters goes through
//! rasterize → close → skeletonize → trace → polish → route and comes out as
//! an ordered list of single-line strokes for a pen plotter. Each stage lives
//! in its own crate and is re-exported here; [`centerline_strokes`] chains
//! them with a [`PipelineConfig`].

mod pipeline;

pub use pipeline::{PipelineConfig, StagedResult, centerline_strokes, run_staged};

pub use pl_core::*;
pub use pl_morph::{
    close_binary_u8, closing_radius_px, dilate_binary_u8, erode_binary_u8, open_binary_u8,
};
pub use pl_polish::{PolishConfig, chaikin_smooth, polish_strokes, rdp_simplify};
pub use pl_raster::{FillRule, RasterConfig, RasterMethod, rasterize};
pub use pl_route::{
    ExportConfig, PlotCmd, RouteBias, RouteConfig, plan_route, to_plot_cmds, travel_length,
};
pub use pl_skel::{Skeleton, SkeletonConfig, SkeletonMethod, skeletonize};
pub use pl_trace::{
    PixelKind, SkeletonTopology, TraceConfig, TracePolicy, skeleton_topology, trace_skeleton,
};
