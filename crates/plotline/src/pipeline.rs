use kurbo::BezPath;
use pl_core::{Error, Image, Sheet, Stroke};
use pl_morph::{close_binary_u8, closing_radius_px};
use pl_polish::{PolishConfig, polish_strokes};
use pl_raster::{RasterConfig, rasterize};
use pl_route::{RouteConfig, plan_route};
use pl_skel::{Skeleton, SkeletonConfig, skeletonize};
use pl_trace::{TraceConfig, trace_skeleton};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub raster: RasterConfig,
    /// Gap width bridged by morphological closing; `0` disables closing.
    pub closing_mm: f64,
    pub skeleton: SkeletonConfig,
    pub trace: TraceConfig,
    pub polish: PolishConfig,
    pub route: RouteConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raster: RasterConfig::default(),
            closing_mm: 0.0,
            skeleton: SkeletonConfig::default(),
            trace: TraceConfig::default(),
            polish: PolishConfig::default(),
            route: RouteConfig::default(),
        }
    }
}

/// Every intermediate artifact of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedResult {
    pub mask: Image<u8>,
    /// Present only when closing ran with a non-zero radius.
    pub closed: Option<Image<u8>>,
    pub skeleton: Skeleton,
    pub traced: Vec<Stroke>,
    pub polished: Vec<Stroke>,
    pub strokes: Vec<Stroke>,
}

impl StagedResult {
    /// Mask the skeleton was extracted from.
    pub fn skeleton_input(&self) -> &Image<u8> {
        self.closed.as_ref().unwrap_or(&self.mask)
    }
}

/// Runs every stage and keeps the intermediate artifacts.
pub fn run_staged(
    outline: &BezPath,
    sheet: &Sheet,
    cfg: &PipelineConfig,
) -> Result<StagedResult, Error> {
    let mask = rasterize(outline, sheet, &cfg.raster)?;

    let radius = closing_radius_px(cfg.closing_mm, sheet.pixel_mm);
    let closed = if radius > 0 {
        let closed = close_binary_u8(&mask.as_view(), radius);
        debug!(
            "closing: gap_mm={}, radius_px={}, pixels {} -> {}",
            cfg.closing_mm,
            radius,
            mask.as_view().count_set(),
            closed.as_view().count_set()
        );
        Some(closed)
    } else {
        None
    };

    let source = closed.as_ref().unwrap_or(&mask);
    let skeleton = skeletonize(&source.as_view(), &cfg.skeleton)?;
    let traced = trace_skeleton(&skeleton.mask.as_view(), sheet, &cfg.trace)?;
    let polished = polish_strokes(&traced, &cfg.polish);
    let strokes = plan_route(&polished, &cfg.route);

    debug!(
        "pipeline: traced={}, polished_points={}, strokes={}",
        traced.len(),
        polished.iter().map(Stroke::len).sum::<usize>(),
        strokes.len()
    );

    Ok(StagedResult {
        mask,
        closed,
        skeleton,
        traced,
        polished,
        strokes,
    })
}

/// Converts a filled outline into ordered centerline strokes.
pub fn centerline_strokes(
    outline: &BezPath,
    sheet: &Sheet,
    cfg: &PipelineConfig,
) -> Result<Vec<Stroke>, Error> {
    run_staged(outline, sheet, cfg).map(|staged| staged.strokes)
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Shape};
    use pl_core::{Error, Sheet};

    use super::{PipelineConfig, centerline_strokes, run_staged};

    #[test]
    fn closing_is_skipped_at_zero_gap() {
        let sheet = Sheet::new(6.0, 4.0, 0.1).expect("valid sheet");
        let outline = Rect::new(1.0, 1.5, 5.0, 2.5).to_path(0.01);

        let staged = run_staged(&outline, &sheet, &PipelineConfig::default()).expect("pipeline");
        assert!(staged.closed.is_none());
        assert_eq!(staged.skeleton_input(), &staged.mask);
        assert_eq!(staged.strokes.len(), 1);
    }

    #[test]
    fn closing_bridges_a_split_bar() {
        let sheet = Sheet::new(8.0, 4.0, 0.1).expect("valid sheet");
        let mut outline = Rect::new(1.0, 1.0, 3.9, 3.0).to_path(0.01);
        outline.extend(Rect::new(4.1, 1.0, 7.0, 3.0).to_path(0.01).elements().iter().copied());

        let open = run_staged(&outline, &sheet, &PipelineConfig::default()).expect("pipeline");
        assert_eq!(open.traced.len(), 2);

        let cfg = PipelineConfig {
            closing_mm: 0.4,
            ..PipelineConfig::default()
        };
        let closed = run_staged(&outline, &sheet, &cfg).expect("pipeline");
        assert!(closed.closed.is_some());
        assert_eq!(closed.traced.len(), 1);
    }

    #[test]
    fn errors_propagate_from_stages() {
        let sheet = Sheet::new(5.0, 5.0, 0.1).expect("valid sheet");
        let off_sheet = Rect::new(10.0, 10.0, 12.0, 12.0).to_path(0.01);

        assert_eq!(
            centerline_strokes(&off_sheet, &sheet, &PipelineConfig::default()),
            Err(Error::EmptyRaster)
        );
    }
}
