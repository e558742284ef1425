//! Vector outline to occupancy mask.
//!
//! The outline is a `kurbo::BezPath` already positioned in millimeters on a
//! [`Sheet`]. A pixel is foreground when its center lies inside the filled
//! region. Two strategies are provided:
//! - [`RasterMethod::Contains`]: analytic winding number at each pixel center.
//! - [`RasterMethod::Render`]: scan conversion of the flattened outline with a
//!   coverage threshold.
//!
//! Both agree on simple, non-self-intersecting contours (up to pixels whose
//! center sits within the flatten tolerance of the boundary). On overlapping
//! or self-intersecting contours they may differ; that is accepted.

mod contains;
mod scan;

use kurbo::{BezPath, PathEl, Shape};
use pl_core::{Error, Image, Sheet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterMethod {
    Contains,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::EvenOdd => winding % 2 != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    pub method: RasterMethod,
    pub fill_rule: FillRule,
    /// Minimum covered fraction for [`RasterMethod::Render`].
    pub coverage_threshold: f32,
    /// Sub-scanlines per pixel row for [`RasterMethod::Render`].
    pub supersample: usize,
    pub flatten_tolerance_mm: f64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            method: RasterMethod::Render,
            fill_rule: FillRule::NonZero,
            coverage_threshold: 0.5,
            supersample: 4,
            flatten_tolerance_mm: 0.01,
        }
    }
}

/// Rasterizes `outline` onto the sheet grid.
///
/// Returns a binary `0` / `255` mask with row 0 at the bottom of the sheet.
/// Fails with [`Error::DegenerateInput`] for an invalid sheet or an outline
/// with zero extent or zero enclosed area, and with [`Error::EmptyRaster`] when no pixel is set.
pub fn rasterize(
    outline: &BezPath,
    sheet: &Sheet,
    cfg: &RasterConfig,
) -> Result<Image<u8>, Error> {
    sheet.validate()?;
    if outline.elements().is_empty() {
        return Err(Error::DegenerateInput);
    }

    let bbox = outline.bounding_box();
    if !(bbox.width().is_finite() && bbox.height().is_finite())
        || bbox.width() <= 0.0
        || bbox.height() <= 0.0
    {
        return Err(Error::DegenerateInput);
    }
    if enclosed_area(outline) <= 1e-9 * bbox.area() {
        return Err(Error::DegenerateInput);
    }

    let mask = match cfg.method {
        RasterMethod::Contains => {
            contains::mask_by_containment(&close_subpaths(outline), sheet, cfg.fill_rule)
        }
        RasterMethod::Render => scan::mask_by_scan(
            outline,
            sheet,
            cfg.fill_rule,
            cfg.flatten_tolerance_mm.max(1e-6),
            cfg.supersample,
            cfg.coverage_threshold,
        ),
    };

    let set = mask.as_view().count_set();
    let fill_ratio = if mask.is_empty() {
        0.0
    } else {
        set as f64 / mask.len() as f64
    };
    debug!(
        "raster ({:?}): pixel_mm={}, size_px=({}x{}), fill_ratio={:.4}",
        cfg.method,
        sheet.pixel_mm,
        mask.width(),
        mask.height(),
        fill_ratio
    );

    if set == 0 {
        return Err(Error::EmptyRaster);
    }
    Ok(mask)
}

/// Returns a copy of `outline` where every subpath ends in `ClosePath`, so
/// that winding queries see the implicit closing edge.
fn close_subpaths(outline: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut open = false;

    for &el in outline.elements() {
        match el {
            PathEl::MoveTo(_) => {
                if open {
                    out.push(PathEl::ClosePath);
                }
                open = true;
            }
            PathEl::ClosePath => open = false,
            _ => {}
        }
        out.push(el);
    }
    if open {
        out.push(PathEl::ClosePath);
    }

    out
}

/// Sum of absolute areas of the subpaths, each taken as closed.
fn enclosed_area(outline: &BezPath) -> f64 {
    let mut total = 0.0;
    let mut sub = BezPath::new();
    for &el in close_subpaths(outline).elements() {
        if matches!(el, PathEl::MoveTo(_)) && !sub.elements().is_empty() {
            total += sub.area().abs();
            sub = BezPath::new();
        }
        sub.push(el);
    }
    total + sub.area().abs()
}
