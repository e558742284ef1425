use kurbo::{BezPath, Point, Shape};
use pl_core::{Image, Sheet};

use crate::FillRule;

/// Marks every pixel whose center lies inside `outline` by its winding
/// number. Pixels outside the outline's bounding box are skipped without a
/// winding query.
pub(crate) fn mask_by_containment(outline: &BezPath, sheet: &Sheet, rule: FillRule) -> Image<u8> {
    let (width, height) = sheet.grid_size();
    let bbox = outline.bounding_box();

    Image::binary_from_fn(width, height, |x, y| {
        let p = Point::new(
            (x as f64 + 0.5) * sheet.pixel_mm,
            (y as f64 + 0.5) * sheet.pixel_mm,
        );
        if p.x < bbox.x0 || p.x > bbox.x1 || p.y < bbox.y0 || p.y > bbox.y1 {
            return false;
        }
        rule.is_inside(outline.winding(p))
    })
}
