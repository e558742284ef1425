use pl_core::{Image, ImageView};

/// Chamfer weight for an axis step.
pub const AXIS_STEP: u32 = 3;
/// Chamfer weight for a diagonal step.
pub const DIAGONAL_STEP: u32 = 4;

/// 3-4 chamfer distance from each foreground pixel to the nearest background
/// pixel.
///
/// Background pixels read 0. Pixels outside the image count as background,
/// so foreground on the image border starts at [`AXIS_STEP`].
pub fn chamfer_distance(mask: &ImageView<'_, u8>) -> Image<u32> {
    let (w, h) = (mask.width(), mask.height());
    let mut dist = Image::new_fill(w, h, 0u32);
    for y in 0..h {
        let on_edge_row = y == 0 || y + 1 == h;
        for (x, (&v, out)) in mask.row(y).iter().zip(dist.row_mut(y)).enumerate() {
            if v != 0 {
                *out = if on_edge_row || x == 0 || x + 1 == w {
                    AXIS_STEP
                } else {
                    u32::MAX
                };
            }
        }
    }
    let d = dist.data_mut();

    // Forward: previous row and left neighbor.
    for y in 0..h {
        for x in 0..w {
            let p = y * w + x;
            if d[p] == 0 {
                continue;
            }

            let mut best = d[p];
            if x > 0 {
                best = best.min(d[p - 1].saturating_add(AXIS_STEP));
            }
            if y > 0 {
                let up = p - w;
                best = best.min(d[up].saturating_add(AXIS_STEP));
                if x > 0 {
                    best = best.min(d[up - 1].saturating_add(DIAGONAL_STEP));
                }
                if x + 1 < w {
                    best = best.min(d[up + 1].saturating_add(DIAGONAL_STEP));
                }
            }
            d[p] = best;
        }
    }

    // Backward: next row and right neighbor.
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let p = y * w + x;
            if d[p] == 0 {
                continue;
            }

            let mut best = d[p];
            if x + 1 < w {
                best = best.min(d[p + 1].saturating_add(AXIS_STEP));
            }
            if y + 1 < h {
                let down = p + w;
                best = best.min(d[down].saturating_add(AXIS_STEP));
                if x + 1 < w {
                    best = best.min(d[down + 1].saturating_add(DIAGONAL_STEP));
                }
                if x > 0 {
                    best = best.min(d[down - 1].saturating_add(DIAGONAL_STEP));
                }
            }
            d[p] = best;
        }
    }

    dist
}
