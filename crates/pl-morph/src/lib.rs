//! Binary morphology with a square structuring element of Chebyshev radius `r`.
//!
//! Pixels are treated as binary with threshold `> 0`.
//! Outputs are `0` or `255` in `u8`.
//!
//! Dilation treats pixels outside the image as unset; erosion is its dual, so
//! outside pixels count as set there. Both run as a row pass followed by a
//! column pass over a running window, independent of `r`.

use pl_core::{CLEAR, Image, ImageView, SET};

/// Closing radius in pixels for a gap of `gap_mm` on a grid of `pixel_mm`.
///
/// Returns 0 for non-positive or non-finite input.
pub fn closing_radius_px(gap_mm: f64, pixel_mm: f64) -> usize {
    if !(gap_mm.is_finite() && pixel_mm.is_finite()) || gap_mm <= 0.0 || pixel_mm <= 0.0 {
        return 0;
    }

    let r = (gap_mm / pixel_mm).ceil();
    if r.is_finite() && r >= 0.0 { r as usize } else { 0 }
}

pub fn dilate_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    let (w, h) = (src.width(), src.height());
    let mut out = src.to_binary();
    if radius == 0 || w == 0 || h == 0 {
        return out;
    }

    let mut line = Vec::with_capacity(w.max(h));

    for y in 0..h {
        line.clear();
        line.extend(out.row(y).iter().map(|&v| v != 0));
        let row = out.row_mut(y);
        dilate_line(&line, radius, |i, set| row[i] = if set { SET } else { CLEAR });
    }

    for x in 0..w {
        line.clear();
        line.extend((0..h).map(|y| out.data()[y * w + x] != 0));
        let data = out.data_mut();
        dilate_line(&line, radius, |i, set| {
            data[i * w + x] = if set { SET } else { CLEAR }
        });
    }

    out
}

pub fn erode_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    if radius == 0 {
        return src.to_binary();
    }

    let inverted = src.complement();
    let dilated = dilate_binary_u8(&inverted.as_view(), radius);
    dilated.as_view().complement()
}

pub fn close_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    let dilated = dilate_binary_u8(src, radius);
    erode_binary_u8(&dilated.as_view(), radius)
}

pub fn open_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    let eroded = erode_binary_u8(src, radius);
    dilate_binary_u8(&eroded.as_view(), radius)
}

/// 1D dilation of `line` by `radius`, reporting each output through `write`.
///
/// Keeps a count of set cells inside the window `[i - r, i + r]`.
fn dilate_line(line: &[bool], radius: usize, mut write: impl FnMut(usize, bool)) {
    let n = line.len();
    let mut count = line[..radius.min(n)].iter().filter(|&&v| v).count();

    for i in 0..n {
        let enter = i + radius;
        if enter < n && line[enter] {
            count += 1;
        }
        if i > radius && line[i - radius - 1] {
            count -= 1;
        }
        write(i, count > 0);
    }
}
