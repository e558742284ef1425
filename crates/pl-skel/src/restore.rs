//! Boundary recovery for thinned skeletons.
//!
//! Thinning eats roughly half the stroke width off every branch end and
//! collapses compact blobs to a single pixel. Both steps below add skeleton
//! pixels back along a straight direction, one major-axis step at a time,
//! while the next pixel
//! - lies inside the mask and off the image border,
//! - is not skeleton yet,
//! - touches no skeleton pixel other than the current tip.
//!
//! Dots that cannot grow are removed.

use pl_core::adjacency::{self, DIRS};
use pl_core::{CLEAR, Image, ImageView, SET};
use tracing::debug;

/// Pixels walked back from an endpoint to estimate the branch direction.
const TIP_LOOKBACK: usize = 8;

/// Extends every branch endpoint outward. Returns the pixels added.
pub fn extend_tips(mask: &ImageView<'_, u8>, skel: &mut Image<u8>) -> usize {
    let (w, h) = (skel.width(), skel.height());
    if mask.width() != w || mask.height() != h {
        return 0;
    }

    let occ = skel.data();
    let tips: Vec<usize> = (0..w * h)
        .filter(|&p| occ[p] != 0 && adjacency::link_degree(p, occ, w, h) == 1)
        .collect();

    let mut added = 0;
    for tip in tips {
        let Some(back) = walk_back(skel.data(), w, h, tip) else {
            continue;
        };

        let dx = (tip % w) as f64 - (back % w) as f64;
        let dy = (tip / w) as f64 - (back / w) as f64;
        added += grow_ray(mask, skel, tip, dx, dy);
    }

    added
}

/// Grows isolated skeleton pixels along the principal axis of their mask
/// component. Returns the pixels added.
///
/// A dot whose ray is blocked both ways grows along the first open 8-neighbor
/// direction instead. A dot that shares its component with other skeleton
/// pixels, or cannot grow at all, is removed, so afterwards every skeleton
/// pixel has a set neighbor unless its component is a single pixel.
pub fn expand_dots(mask: &ImageView<'_, u8>, skel: &mut Image<u8>) -> usize {
    let (w, h) = (skel.width(), skel.height());
    if mask.width() != w || mask.height() != h {
        return 0;
    }

    let occ = skel.data();
    let dots: Vec<usize> = (0..w * h)
        .filter(|&p| occ[p] != 0 && adjacency::set_neighbor_count(p, occ, w, h) == 0)
        .collect();

    let mut added = 0;
    let mut dropped = 0;
    for dot in dots {
        let occ = skel.data();
        if occ[dot] == 0 || adjacency::set_neighbor_count(dot, occ, w, h) != 0 {
            continue;
        }

        let component = mask_component(mask, dot);
        if component.len() <= 1 {
            continue;
        }
        if component.iter().any(|&q| q != dot && occ[q] != 0) {
            skel.data_mut()[dot] = CLEAR;
            dropped += 1;
            continue;
        }

        let theta = principal_angle(&component, w);
        let (dx, dy) = (theta.cos(), theta.sin());
        let mut grown = grow_ray(mask, skel, dot, dx, dy) + grow_ray(mask, skel, dot, -dx, -dy);
        if grown == 0 {
            for &dir in &DIRS {
                let dx = adjacency::DX[dir as usize] as f64;
                let dy = adjacency::DY[dir as usize] as f64;
                grown = grow_ray(mask, skel, dot, dx, dy);
                if grown > 0 {
                    grown += grow_ray(mask, skel, dot, -dx, -dy);
                    break;
                }
            }
        }

        if grown == 0 {
            skel.data_mut()[dot] = CLEAR;
            dropped += 1;
        }
        added += grown;
    }

    debug!("dots: added={}, dropped={}", added, dropped);
    added
}

/// Follows the branch from `tip` for up to [`TIP_LOOKBACK`] pixels and
/// returns the last pixel reached, stopping early at junctions.
fn walk_back(occ: &[u8], w: usize, h: usize, tip: usize) -> Option<usize> {
    let mut path = vec![tip];
    let mut cur = tip;

    for _ in 0..TIP_LOOKBACK {
        let mut next = None;
        let mut count = 0;
        for &dir in &DIRS {
            let Some(nb) = adjacency::linked_neighbor(cur, dir, occ, w, h) else {
                continue;
            };
            if path.contains(&nb) {
                continue;
            }
            count += 1;
            next = Some(nb);
        }

        let Some(nb) = next.filter(|_| count == 1) else {
            break;
        };
        path.push(nb);
        cur = nb;
        if adjacency::link_degree(cur, occ, w, h) != 2 {
            break;
        }
    }

    (path.len() > 1).then_some(cur)
}

/// Steps from `anchor` along `(dx, dy)` and sets every accepted pixel.
fn grow_ray(
    mask: &ImageView<'_, u8>,
    skel: &mut Image<u8>,
    anchor: usize,
    dx: f64,
    dy: f64,
) -> usize {
    let (w, h) = (skel.width(), skel.height());
    let major = dx.abs().max(dy.abs());
    if !(major.is_finite() && major > 0.0) {
        return 0;
    }
    let (sx, sy) = (dx / major, dy / major);
    let (ax, ay) = ((anchor % w) as f64, (anchor / w) as f64);

    let mut cur = anchor;
    let mut added = 0;
    for t in 1..=w.max(h) {
        let x = (ax + sx * t as f64 + 0.5).floor();
        let y = (ay + sy * t as f64 + 0.5).floor();
        if x < 1.0 || y < 1.0 || x >= (w - 1) as f64 || y >= (h - 1) as f64 {
            break;
        }

        let q = y as usize * w + x as usize;
        if !mask.is_set(x as isize, y as isize) || skel.data()[q] != 0 {
            break;
        }
        let crowded = DIRS
            .iter()
            .filter_map(|&dir| adjacency::neighbor_index(q, dir, w, h))
            .any(|nb| nb != cur && skel.data()[nb] != 0);
        if crowded {
            break;
        }

        skel.data_mut()[q] = SET;
        cur = q;
        added += 1;
    }

    added
}

/// 8-connected mask component containing `seed`, as linear indices.
fn mask_component(mask: &ImageView<'_, u8>, seed: usize) -> Vec<usize> {
    let (w, h) = (mask.width(), mask.height());
    let set = |p: usize| mask.is_set((p % w) as isize, (p / w) as isize);
    if !set(seed) {
        return vec![seed];
    }

    let mut seen = vec![false; w * h];
    let mut stack = vec![seed];
    let mut component = Vec::new();
    seen[seed] = true;

    while let Some(p) = stack.pop() {
        component.push(p);
        for &dir in &DIRS {
            let Some(nb) = adjacency::neighbor_index(p, dir, w, h) else {
                continue;
            };
            if !seen[nb] && set(nb) {
                seen[nb] = true;
                stack.push(nb);
            }
        }
    }

    component
}

/// Orientation of the principal axis from second moments. An isotropic
/// component resolves to `0` (horizontal).
fn principal_angle(component: &[usize], w: usize) -> f64 {
    let n = component.len() as i128;
    let (mut sx, mut sy, mut sxx, mut syy, mut sxy) = (0i128, 0i128, 0i128, 0i128, 0i128);
    for &p in component {
        let (x, y) = ((p % w) as i128, (p / w) as i128);
        sx += x;
        sy += y;
        sxx += x * x;
        syy += y * y;
        sxy += x * y;
    }

    let cxx = n * sxx - sx * sx;
    let cyy = n * syy - sy * sy;
    let cxy = n * sxy - sx * sy;
    0.5 * (2.0 * cxy as f64).atan2((cxx - cyy) as f64)
}

#[cfg(test)]
mod tests {
    use pl_core::{Image, SET};

    use super::{expand_dots, extend_tips, principal_angle};

    fn skeleton_with(w: usize, h: usize, pixels: &[(usize, usize)]) -> Image<u8> {
        let mut img = Image::new_fill(w, h, 0u8);
        for &(x, y) in pixels {
            *img.get_mut(x, y).expect("in-bounds pixel") = SET;
        }
        img
    }

    #[test]
    fn tips_extend_to_the_mask_boundary() {
        let mask = Image::binary_from_fn(30, 9, |x, y| (2..=27).contains(&x) && (2..=6).contains(&y));
        let line: Vec<(usize, usize)> = (6..=23).map(|x| (x, 4)).collect();
        let mut skel = skeleton_with(30, 9, &line);

        let added = extend_tips(&mask.as_view(), &mut skel);

        assert_eq!(added, 8);
        assert_eq!(skel.get(2, 4), Some(&SET));
        assert_eq!(skel.get(27, 4), Some(&SET));
        assert_eq!(skel.get(1, 4), Some(&0));
        assert_eq!(skel.as_view().count_set(), 26);
    }

    #[test]
    fn tips_stop_next_to_other_branches() {
        let mask = Image::binary_from_fn(20, 12, |x, y| (1..=18).contains(&x) && (1..=10).contains(&y));
        // Horizontal branch aimed at a vertical one two pixels away.
        let mut pixels: Vec<(usize, usize)> = (3..=8).map(|x| (x, 5)).collect();
        pixels.extend((2..=9).map(|y| (11, y)));
        let mut skel = skeleton_with(20, 12, &pixels);

        extend_tips(&mask.as_view(), &mut skel);

        assert_eq!(skel.get(9, 5), Some(&SET));
        assert_eq!(skel.get(10, 5), Some(&0));
    }

    #[test]
    fn square_dot_grows_horizontally() {
        let mask = Image::binary_from_fn(15, 15, |x, y| (3..=11).contains(&x) && (3..=11).contains(&y));
        let mut skel = skeleton_with(15, 15, &[(7, 7)]);

        let added = expand_dots(&mask.as_view(), &mut skel);

        assert_eq!(added, 8);
        for x in 3..=11 {
            assert_eq!(skel.get(x, 7), Some(&SET), "x={x}");
        }
    }

    #[test]
    fn tall_dot_grows_vertically() {
        let mask = Image::binary_from_fn(15, 15, |x, y| (6..=8).contains(&x) && (2..=12).contains(&y));
        let mut skel = skeleton_with(15, 15, &[(7, 7)]);

        expand_dots(&mask.as_view(), &mut skel);

        assert_eq!(skel.get(7, 2), Some(&SET));
        assert_eq!(skel.get(7, 12), Some(&SET));
        assert_eq!(skel.get(6, 7), Some(&0));
    }

    #[test]
    fn single_pixel_components_stay_dots() {
        let mask = Image::binary_from_fn(7, 7, |x, y| x == 3 && y == 3);
        let mut skel = mask.clone();
        assert_eq!(expand_dots(&mask.as_view(), &mut skel), 0);
        assert_eq!(skel, mask);
    }

    #[test]
    fn blocked_axis_falls_back_to_an_open_neighbor() {
        // L-tromino: the principal axis is diagonal and leaves the mask.
        let tromino = [(7, 8), (8, 8), (8, 7)];
        let mask = skeleton_with(12, 12, &tromino);
        let mut skel = skeleton_with(12, 12, &[(8, 8)]);

        assert_eq!(expand_dots(&mask.as_view(), &mut skel), 1);
        assert_eq!(skel.get(7, 8), Some(&SET));
        assert_eq!(skel.as_view().count_set(), 2);
    }

    #[test]
    fn dots_sharing_a_component_are_dropped() {
        let mask = Image::binary_from_fn(20, 10, |x, y| (2..=17).contains(&x) && (2..=7).contains(&y));
        let mut pixels: Vec<(usize, usize)> = (5..=14).map(|x| (x, 5)).collect();
        pixels.push((16, 3));
        let mut skel = skeleton_with(20, 10, &pixels);

        assert_eq!(expand_dots(&mask.as_view(), &mut skel), 0);
        assert_eq!(skel.get(16, 3), Some(&0));
        assert_eq!(skel.as_view().count_set(), 10);
    }

    #[test]
    fn dots_that_cannot_grow_are_dropped() {
        // The only other mask pixel sits on the image border.
        let mask = skeleton_with(6, 6, &[(0, 3), (1, 3)]);
        let mut skel = skeleton_with(6, 6, &[(1, 3)]);

        assert_eq!(expand_dots(&mask.as_view(), &mut skel), 0);
        assert_eq!(skel.as_view().count_set(), 0);
    }

    #[test]
    fn principal_angle_of_diagonal_run() {
        let w = 10;
        let component: Vec<usize> = (0..6).map(|i| i * w + i).collect();
        let theta = principal_angle(&component, w);
        assert!((theta - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }
}
