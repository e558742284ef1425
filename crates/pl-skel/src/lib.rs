//! One-pixel-wide skeletons of binary occupancy masks.
//!
//! Two extraction methods share the same output contract (a `0` / `255` mask
//! that is a subset of the input, with a clear 1-pixel border):
//! - [`SkeletonMethod::Thinning`]: bounded Zhang–Suen thinning.
//! - [`SkeletonMethod::Ridge`]: local maxima of a 3-4 chamfer distance field,
//!   thinned afterwards when `max_thin_iter > 0`.
//!
//! Thinning shortens branches and reduces compact blobs to dots; the optional
//! recovery steps in [`restore`] grow them back inside the mask.

mod distance;
pub mod restore;
mod ridge;
mod thin;

use pl_core::{Error, Image, ImageView};
use tracing::debug;

pub use distance::{AXIS_STEP, DIAGONAL_STEP, chamfer_distance};
pub use ridge::ridge_from_distance;
pub use thin::{Thinning, thin_zhang_suen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonMethod {
    Thinning,
    /// Pixels outside the image count as background, so glyphs touching the
    /// sheet edge still have a ridge.
    Ridge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonConfig {
    pub method: SkeletonMethod,
    pub max_thin_iter: usize,
    /// Grow branch endpoints back toward the mask boundary.
    pub extend_tips: bool,
    /// Grow isolated pixels of multi-pixel components along their long axis,
    /// dropping those that cannot grow or duplicate another skeleton piece.
    pub expand_dots: bool,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            method: SkeletonMethod::Thinning,
            max_thin_iter: 300,
            extend_tips: true,
            expand_dots: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub mask: Image<u8>,
    /// Chamfer distance field, kept by [`SkeletonMethod::Ridge`].
    pub distance: Option<Image<u32>>,
    pub thin_iterations: usize,
}

/// Extracts the skeleton of `mask`.
///
/// Fails with [`Error::SkeletonCollapse`] when no pixel survives.
pub fn skeletonize(mask: &ImageView<'_, u8>, cfg: &SkeletonConfig) -> Result<Skeleton, Error> {
    let (mut skel, distance, thin_iterations) = match cfg.method {
        SkeletonMethod::Thinning => {
            let t = thin_zhang_suen(mask, cfg.max_thin_iter);
            (t.mask, None, t.iterations)
        }
        SkeletonMethod::Ridge => {
            let dist = chamfer_distance(mask);
            let ridge = ridge_from_distance(mask, &dist);
            debug!("ridge: pixels={}", ridge.as_view().count_set());
            if cfg.max_thin_iter > 0 {
                let t = thin_zhang_suen(&ridge.as_view(), cfg.max_thin_iter);
                (t.mask, Some(dist), t.iterations)
            } else {
                (ridge, Some(dist), 0)
            }
        }
    };

    let thinned = skel.as_view().count_set();
    let tips = if cfg.extend_tips {
        restore::extend_tips(mask, &mut skel)
    } else {
        0
    };
    let dots = if cfg.expand_dots {
        restore::expand_dots(mask, &mut skel)
    } else {
        0
    };

    let pixels = skel.as_view().count_set();
    debug!(
        "skeleton ({:?}): iterations={}, thinned={}, tip_pixels={}, dot_pixels={}, pixels={}",
        cfg.method, thin_iterations, thinned, tips, dots, pixels
    );

    if pixels == 0 {
        return Err(Error::SkeletonCollapse);
    }

    Ok(Skeleton {
        mask: skel,
        distance,
        thin_iterations,
    })
}

#[cfg(test)]
mod tests {
    use pl_core::adjacency::link_degree;
    use pl_core::{Error, Image};

    use crate::{SkeletonConfig, SkeletonMethod, skeletonize};

    fn l_glyph() -> Image<u8> {
        // 0.1 mm grid: vertical bar 2 x 10 mm plus horizontal bar 6 x 2 mm.
        Image::binary_from_fn(80, 120, |x, y| (x < 20 && y < 100) || (x < 60 && y < 20))
    }

    fn degrees(skel: &Image<u8>) -> (usize, usize) {
        let (w, h) = (skel.width(), skel.height());
        let occ = skel.data();
        let mut ends = 0;
        let mut junctions = 0;
        for p in 0..occ.len() {
            if occ[p] == 0 {
                continue;
            }
            match link_degree(p, occ, w, h) {
                1 => ends += 1,
                d if d >= 3 => junctions += 1,
                _ => {}
            }
        }
        (ends, junctions)
    }

    fn is_subset(a: &Image<u8>, b: &Image<u8>) -> bool {
        a.data().iter().zip(b.data()).all(|(&x, &y)| x == 0 || y != 0)
    }

    #[test]
    fn l_glyph_is_a_single_branch() {
        let mask = l_glyph();
        let skel = skeletonize(&mask.as_view(), &SkeletonConfig::default()).expect("skeleton");

        assert!(skel.distance.is_none());
        assert!(skel.thin_iterations > 0);
        assert!(is_subset(&skel.mask, &mask));
        assert_eq!(degrees(&skel.mask), (2, 0));
        assert_eq!(skel.mask.get(59, 10), Some(&255));
        assert_eq!(skel.mask.get(10, 99), Some(&255));
    }

    #[test]
    fn recovery_can_be_disabled() {
        let mask = l_glyph();
        let cfg = SkeletonConfig {
            extend_tips: false,
            expand_dots: false,
            ..SkeletonConfig::default()
        };
        let skel = skeletonize(&mask.as_view(), &cfg).expect("skeleton");

        assert_eq!(skel.mask.get(59, 10), Some(&0));
        assert_eq!(skel.mask.get(10, 99), Some(&0));
    }

    #[test]
    fn square_becomes_a_horizontal_line() {
        let mask = Image::binary_from_fn(50, 30, |x, y| (10..40).contains(&x) && (5..25).contains(&y));
        let skel = skeletonize(&mask.as_view(), &SkeletonConfig::default()).expect("skeleton");

        let rows: Vec<usize> = (0..30)
            .filter(|&y| (0..50).any(|x| skel.mask.get(x, y) == Some(&255)))
            .collect();
        assert_eq!(rows.len(), 1, "{rows:?}");
        assert!(skel.mask.as_view().count_set() >= 28);
    }

    #[test]
    fn ridge_handles_glyphs_on_the_image_edge() {
        let mask = l_glyph();
        let cfg = SkeletonConfig {
            method: SkeletonMethod::Ridge,
            ..SkeletonConfig::default()
        };
        let skel = skeletonize(&mask.as_view(), &cfg).expect("ridge skeleton");

        let dist = skel.distance.as_ref().expect("ridge keeps distance");
        assert_eq!(dist.get(0, 50), Some(&3));
        assert!(is_subset(&skel.mask, &mask));
        assert!(skel.mask.as_view().count_set() > 100);
    }

    #[test]
    fn ridge_keeps_distance_field() {
        let mask = Image::binary_from_fn(40, 12, |x, y| (2..38).contains(&x) && (2..9).contains(&y));
        let cfg = SkeletonConfig {
            method: SkeletonMethod::Ridge,
            ..SkeletonConfig::default()
        };
        let skel = skeletonize(&mask.as_view(), &cfg).expect("skeleton");

        let dist = skel.distance.expect("ridge keeps distance");
        assert_eq!(dist.get(0, 0), Some(&0));
        assert_eq!(dist.get(5, 5), Some(&12));
        assert_eq!(degrees(&skel.mask), (2, 0));
    }

    #[test]
    fn empty_mask_collapses() {
        let mask = Image::new_fill(10, 10, 0u8);
        assert_eq!(
            skeletonize(&mask.as_view(), &SkeletonConfig::default()),
            Err(Error::SkeletonCollapse)
        );

        // Everything lies on the cleared border.
        let thin = Image::binary_from_fn(10, 10, |x, _| x == 0);
        assert_eq!(
            skeletonize(&thin.as_view(), &SkeletonConfig::default()),
            Err(Error::SkeletonCollapse)
        );
    }
}
