use pl_core::{Image, ImageView, adjacency};

/// Local maxima of `dist` over the interior of `mask`.
///
/// A pixel qualifies when it is set, off the image border, has `d > 0` and
/// `d` is no smaller than any of its 8 neighbors.
pub fn ridge_from_distance(mask: &ImageView<'_, u8>, dist: &Image<u32>) -> Image<u8> {
    let (w, h) = (mask.width(), mask.height());
    if dist.width() != w || dist.height() != h {
        return Image::new_fill(w, h, 0);
    }

    let d = dist.data();
    Image::binary_from_fn(w, h, |x, y| {
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return false;
        }
        if !mask.is_set(x as isize, y as isize) {
            return false;
        }

        let p = y * w + x;
        d[p] > 0
            && adjacency::DIRS
                .iter()
                .filter_map(|&dir| adjacency::neighbor_index(p, dir, w, h))
                .all(|nb| d[p] >= d[nb])
    })
}

#[cfg(test)]
mod tests {
    use pl_core::Image;

    use super::ridge_from_distance;
    use crate::chamfer_distance;

    #[test]
    fn ridge_of_odd_bar_is_its_middle_row() {
        let mask = Image::binary_from_fn(30, 9, |x, y| (2..=27).contains(&x) && (2..=6).contains(&y));
        let dist = chamfer_distance(&mask.as_view());
        let ridge = ridge_from_distance(&mask.as_view(), &dist);

        let rows: Vec<usize> = (0..9)
            .filter(|&y| (0..30).any(|x| ridge.get(x, y) == Some(&255)))
            .collect();
        assert!(rows.contains(&4));
        for x in 6..24 {
            assert_eq!(ridge.get(x, 4), Some(&255), "x={x}");
            assert_eq!(ridge.get(x, 3), Some(&0), "x={x}");
        }
    }

    #[test]
    fn mismatched_field_yields_empty_ridge() {
        let mask = Image::binary_from_fn(5, 5, |_, _| true);
        let dist = Image::new_fill(4, 5, 1u32);
        let ridge = ridge_from_distance(&mask.as_view(), &dist);
        assert_eq!(ridge.as_view().count_set(), 0);
    }
}
