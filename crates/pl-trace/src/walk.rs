use pl_core::adjacency::opposite_dir;

use crate::graph::PixelDegrees;

/// Covers every skeleton link with one walk, jumping between pieces.
///
/// Links are consumed at most once. When the current pixel has no unused
/// link left, the walk jumps to the nearest pixel that still has one (squared
/// pixel distance, first in row-major order on ties). Returns an empty path
/// when the skeleton has no link at all.
pub(crate) fn trace_single_walk(g: &PixelDegrees) -> Vec<usize> {
    let mut used_link = vec![0_u8; g.len()];
    let mut unused: Vec<u8> = (0..g.len())
        .map(|p| if g.is_set(p) { g.degree(p) } else { 0 })
        .collect();
    let mut remaining = unused.iter().map(|&d| d as usize).sum::<usize>() / 2;

    let Some(start) = pick_start(&unused) else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut cur = start;
    while remaining > 0 {
        let step = g
            .neighbors(cur)
            .find(|&(dir, _)| !is_link_used(&used_link, cur, dir));

        match step {
            Some((dir, nb)) => {
                mark_link_both(&mut used_link, cur, dir, nb);
                unused[cur] -= 1;
                unused[nb] -= 1;
                remaining -= 1;
                cur = nb;
            }
            None => {
                let Some(nb) = nearest_with_unused(g, &unused, cur) else {
                    break;
                };
                cur = nb;
            }
        }

        if path.last() != Some(&cur) {
            path.push(cur);
        }
    }

    path
}

fn pick_start(unused: &[u8]) -> Option<usize> {
    unused
        .iter()
        .position(|&n| n == 1)
        .or_else(|| unused.iter().position(|&n| n > 0))
}

fn nearest_with_unused(g: &PixelDegrees, unused: &[u8], from: usize) -> Option<usize> {
    let (fx, fy) = g.xy(from);
    let mut best = None;
    let mut best_d2 = usize::MAX;

    for (p, &n) in unused.iter().enumerate() {
        if n == 0 {
            continue;
        }
        let (x, y) = g.xy(p);
        let d2 = x.abs_diff(fx).pow(2) + y.abs_diff(fy).pow(2);
        if d2 < best_d2 {
            best_d2 = d2;
            best = Some(p);
        }
    }

    best
}

#[inline]
fn is_link_used(used_link: &[u8], p: usize, dir: u8) -> bool {
    let bit = 1_u8 << dir;
    (used_link[p] & bit) != 0
}

#[inline]
fn mark_link_both(used_link: &mut [u8], a: usize, dir_ab: u8, b: usize) {
    used_link[a] |= 1_u8 << dir_ab;
    used_link[b] |= 1_u8 << opposite_dir(dir_ab);
}

#[cfg(test)]
mod tests {
    use pl_core::Image;

    use super::trace_single_walk;
    use crate::graph::PixelDegrees;

    fn walk_xy(skel: &Image<u8>) -> Vec<(usize, usize)> {
        let g = PixelDegrees::new(&skel.as_view());
        trace_single_walk(&g).into_iter().map(|p| g.xy(p)).collect()
    }

    #[test]
    fn two_bars_are_joined_by_one_jump() {
        let skel = Image::binary_from_fn(20, 5, |x, y| {
            y == 2 && ((2..=6).contains(&x) || (11..=15).contains(&x))
        });
        let walk = walk_xy(&skel);

        let expected: Vec<(usize, usize)> = (2..=6).chain(11..=15).map(|x| (x, 2)).collect();
        assert_eq!(walk, expected);
    }

    #[test]
    fn t_junction_covers_every_link_once() {
        let skel = Image::binary_from_fn(9, 9, |x, y| {
            (x == 4 && (1..=7).contains(&y)) || (y == 4 && (5..=7).contains(&x))
        });
        let walk = walk_xy(&skel);

        // Up to the junction, out the arm, back to the junction, up the stem.
        assert_eq!(walk.first(), Some(&(4, 1)));
        assert_eq!(walk.len(), 11);
        assert_eq!(walk[6], (7, 4));
        assert_eq!(walk[7], (4, 4));
        assert_eq!(walk.last(), Some(&(4, 7)));
        for w in walk.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn no_links_means_no_walk() {
        let skel = Image::binary_from_fn(6, 6, |x, y| (x, y) == (2, 2) || (x, y) == (4, 4));
        assert!(walk_xy(&skel).is_empty());
    }
}
