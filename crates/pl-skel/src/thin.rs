use pl_core::{Image, ImageView};
use tracing::debug;

/// Output of [`thin_zhang_suen`].
#[derive(Debug, Clone, PartialEq)]
pub struct Thinning {
    pub mask: Image<u8>,
    /// Full iterations run (each made of two subiterations).
    pub iterations: usize,
}

/// Zhang–Suen thinning, bounded by `max_iter` iterations.
///
/// Ring order around `P1 = (x, y)` with `y` up: `P2` above, then `P3..P9`
/// counterclockwise through the left side. The 1-pixel image border is kept
/// clear throughout.
pub fn thin_zhang_suen(mask: &ImageView<'_, u8>, max_iter: usize) -> Thinning {
    let (w, h) = (mask.width(), mask.height());
    let mut a: Vec<u8> = (0..h)
        .flat_map(|y| mask.row(y).iter().map(|&v| u8::from(v != 0)))
        .collect();

    clear_border(&mut a, w, h);

    let mut removals = Vec::new();
    let mut iterations = 0;
    let mut changed = true;
    while changed && iterations < max_iter {
        changed = false;
        iterations += 1;

        for step in 0..2 {
            removals.clear();
            for y in 1..h.saturating_sub(1) {
                for x in 1..w.saturating_sub(1) {
                    let p = y * w + x;
                    if a[p] != 0 && is_removable(&a, w, p, step) {
                        removals.push(p);
                    }
                }
            }

            for &p in &removals {
                a[p] = 0;
            }
            changed |= !removals.is_empty();
            clear_border(&mut a, w, h);
        }
    }

    debug!(
        "thinning: iterations={}, max_iter={}, converged={}",
        iterations, max_iter, !changed
    );

    Thinning {
        mask: Image::binary_from_fn(w, h, |x, y| a[y * w + x] != 0),
        iterations,
    }
}

fn is_removable(a: &[u8], w: usize, p: usize, step: usize) -> bool {
    let up = p + w;
    let down = p - w;
    let ring = [
        a[up],
        a[up - 1],
        a[p - 1],
        a[down - 1],
        a[down],
        a[down + 1],
        a[p + 1],
        a[up + 1],
    ];
    let [p2, _, p4, _, p6, _, p8, _] = ring;

    let live = ring.iter().filter(|&&v| v != 0).count();
    if !(2..=6).contains(&live) {
        return false;
    }

    let transitions = (0..8)
        .filter(|&k| ring[k] == 0 && ring[(k + 1) % 8] != 0)
        .count();
    if transitions != 1 {
        return false;
    }

    if step == 0 {
        p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0
    } else {
        p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0
    }
}

pub(crate) fn clear_border(a: &mut [u8], w: usize, h: usize) {
    if w == 0 || h == 0 {
        return;
    }

    a[..w].fill(0);
    a[(h - 1) * w..].fill(0);
    for y in 0..h {
        a[y * w] = 0;
        a[y * w + w - 1] = 0;
    }
}
