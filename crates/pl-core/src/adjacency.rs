//! 8-neighborhood walking over row-major occupancy buffers.
//!
//! Directions are numbered counterclockwise starting east, with `y` growing
//! upward: `0 = E, 1 = NE, 2 = N, 3 = NW, 4 = W, 5 = SW, 6 = S, 7 = SE`.
//!
//! A diagonal only links two set pixels when neither 4-neighbor bridging the
//! diagonal is set. Staircase corners therefore read as degree-2 runs instead
//! of small junction clusters.

pub const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
pub const DY: [isize; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
pub const DIRS: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

#[inline]
pub fn opposite_dir(dir: u8) -> u8 {
    (dir + 4) & 7
}

#[inline]
pub fn is_diagonal_dir(dir: u8) -> bool {
    DX[dir as usize] != 0 && DY[dir as usize] != 0
}

#[inline]
pub fn index_if_in_bounds(x: isize, y: isize, width: usize, height: usize) -> Option<usize> {
    if x < 0 || y < 0 {
        return None;
    }

    let (xu, yu) = (x as usize, y as usize);
    if xu >= width || yu >= height {
        return None;
    }

    Some(yu * width + xu)
}

#[inline]
pub fn neighbor_index(p: usize, dir: u8, width: usize, height: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }

    let x = (p % width) as isize;
    let y = (p / width) as isize;
    index_if_in_bounds(x + DX[dir as usize], y + DY[dir as usize], width, height)
}

/// Neighbor of `p` in direction `dir` when the two pixels are linked.
#[inline]
pub fn linked_neighbor(
    p: usize,
    dir: u8,
    occupancy: &[u8],
    width: usize,
    height: usize,
) -> Option<usize> {
    let nb = neighbor_index(p, dir, width, height)?;
    if occupancy[nb] == 0 {
        return None;
    }

    if is_diagonal_dir(dir) {
        let x = (p % width) as isize;
        let y = (p / width) as isize;
        let dx = DX[dir as usize];
        let dy = DY[dir as usize];

        let side_a = index_if_in_bounds(x + dx, y, width, height);
        let side_b = index_if_in_bounds(x, y + dy, width, height);
        if side_a.is_some_and(|i| occupancy[i] != 0) || side_b.is_some_and(|i| occupancy[i] != 0) {
            return None;
        }
    }

    Some(nb)
}

/// Number of linked neighbors of `p`.
///
/// A diagonal neighbor is skipped when either 4-neighbor bridging it is set,
/// so the result can be lower than [`set_neighbor_count`]. A 2×2 block gives
/// each pixel a link degree of 2 and a set-neighbor count of 3.
pub fn link_degree(p: usize, occupancy: &[u8], width: usize, height: usize) -> u8 {
    DIRS.iter()
        .filter(|&&dir| linked_neighbor(p, dir, occupancy, width, height).is_some())
        .count() as u8
}

/// Number of set pixels in the plain 8-neighborhood of `p`.
pub fn set_neighbor_count(p: usize, occupancy: &[u8], width: usize, height: usize) -> u8 {
    DIRS.iter()
        .filter_map(|&dir| neighbor_index(p, dir, width, height))
        .filter(|&nb| occupancy[nb] != 0)
        .count() as u8
}
