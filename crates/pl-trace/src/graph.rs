use pl_core::adjacency::{self, DIRS};
use pl_core::ImageView;

/// Role of a skeleton pixel, by linked-neighbor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelKind {
    Isolated,
    End,
    Regular,
    Junction,
}

impl PixelKind {
    pub fn from_degree(d: u8) -> Self {
        match d {
            0 => Self::Isolated,
            1 => Self::End,
            2 => Self::Regular,
            _ => Self::Junction,
        }
    }
}

/// Counts of each pixel role in a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkeletonTopology {
    pub endpoints: usize,
    pub junctions: usize,
    pub isolated: usize,
    pub pixels: usize,
}

/// Dense degree grid over a skeleton mask.
///
/// Pixels are addressed by linear index `y * width + x`. Neighbor queries
/// follow [`pl_core::adjacency::linked_neighbor`].
#[derive(Debug, Clone)]
pub struct PixelDegrees {
    width: usize,
    height: usize,
    occ: Vec<u8>,
    deg: Vec<u8>,
}

impl PixelDegrees {
    pub fn new(skel: &ImageView<'_, u8>) -> Self {
        let (width, height) = (skel.width(), skel.height());
        let occ: Vec<u8> = (0..height)
            .flat_map(|y| skel.row(y).iter().map(|&v| u8::from(v != 0)))
            .collect();

        let mut deg = vec![0_u8; occ.len()];
        for p in 0..occ.len() {
            if occ[p] != 0 {
                deg[p] = adjacency::link_degree(p, &occ, width, height);
            }
        }

        Self {
            width,
            height,
            occ,
            deg,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.occ.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occ.is_empty()
    }

    #[inline]
    pub fn is_set(&self, p: usize) -> bool {
        self.occ[p] != 0
    }

    #[inline]
    pub fn degree(&self, p: usize) -> u8 {
        self.deg[p]
    }

    pub fn kind(&self, p: usize) -> Option<PixelKind> {
        self.is_set(p).then(|| PixelKind::from_degree(self.deg[p]))
    }

    #[inline]
    pub fn xy(&self, p: usize) -> (usize, usize) {
        (p % self.width, p / self.width)
    }

    #[inline]
    pub fn neighbor(&self, p: usize, dir: u8) -> Option<usize> {
        adjacency::linked_neighbor(p, dir, &self.occ, self.width, self.height)
    }

    /// Linked neighbors of `p` as `(direction, index)` in direction order.
    pub fn neighbors(&self, p: usize) -> impl Iterator<Item = (u8, usize)> + '_ {
        DIRS.iter()
            .filter_map(move |&dir| self.neighbor(p, dir).map(|nb| (dir, nb)))
    }

    /// Set pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.occ.len()).filter(|&p| self.occ[p] != 0)
    }

    pub fn topology(&self) -> SkeletonTopology {
        let mut t = SkeletonTopology::default();
        for p in self.pixels() {
            t.pixels += 1;
            match PixelKind::from_degree(self.deg[p]) {
                PixelKind::Isolated => t.isolated += 1,
                PixelKind::End => t.endpoints += 1,
                PixelKind::Junction => t.junctions += 1,
                PixelKind::Regular => {}
            }
        }
        t
    }
}

pub fn skeleton_topology(skel: &ImageView<'_, u8>) -> SkeletonTopology {
    PixelDegrees::new(skel).topology()
}

#[cfg(test)]
mod tests {
    use pl_core::Image;

    use super::{PixelDegrees, PixelKind, SkeletonTopology, skeleton_topology};

    #[test]
    fn t_junction_topology() {
        let skel = Image::binary_from_fn(9, 9, |x, y| {
            (x == 4 && (1..=7).contains(&y)) || (y == 4 && (5..=7).contains(&x))
        });

        assert_eq!(
            skeleton_topology(&skel.as_view()),
            SkeletonTopology {
                endpoints: 3,
                junctions: 1,
                isolated: 0,
                pixels: 10,
            }
        );

        let g = PixelDegrees::new(&skel.as_view());
        assert_eq!(g.kind(4 * 9 + 4), Some(PixelKind::Junction));
        assert_eq!(g.kind(0), None);
        assert_eq!(g.degree(9 + 4), 1);
        assert_eq!(g.neighbors(4 * 9 + 4).count(), 3);
    }

    #[test]
    fn diagonal_staircase_is_a_chain() {
        // Staircase from (1,1) to (4,4) with a 4-connected riser at every step.
        let pixels = [(1, 1), (2, 1), (2, 2), (3, 2), (3, 3), (4, 3), (4, 4)];
        let skel = Image::binary_from_fn(6, 6, |x, y| pixels.contains(&(x, y)));
        let t = skeleton_topology(&skel.as_view());

        assert_eq!(t.endpoints, 2);
        assert_eq!(t.junctions, 0);
    }
}
