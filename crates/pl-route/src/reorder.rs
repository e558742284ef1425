use pl_core::{Point2, Stroke};
use tracing::debug;

/// Preferred drawing direction for [`reorder_strokes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteBias {
    /// Start at the leftmost stroke; penalize travel back to the left.
    LeftToRight { left_penalty: f64 },
    /// Start at the topmost stroke (leftmost on ties); penalize travel to
    /// the left and back up the page.
    TopLeftToBottomRight { up_penalty: f64, left_penalty: f64 },
}

impl Default for RouteBias {
    fn default() -> Self {
        Self::LeftToRight { left_penalty: 0.0 }
    }
}

impl RouteBias {
    fn travel_cost(&self, from: Point2, to: Point2) -> f64 {
        let dist = from.distance(to);
        match *self {
            Self::LeftToRight { left_penalty } => dist + left_penalty * (from.x - to.x).max(0.0),
            Self::TopLeftToBottomRight {
                up_penalty,
                left_penalty,
            } => {
                dist + left_penalty * (from.x - to.x).max(0.0)
                    + up_penalty * (to.y - from.y).max(0.0)
            }
        }
    }

    /// Index of the stroke to draw first.
    fn first_stroke(&self, strokes: &[Stroke]) -> usize {
        let mut best = 0;
        let mut best_key = None;
        for (i, s) in strokes.iter().enumerate() {
            let Some(b) = s.bounds() else {
                continue;
            };
            // Smaller is better; strict comparison keeps the first on ties.
            let key = match self {
                Self::LeftToRight { .. } => (b.min.x, 0.0),
                Self::TopLeftToBottomRight { .. } => (-b.max.y, b.min.x),
            };
            let better = match best_key {
                None => true,
                Some((k0, k1)) => key.0 < k0 || (key.0 == k0 && key.1 < k1),
            };
            if better {
                best = i;
                best_key = Some(key);
            }
        }
        best
    }
}

/// Greedy nearest-next ordering, O(N²).
///
/// From the current pen position, both endpoints of every remaining stroke
/// are scored with the bias cost; the cheapest wins (first on ties) and the
/// stroke is reversed when its far end was chosen. Empty strokes are
/// dropped.
pub fn reorder_strokes(strokes: &[Stroke], bias: &RouteBias) -> Vec<Stroke> {
    let mut remaining: Vec<Stroke> = strokes
        .iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect();
    if remaining.is_empty() {
        return remaining;
    }

    let mut ordered = Vec::with_capacity(remaining.len());
    let first = remaining.remove(bias.first_stroke(&remaining));
    let mut cur = first.last();
    ordered.push(first);

    while let Some(from) = cur {
        let mut best = None;
        let mut best_cost = f64::INFINITY;
        for (i, s) in remaining.iter().enumerate() {
            let (Some(a), Some(b)) = (s.first(), s.last()) else {
                continue;
            };

            let cost_f = bias.travel_cost(from, a);
            if cost_f < best_cost {
                best_cost = cost_f;
                best = Some((i, false));
            }
            let cost_r = bias.travel_cost(from, b);
            if cost_r < best_cost {
                best_cost = cost_r;
                best = Some((i, true));
            }
        }

        let Some((i, reverse)) = best else {
            break;
        };
        let next = remaining.remove(i);
        let next = if reverse { next.reversed() } else { next };
        cur = next.last();
        ordered.push(next);
    }

    debug!(
        "reorder ({:?}): strokes_in={}, strokes_out={}",
        bias,
        strokes.len(),
        ordered.len()
    );
    ordered
}
