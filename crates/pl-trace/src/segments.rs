use crate::graph::PixelDegrees;

/// Splits the skeleton into pixel walks between endpoints and junctions.
///
/// Walks seed at unvisited endpoints first, then at any pixel still
/// unvisited, both in row-major order. Walks shorter than two pixels are
/// dropped.
pub(crate) fn trace_segments(g: &PixelDegrees) -> Vec<Vec<usize>> {
    let mut visited = vec![false; g.len()];
    let mut walks = Vec::new();

    let endpoints: Vec<usize> = g.pixels().filter(|&p| g.degree(p) == 1).collect();
    for p in endpoints {
        if visited[p] {
            continue;
        }
        let walk = walk_from(g, p, &mut visited);
        if walk.len() >= 2 {
            walks.push(walk);
        }
    }

    for p in 0..g.len() {
        if !g.is_set(p) || visited[p] {
            continue;
        }
        let walk = walk_from(g, p, &mut visited);
        if walk.len() >= 2 {
            walks.push(walk);
        }
    }

    walks
}

fn walk_from(g: &PixelDegrees, start: usize, visited: &mut [bool]) -> Vec<usize> {
    let mut path = vec![start];
    visited[start] = true;

    let mut prev = None;
    let mut cur = start;
    for _ in 0..g.len() {
        if prev.is_some() && g.degree(cur) != 2 {
            break;
        }

        let mut unvisited = None;
        let mut fallback = None;
        for (_, nb) in g.neighbors(cur) {
            if Some(nb) == prev {
                continue;
            }
            if !visited[nb] {
                unvisited = Some(nb);
                break;
            }
            if fallback.is_none() {
                fallback = Some(nb);
            }
        }

        let Some(next) = unvisited.or(fallback) else {
            break;
        };

        if visited[next] {
            // Close loops and let branches meet at their junction.
            if next == start || g.degree(next) >= 3 {
                path.push(next);
            }
            break;
        }

        path.push(next);
        visited[next] = true;
        prev = Some(cur);
        cur = next;
    }

    path
}
