use std::cmp::Ordering;

use crate::services::neighbors::Neighbor;
use crate::services::utility_matrix::UtilityMatrix;

/// Mean centered rating of one item across the neighbors that rated it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemScore {
    /// Column position in the utility matrix
    pub position: usize,
    pub mean: f64,
    /// Number of neighbors with a non-zero cell for this item
    pub raters: usize,
}

/// Ranks items by their mean rating among the neighbors
///
/// Zero cells are treated as "not rated by this neighbor", which also drops
/// ratings that sat exactly on a neighbor's mean. Items no neighbor rated are
/// left out, as are the positions in `exclude`. At most `limit` items are
/// returned, highest mean first; equal means keep column order.
pub fn rank_items(
    matrix: &UtilityMatrix,
    neighbors: &[Neighbor],
    exclude: &[usize],
    limit: usize,
) -> Vec<ItemScore> {
    let mut sums = vec![0.0; matrix.n_cols()];
    let mut counts = vec![0usize; matrix.n_cols()];

    for neighbor in neighbors {
        for (position, &value) in matrix.row(neighbor.row).iter().enumerate() {
            if value != 0.0 {
                sums[position] += value;
                counts[position] += 1;
            }
        }
    }

    let mut scores: Vec<ItemScore> = sums
        .into_iter()
        .zip(counts)
        .enumerate()
        .filter(|(position, (_, count))| *count > 0 && !exclude.contains(position))
        .map(|(position, (sum, count))| ItemScore {
            position,
            mean: sum / count as f64,
            raters: count,
        })
        .collect();

    scores.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    scores.truncate(limit);
    scores
}
