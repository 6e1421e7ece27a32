use std::cmp::Ordering;

/// A reference row selected as neighbor of the querying user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row position in the utility matrix
    pub row: usize,
    pub similarity: f64,
}

/// Picks the `k` most similar rows
///
/// Sorted by similarity, highest first. Rows with equal scores keep their
/// original order. There is no minimum similarity, so weakly or negatively
/// correlated rows are returned when nothing better exists.
pub fn select_neighbors(scores: &[f64], k: usize) -> Vec<Neighbor> {
    let mut ranked: Vec<Neighbor> = scores
        .iter()
        .enumerate()
        .map(|(row, &similarity)| Neighbor { row, similarity })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}
