use std::sync::Arc;

use ndarray::ArrayView1;

use crate::error::{AppError, AppResult};
use crate::services::query_vector::QueryVector;
use crate::services::utility_matrix::UtilityMatrix;

/// Cosine similarity between two equally long vectors
///
/// Returns a value in [-1.0, 1.0]. If either vector has zero magnitude the
/// similarity is 0.0.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Scores every reference row of the matrix against the query vector
///
/// The result has one score per matrix row, in row order.
pub fn score_population(matrix: &UtilityMatrix, query: &QueryVector) -> AppResult<Vec<f64>> {
    let aligned = Arc::ptr_eq(matrix.index(), query.index()) || matrix.index() == query.index();
    if !aligned || matrix.n_cols() != query.values().len() {
        return Err(AppError::ShapeMismatch(format!(
            "query vector has {} columns, utility matrix has {} under a different item index",
            query.values().len(),
            matrix.n_cols()
        )));
    }

    let query = query.values().view();
    Ok((0..matrix.n_rows())
        .map(|row| cosine_similarity(matrix.row(row), query))
        .collect())
}
