use std::sync::Arc;

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{AppError, AppResult};
use crate::services::catalog::ItemIndex;

/// Reference population ratings, mean-centered per row and zero-filled
///
/// Rows are reference users, columns follow the shared [`ItemIndex`].
/// After construction a zero cell means either "unrated" or "rated exactly
/// at that user's mean"; the two cannot be told apart.
#[derive(Debug, Clone)]
pub struct UtilityMatrix {
    index: Arc<ItemIndex>,
    user_ids: Vec<u32>,
    values: Array2<f64>,
}

/// True for cells that carry no rating in the raw population matrix
fn is_unrated(value: f64) -> bool {
    value.is_nan() || value == 0.0
}

impl UtilityMatrix {
    /// Centers a raw rating matrix
    ///
    /// `raw` has one row per entry of `user_ids` and one column per index
    /// position. Unrated cells are `NaN` or `0.0`. Each row has the mean of its
    /// rated cells subtracted from those cells; unrated cells become `0.0`.
    /// A row with no ratings at all stays all-zero.
    pub fn build(index: Arc<ItemIndex>, user_ids: Vec<u32>, raw: Array2<f64>) -> AppResult<Self> {
        let (rows, cols) = raw.dim();
        if cols != index.len() {
            return Err(AppError::ShapeMismatch(format!(
                "rating matrix has {} columns but the item index has {}",
                cols,
                index.len()
            )));
        }
        if rows != user_ids.len() {
            return Err(AppError::ShapeMismatch(format!(
                "rating matrix has {} rows but {} user ids were given",
                rows,
                user_ids.len()
            )));
        }

        let mut values = raw;
        for mut row in values.axis_iter_mut(Axis(0)) {
            let (sum, count) = row
                .iter()
                .filter(|v| !is_unrated(**v))
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            let mean = if count == 0 { 0.0 } else { sum / count as f64 };

            row.mapv_inplace(|v| if is_unrated(v) { 0.0 } else { v - mean });
        }

        tracing::debug!(rows, cols, "Built centered utility matrix");

        Ok(Self {
            index,
            user_ids,
            values,
        })
    }

    pub fn index(&self) -> &Arc<ItemIndex> {
        &self.index
    }

    /// Reference user id for a row
    pub fn user_id(&self, row: usize) -> Option<u32> {
        self.user_ids.get(row).copied()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn index(n: u32) -> Arc<ItemIndex> {
        Arc::new(ItemIndex::new(0..n))
    }

    #[test]
    fn test_rows_are_centered_on_rated_cells() {
        let raw = array![[5.0, 3.0, 0.0, 0.0], [0.0, 4.0, 5.0, 0.0], [1.0, 0.0, 0.0, 5.0]];
        let matrix = UtilityMatrix::build(index(4), vec![1, 2, 3], raw.clone()).unwrap();

        assert_eq!(matrix.row(0).to_vec(), vec![1.0, -1.0, 0.0, 0.0]);
        assert_eq!(matrix.row(1).to_vec(), vec![0.0, -0.5, 0.5, 0.0]);
        assert_eq!(matrix.row(2).to_vec(), vec![-2.0, 0.0, 0.0, 2.0]);

        for (r, raw_row) in raw.axis_iter(Axis(0)).enumerate() {
            let deviation: f64 = matrix
                .row(r)
                .iter()
                .zip(raw_row.iter())
                .filter(|(_, raw)| **raw != 0.0)
                .map(|(c, _)| *c)
                .sum();
            assert!(deviation.abs() < 1e-12);
        }
    }

    #[test]
    fn test_nan_cells_count_as_unrated() {
        let raw = array![[f64::NAN, 4.0, 2.0]];
        let matrix = UtilityMatrix::build(index(3), vec![9], raw).unwrap();
        assert_eq!(matrix.row(0).to_vec(), vec![0.0, 1.0, -1.0]);
        assert_eq!(matrix.user_id(0), Some(9));
    }

    #[test]
    fn test_all_unrated_row_is_zero_not_nan() {
        let raw = array![[f64::NAN, 0.0, f64::NAN]];
        let matrix = UtilityMatrix::build(index(3), vec![1], raw).unwrap();
        assert!(matrix.row(0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_rating_at_mean_collapses_to_zero() {
        // 3.0 is this user's mean, indistinguishable from unrated after centering
        let raw = array![[2.0, 3.0, 4.0, 0.0]];
        let matrix = UtilityMatrix::build(index(4), vec![1], raw).unwrap();
        assert_eq!(matrix.row(0)[1], 0.0);
        assert_eq!(matrix.row(0)[3], 0.0);
    }

    #[test]
    fn test_column_count_must_match_index() {
        let raw = array![[1.0, 2.0]];
        let result = UtilityMatrix::build(index(3), vec![1], raw);
        assert!(matches!(result, Err(AppError::ShapeMismatch(_))));
    }

    #[test]
    fn test_row_count_must_match_user_ids() {
        let raw = array![[1.0, 2.0, 3.0]];
        let result = UtilityMatrix::build(index(3), vec![1, 2], raw);
        assert!(matches!(result, Err(AppError::ShapeMismatch(_))));
    }
}
