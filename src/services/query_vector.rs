use std::sync::Arc;

use ndarray::Array1;
use thiserror::Error;

use crate::models::RatingEntry;
use crate::services::catalog::{Catalog, ItemIndex};

/// A rated title that does not exist in the catalog
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("title not found in catalog: {title}")]
pub struct ResolutionError {
    pub title: String,
}

/// The querying user's ratings laid out on the utility matrix columns
///
/// Values are the user's raw star ratings. They are not mean-centered, unlike
/// the reference rows they get compared against.
#[derive(Debug, Clone)]
pub struct QueryVector {
    index: Arc<ItemIndex>,
    values: Array1<f64>,
    rated: Vec<usize>,
}

impl QueryVector {
    pub fn index(&self) -> &Arc<ItemIndex> {
        &self.index
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Column positions the user has rated, in entry order
    pub fn rated_positions(&self) -> &[usize] {
        &self.rated
    }

    /// True when no entry resolved to a catalog item
    pub fn is_empty(&self) -> bool {
        self.rated.is_empty()
    }
}

/// Builds the dense query vector for a user's ratings
///
/// Entries whose title is not in the catalog are skipped and reported back
/// one [`ResolutionError`] each; all other entries are still placed.
pub fn build_query_vector(
    catalog: &Catalog,
    entries: &[RatingEntry],
) -> (QueryVector, Vec<ResolutionError>) {
    let index = Arc::clone(catalog.index());
    let mut values = Array1::zeros(index.len());
    let mut rated = Vec::with_capacity(entries.len());
    let mut unresolved = Vec::new();

    for entry in entries {
        let position = catalog
            .id_for_title(&entry.title)
            .and_then(|id| index.position(id));

        match position {
            Some(pos) => {
                values[pos] = f64::from(entry.rating);
                if !rated.contains(&pos) {
                    rated.push(pos);
                }
            }
            None => unresolved.push(ResolutionError {
                title: entry.title.clone(),
            }),
        }
    }

    (
        QueryVector {
            index,
            values,
            rated,
        },
        unresolved,
    )
}
