pub mod aggregator;
pub mod catalog;
pub mod dataset;
pub mod neighbors;
pub mod query_vector;
pub mod ratings;
pub mod recommendations;
pub mod similarity;
pub mod title_search;
pub mod utility_matrix;

pub use catalog::{Catalog, ItemIndex};
pub use dataset::ReferenceDataset;
pub use query_vector::ResolutionError;
pub use recommendations::{recommend, RecommendOptions, RecommendationOutcome};
pub use utility_matrix::UtilityMatrix;
