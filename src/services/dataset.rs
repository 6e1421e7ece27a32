use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use ndarray::Array2;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId},
    services::{catalog::Catalog, utility_matrix::UtilityMatrix},
};

/// The read-only reference data every recommendation runs against
///
/// Loaded once at startup and shared by reference afterwards; nothing
/// mutates it, so it can be read from any thread without locking.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    pub catalog: Catalog,
    pub utility: UtilityMatrix,
}

impl ReferenceDataset {
    /// Loads the catalog and population ratings from CSV files
    pub fn load(movies_path: impl AsRef<Path>, utility_path: impl AsRef<Path>) -> AppResult<Self> {
        let movies_path = movies_path.as_ref();
        let utility_path = utility_path.as_ref();

        let catalog = load_catalog_file(movies_path)?;
        let utility = load_utility_matrix(ReaderBuilder::new().from_path(utility_path)?, &catalog)?;

        tracing::info!(
            movies = catalog.len(),
            reference_users = utility.n_rows(),
            movies_path = %movies_path.display(),
            utility_path = %utility_path.display(),
            "Loaded reference dataset"
        );

        Ok(Self { catalog, utility })
    }

    /// Same as [`ReferenceDataset::load`] but from in-memory readers
    pub fn from_readers(movies: impl Read, utility: impl Read) -> AppResult<Self> {
        let catalog = load_catalog(ReaderBuilder::new().from_reader(movies))?;
        let utility = load_utility_matrix(ReaderBuilder::new().from_reader(utility), &catalog)?;
        Ok(Self { catalog, utility })
    }
}

/// Loads only the catalog, for callers that never touch the rating matrix
pub fn load_catalog_file(movies_path: impl AsRef<Path>) -> AppResult<Catalog> {
    load_catalog(ReaderBuilder::new().from_path(movies_path.as_ref())?)
}

/// Reads `movieId,title,...` rows into a catalog. Extra columns are ignored.
fn load_catalog<R: Read>(mut reader: csv::Reader<R>) -> AppResult<Catalog> {
    let movies = reader
        .deserialize::<Movie>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Catalog::new(movies))
}

/// Reads the population rating matrix
///
/// The first column holds reference user ids, every other header cell is an
/// item id. Empty or `NaN` cells are unrated. Header ids are placed through
/// the catalog's item index; catalog items without a column stay unrated.
fn load_utility_matrix<R: Read>(
    mut reader: csv::Reader<R>,
    catalog: &Catalog,
) -> AppResult<UtilityMatrix> {
    let index = Arc::clone(catalog.index());
    let headers = reader.headers()?.clone();
    let positions = column_positions(&headers, catalog)?;

    let cols = index.len();
    let mut user_ids = Vec::new();
    let mut data: Vec<f64> = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let user_id = record
            .get(0)
            .map(str::trim)
            .and_then(parse_id)
            .ok_or_else(|| AppError::Dataset(format!("line {}: invalid user id", line)))?;

        let start = data.len();
        data.resize(start + cols, f64::NAN);

        for (cell, position) in record.iter().skip(1).zip(&positions) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell
                .parse()
                .ok()
                .filter(|v: &f64| v.is_nan() || (v.is_finite() && *v >= 0.0))
                .ok_or_else(|| {
                    AppError::Dataset(format!("line {}: invalid rating {:?}", line, cell))
                })?;
            data[start + position] = value;
        }
        user_ids.push(user_id);
    }

    let raw = Array2::from_shape_vec((user_ids.len(), cols), data)
        .map_err(|e| AppError::Dataset(e.to_string()))?;

    UtilityMatrix::build(index, user_ids, raw)
}

/// Maps every rating column of the header to its item index position
fn column_positions(headers: &StringRecord, catalog: &Catalog) -> AppResult<Vec<usize>> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .skip(1)
        .map(|cell| {
            let id = parse_id(cell.trim()).ok_or_else(|| {
                AppError::Dataset(format!("invalid item id in header: {:?}", cell))
            })?;
            if !seen.insert(id) {
                return Err(AppError::Dataset(format!(
                    "item id {} appears twice in header",
                    id
                )));
            }
            catalog.index().position(id).ok_or_else(|| {
                AppError::ShapeMismatch(format!(
                    "utility matrix column {} is not in the catalog",
                    id
                ))
            })
        })
        .collect()
}

/// Parses an id cell, accepting the `12.0` form some exporters write
fn parse_id(cell: &str) -> Option<MovieId> {
    cell.parse::<MovieId>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(MovieId::MAX))
            .map(|v| v as MovieId)
    })
}
