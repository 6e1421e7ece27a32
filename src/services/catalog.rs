use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Movie, MovieId};

/// Bidirectional item id ↔ column position table
///
/// Built once from the catalog and shared by the utility matrix and every
/// query vector, so both always agree on which column holds which item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIndex {
    ids: Vec<MovieId>,
    positions: HashMap<MovieId, usize>,
}

impl ItemIndex {
    /// Builds the index from item ids in column order. Repeated ids keep
    /// their first position.
    pub fn new(ids: impl IntoIterator<Item = MovieId>) -> Self {
        let mut index = Self {
            ids: Vec::new(),
            positions: HashMap::new(),
        };
        for id in ids {
            if !index.positions.contains_key(&id) {
                index.positions.insert(id, index.ids.len());
                index.ids.push(id);
            }
        }
        index
    }

    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn item_id(&self, position: usize) -> Option<MovieId> {
        self.ids.get(position).copied()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Read-only item catalog: id → title and exact title → id
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_title: HashMap<String, MovieId>,
    index: Arc<ItemIndex>,
}

impl Catalog {
    /// Builds the catalog. Column order follows the order of `movies`.
    ///
    /// When two movies share a title the first one answers title lookups.
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut by_title = HashMap::with_capacity(movies.len());
        let mut unique = Vec::with_capacity(movies.len());
        let mut seen_ids = std::collections::HashSet::with_capacity(movies.len());

        for movie in movies {
            if !seen_ids.insert(movie.id) {
                tracing::warn!(movie_id = movie.id, "Duplicate movie id in catalog, ignoring");
                continue;
            }
            if by_title.contains_key(&movie.title) {
                tracing::warn!(
                    movie_id = movie.id,
                    title = %movie.title,
                    "Duplicate title in catalog, lookups resolve to the first occurrence"
                );
            } else {
                by_title.insert(movie.title.clone(), movie.id);
            }
            unique.push(movie);
        }

        let index = Arc::new(ItemIndex::new(unique.iter().map(|m| m.id)));

        Self {
            movies: unique,
            by_title,
            index,
        }
    }

    /// Resolves an exact title to its item id
    pub fn id_for_title(&self, title: &str) -> Option<MovieId> {
        self.by_title.get(title).copied()
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.index.position(id).map(|pos| &self.movies[pos])
    }

    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.movie(id).map(|m| m.title.as_str())
    }

    /// Movie stored at a matrix column
    pub fn movie_at(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The shared column index
    pub fn index(&self) -> &Arc<ItemIndex> {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
