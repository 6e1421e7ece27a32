use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier of a catalog item (MovieLens `movieId`)
pub type MovieId = u32;

/// Represents a movie in the reference catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    #[serde(rename = "movieId")]
    pub id: MovieId,
    /// Display title, including the release year suffix, e.g. "Heat (1995)"
    pub title: String,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
