use crate::{models::Movie, services::catalog::Catalog};

/// Finds catalog movies whose title contains `query`, ignoring case
///
/// Results keep catalog order. A blank query matches nothing.
pub fn search_titles<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Movie> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .movies()
        .iter()
        .filter(|movie| movie.title.to_lowercase().contains(&needle))
        .collect()
}
