use crate::{
    error::AppResult,
    models::RatingEntry,
    services::{
        aggregator::rank_items,
        catalog::Catalog,
        neighbors::select_neighbors,
        query_vector::{build_query_vector, ResolutionError},
        similarity::score_population,
        utility_matrix::UtilityMatrix,
    },
};

/// Tuning knobs for a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    /// Number of nearest reference users (K)
    pub neighbors: usize,
    /// Maximum number of titles returned (N)
    pub limit: usize,
    /// Leave out titles the user has already rated
    pub exclude_rated: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            neighbors: 20,
            limit: 10,
            exclude_rated: true,
        }
    }
}

/// Result of a recommendation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationOutcome {
    /// Recommended titles, best first. May be empty.
    pub titles: Vec<String>,
    /// Rated titles that were skipped because the catalog does not know them
    pub unresolved: Vec<ResolutionError>,
}

/// Generates recommendations with user-based collaborative filtering
///
/// 1. Lay the user's raw ratings out on the utility matrix columns
/// 2. Score every reference user by cosine similarity
/// 3. Keep the `neighbors` most similar reference users
/// 4. Rank items by their mean centered rating among those neighbors
/// 5. Resolve the top `limit` items to titles
///
/// Pure over its inputs: the same ratings and dataset always give the same
/// titles. A user with no resolvable ratings, or one who shares no signal with
/// any reference user, gets an empty list.
#[tracing::instrument(skip_all, fields(entries = user_ratings.len()))]
pub fn recommend(
    user_ratings: &[RatingEntry],
    utility: &UtilityMatrix,
    catalog: &Catalog,
    options: &RecommendOptions,
) -> AppResult<RecommendationOutcome> {
    let (query, unresolved) = build_query_vector(catalog, user_ratings);

    for err in &unresolved {
        tracing::warn!(title = %err.title, "Skipping rating for unknown title");
    }

    if query.is_empty() {
        tracing::info!("No resolvable ratings, nothing to recommend");
        return Ok(RecommendationOutcome {
            titles: Vec::new(),
            unresolved,
        });
    }

    let scores = score_population(utility, &query)?;
    if scores.iter().all(|s| *s == 0.0) {
        tracing::info!(
            population = scores.len(),
            "Ratings share no signal with any reference user"
        );
        return Ok(RecommendationOutcome {
            titles: Vec::new(),
            unresolved,
        });
    }

    let neighbors = select_neighbors(&scores, options.neighbors);
    let exclude: &[usize] = if options.exclude_rated {
        query.rated_positions()
    } else {
        &[]
    };
    let ranked = rank_items(utility, &neighbors, exclude, options.limit);

    let titles: Vec<String> = ranked
        .iter()
        .filter_map(|item| catalog.movie_at(item.position))
        .map(|movie| movie.title.clone())
        .collect();

    tracing::info!(
        neighbors = neighbors.len(),
        top_similarity = neighbors.first().map(|n| n.similarity).unwrap_or(0.0),
        recommendations = titles.len(),
        "Recommendations generated"
    );

    Ok(RecommendationOutcome { titles, unresolved })
}
