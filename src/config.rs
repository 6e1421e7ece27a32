use serde::Deserialize;

use crate::services::recommendations::RecommendOptions;

/// Backend used to persist per-user rating lists
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RatingStoreKind {
    File,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Item catalog CSV (`movieId,title,...`)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Population rating matrix CSV (user id column followed by one column per item id)
    #[serde(default = "default_utility_matrix_path")]
    pub utility_matrix_path: String,

    /// Directory holding `{user}_ratings.csv` files for the file store
    #[serde(default = "default_ratings_dir")]
    pub ratings_dir: String,

    /// Which rating store backend to use
    #[serde(default = "default_rating_store")]
    pub rating_store: RatingStoreKind,

    /// Redis connection URL, only used by the redis rating store
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Number of nearest reference users (K)
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,

    /// Number of titles to recommend (N)
    #[serde(default = "default_recommendations")]
    pub recommendations: usize,

    /// Drop titles the user already rated from the output
    #[serde(default = "default_exclude_rated")]
    pub exclude_rated: bool,
}

fn default_movies_path() -> String {
    "data/movies.csv".to_string()
}

fn default_utility_matrix_path() -> String {
    "data/utility_matrix.csv".to_string()
}

fn default_ratings_dir() -> String {
    ".".to_string()
}

fn default_rating_store() -> RatingStoreKind {
    RatingStoreKind::File
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_neighbors() -> usize {
    20
}

fn default_recommendations() -> usize {
    10
}

fn default_exclude_rated() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Recommendation knobs derived from this configuration
    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            neighbors: self.neighbors,
            limit: self.recommendations,
            exclude_rated: self.exclude_rated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.movies_path, "data/movies.csv");
        assert_eq!(config.utility_matrix_path, "data/utility_matrix.csv");
        assert_eq!(config.rating_store, RatingStoreKind::File);
        assert_eq!(config.neighbors, 20);
        assert_eq!(config.recommendations, 10);
        assert!(config.exclude_rated);
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("RATING_STORE", "redis"),
            ("NEIGHBORS", "5"),
            ("RECOMMENDATIONS", "3"),
            ("EXCLUDE_RATED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.rating_store, RatingStoreKind::Redis);
        let options = config.recommend_options();
        assert_eq!(options.neighbors, 5);
        assert_eq!(options.limit, 3);
        assert!(!options.exclude_rated);
    }
}
