use std::sync::Arc;

use movie_rec::{
    db::{FileRatingStore, InMemoryRatingStore, RatingStore},
    models::RatingEntry,
    services::{
        ratings::submit_rating, recommend, title_search::search_titles, RecommendOptions,
        ReferenceDataset,
    },
};

const MOVIES: &str = "movieId,title,genres\n\
    1,Alien (1979),Horror|Sci-Fi\n\
    2,Aliens (1986),Action|Sci-Fi\n\
    3,Heat (1995),Action|Crime\n\
    4,Fargo (1996),Comedy|Crime\n";

// Reference users: [5,3,-,-], [-,4,5,-], [1,-,-,5]
const UTILITY: &str = "userId,1,2,3,4\n\
    1,5.0,3.0,,\n\
    2,,4.0,5.0,\n\
    3,1.0,,,5.0\n";

fn dataset() -> Arc<ReferenceDataset> {
    Arc::new(ReferenceDataset::from_readers(MOVIES.as_bytes(), UTILITY.as_bytes()).unwrap())
}

fn two_neighbors() -> RecommendOptions {
    RecommendOptions {
        neighbors: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_rate_then_recommend() {
    let dataset = dataset();
    let store = InMemoryRatingStore::new();

    submit_rating(&store, "alice", "Alien (1979)", 5).await.unwrap();
    submit_rating(&store, "alice", "Aliens (1986)", 3).await.unwrap();

    let ratings = store.load("alice").await.unwrap();
    let outcome = recommend(
        ratings.entries(),
        &dataset.utility,
        &dataset.catalog,
        &two_neighbors(),
    )
    .unwrap();

    assert_eq!(outcome.titles, vec!["Heat (1995)".to_string()]);
    assert!(outcome.unresolved.is_empty());
}

#[tokio::test]
async fn test_rerating_changes_neighbors() {
    let dataset = dataset();
    let store = InMemoryRatingStore::new();

    submit_rating(&store, "bob", "Alien (1979)", 1).await.unwrap();
    submit_rating(&store, "bob", "Fargo (1996)", 5).await.unwrap();
    let before = recommend(
        store.load("bob").await.unwrap().entries(),
        &dataset.utility,
        &dataset.catalog,
        &RecommendOptions {
            neighbors: 1,
            ..Default::default()
        },
    )
    .unwrap();

    // Closest reference user is row 2, who only rated what bob rated
    assert!(before.titles.is_empty());

    submit_rating(&store, "bob", "Fargo (1996)", 1).await.unwrap();
    submit_rating(&store, "bob", "Alien (1979)", 5).await.unwrap();
    let ratings = store.load("bob").await.unwrap();
    assert_eq!(ratings.len(), 2);

    let after = recommend(
        ratings.entries(),
        &dataset.utility,
        &dataset.catalog,
        &RecommendOptions {
            neighbors: 1,
            limit: 10,
            exclude_rated: false,
        },
    )
    .unwrap();
    // Now row 0 ([5,3,-,-]) is the nearest user
    assert_eq!(after.titles, vec!["Alien (1979)", "Aliens (1986)"]);
}

#[tokio::test]
async fn test_file_store_round_trip_feeds_recommendations() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dataset();
    let store = FileRatingStore::new(dir.path());

    submit_rating(&store, "carol", "Alien (1979)", 5).await.unwrap();
    submit_rating(&store, "carol", "Aliens (1986)", 3).await.unwrap();
    submit_rating(&store, "carol", "Aliens", 4).await.unwrap();

    // A second store over the same directory sees the persisted list
    let reopened = FileRatingStore::new(dir.path());
    let ratings = reopened.load("carol").await.unwrap();
    assert_eq!(ratings.len(), 3);

    let outcome = recommend(
        ratings.entries(),
        &dataset.utility,
        &dataset.catalog,
        &two_neighbors(),
    )
    .unwrap();

    assert_eq!(outcome.unresolved.len(), 1);
    assert_eq!(outcome.unresolved[0].title, "Aliens");
    assert_eq!(outcome.titles, vec!["Heat (1995)".to_string()]);
}

#[tokio::test]
async fn test_new_user_gets_no_recommendations() {
    let dataset = dataset();
    let store = InMemoryRatingStore::new();

    let ratings = store.load("dave").await.unwrap();
    let outcome = recommend(
        ratings.entries(),
        &dataset.utility,
        &dataset.catalog,
        &RecommendOptions::default(),
    )
    .unwrap();

    assert!(outcome.titles.is_empty());
}

#[test]
fn test_search_then_rate_exact_title() {
    let dataset = dataset();
    let hits = search_titles(&dataset.catalog, "alien");
    assert_eq!(hits.len(), 2);

    // Titles copied from search results resolve exactly
    let entries: Vec<RatingEntry> = hits
        .iter()
        .map(|movie| RatingEntry::new(movie.title.clone(), 4))
        .collect();
    let outcome = recommend(
        &entries,
        &dataset.utility,
        &dataset.catalog,
        &RecommendOptions::default(),
    )
    .unwrap();
    assert!(outcome.unresolved.is_empty());
    assert!(outcome.titles.len() <= 2);
}

#[test]
fn test_dataset_is_shared_across_threads() {
    let dataset = dataset();
    let entries = vec![
        RatingEntry::new("Alien (1979)", 5),
        RatingEntry::new("Aliens (1986)", 3),
    ];

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dataset = Arc::clone(&dataset);
            let entries = entries.clone();
            std::thread::spawn(move || {
                recommend(
                    &entries,
                    &dataset.utility,
                    &dataset.catalog,
                    &RecommendOptions::default(),
                )
                .unwrap()
                .titles
            })
        })
        .collect();

    let results: Vec<Vec<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0], vec!["Fargo (1996)", "Heat (1995)"]);
}
