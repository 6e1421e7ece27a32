use crate::{
    db::RatingStore,
    error::{AppError, AppResult},
    models::{UserRatings, MAX_RATING, MIN_RATING},
};

/// Records a star rating for a title and persists the user's list
///
/// An already rated title has its rating replaced in place; a new title is
/// appended. The title is stored as given (trimmed) and is not checked
/// against the catalog: unknown titles surface later when recommending.
pub async fn submit_rating(
    store: &dyn RatingStore,
    user: &str,
    title: &str,
    rating: u8,
) -> AppResult<UserRatings> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }

    let mut ratings = store.load(user).await?;
    let updated = ratings.get(title).is_some();
    ratings.upsert(title, rating);
    store.save(user, &ratings).await?;

    tracing::info!(
        user = %user,
        title = %title,
        rating,
        updated,
        total = ratings.len(),
        "Rating recorded"
    );

    Ok(ratings)
}
