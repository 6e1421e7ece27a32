//! Per-user rating persistence
//!
//! The recommendation core never touches storage; hosts load a user's list
//! through a [`RatingStore`] before recommending and save it after a rating
//! is submitted.
use crate::{
    error::{AppError, AppResult},
    models::UserRatings,
};

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileRatingStore;
pub use memory::InMemoryRatingStore;
pub use self::redis::{create_redis_client, RatingKey, RedisRatingStore};

/// Storage for the ordered rating list of each user
///
/// Users are identified by a free-text name. Loading a user that was never
/// saved yields an empty list.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// Loads the user's ratings
    async fn load(&self, user: &str) -> AppResult<UserRatings>;

    /// Replaces the user's stored ratings
    async fn save(&self, user: &str, ratings: &UserRatings) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Normalizes a user name into a storage key
///
/// Names are trimmed; empty names and names that could escape a directory
/// are rejected.
pub fn normalize_user(user: &str) -> AppResult<&str> {
    let user = user.trim();
    if user.is_empty() {
        return Err(AppError::InvalidInput("user name must not be empty".to_string()));
    }
    if user.contains(['/', '\\']) || user.contains("..") {
        return Err(AppError::InvalidInput(format!(
            "user name contains path characters: {:?}",
            user
        )));
    }
    Ok(user)
}
