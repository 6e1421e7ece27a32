use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::{
    db::{normalize_user, RatingStore},
    error::AppResult,
    models::UserRatings,
};

/// Redis key holding one user's rating list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatingKey(String);

impl RatingKey {
    pub fn for_user(user: &str) -> AppResult<Self> {
        Ok(Self(normalize_user(user)?.to_string()))
    }
}

impl Display for RatingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ratings:{}", self.0)
    }
}

/// Creates a Redis client for the rating store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Stores each user's ratings as a JSON list under `ratings:{user}`
///
/// Entries never expire.
#[derive(Clone)]
pub struct RedisRatingStore {
    redis_client: Client,
}

impl RedisRatingStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl RatingStore for RedisRatingStore {
    async fn load(&self, user: &str) -> AppResult<UserRatings> {
        let key = RatingKey::for_user(user)?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(key.to_string()).await?;

        match stored {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                tracing::debug!(key = %key, "No stored ratings, starting empty");
                Ok(UserRatings::new())
            }
        }
    }

    async fn save(&self, user: &str, ratings: &UserRatings) -> AppResult<()> {
        let key = RatingKey::for_user(user)?;
        let json = serde_json::to_string(ratings)?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key.to_string(), json).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_rating_key_display() {
        let key = RatingKey::for_user("alice").unwrap();
        assert_eq!(format!("{}", key), "ratings:alice");
    }

    #[test]
    fn test_rating_key_keeps_case_and_spaces() {
        let key = RatingKey::for_user("  Mary Ann ").unwrap();
        assert_eq!(format!("{}", key), "ratings:Mary Ann");
    }

    #[test]
    fn test_rating_key_rejects_empty_user() {
        assert!(matches!(RatingKey::for_user(" "), Err(AppError::InvalidInput(_))));
    }

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_missing_user_loads_empty() {
        let store = RedisRatingStore::new(create_redis_client(&redis_url()).unwrap());
        let ratings = store.load("nonexistent_user_12345").await.unwrap();
        assert!(ratings.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_save_then_load() {
        let client = create_redis_client(&redis_url()).unwrap();
        let store = RedisRatingStore::new(client.clone());

        let mut ratings = UserRatings::new();
        ratings.upsert("Heat (1995)", 4);
        ratings.upsert("Jumanji (1995)", 2);
        store.save("redis_test_user", &ratings).await.unwrap();

        assert_eq!(store.load("redis_test_user").await.unwrap(), ratings);

        // Clean up
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let key = RatingKey::for_user("redis_test_user").unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
