use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::{normalize_user, RatingStore},
    error::AppResult,
    models::UserRatings,
};

/// Process-local rating store, lost on exit
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    users: RwLock<HashMap<String, UserRatings>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn load(&self, user: &str) -> AppResult<UserRatings> {
        let user = normalize_user(user)?;
        let users = self.users.read().await;
        Ok(users.get(user).cloned().unwrap_or_default())
    }

    async fn save(&self, user: &str, ratings: &UserRatings) -> AppResult<()> {
        let user = normalize_user(user)?;
        let mut users = self.users.write().await;
        users.insert(user.to_string(), ratings.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
