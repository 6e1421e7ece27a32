use serde::{Deserialize, Serialize};

/// Lowest star value a user can submit
pub const MIN_RATING: u8 = 1;
/// Highest star value a user can submit
pub const MAX_RATING: u8 = 5;

/// A single title the user has explicitly rated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingEntry {
    /// Exact catalog title as typed (or pasted) by the user
    #[serde(rename = "Title")]
    pub title: String,
    /// Raw star rating, never centered
    #[serde(rename = "Rating")]
    pub rating: u8,
}

impl RatingEntry {
    pub fn new(title: impl Into<String>, rating: u8) -> Self {
        Self {
            title: title.into(),
            rating,
        }
    }
}

/// The ordered list of ratings belonging to one user, keyed by title
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<RatingEntry>", into = "Vec<RatingEntry>")]
pub struct UserRatings {
    entries: Vec<RatingEntry>,
}

impl From<Vec<RatingEntry>> for UserRatings {
    fn from(entries: Vec<RatingEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<UserRatings> for Vec<RatingEntry> {
    fn from(ratings: UserRatings) -> Self {
        ratings.entries
    }
}

impl UserRatings {
    /// Creates an empty rating list
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rating list from stored entries, collapsing repeated titles
    /// so the last occurrence wins.
    pub fn from_entries(entries: impl IntoIterator<Item = RatingEntry>) -> Self {
        let mut ratings = Self::new();
        for entry in entries {
            ratings.upsert(entry.title, entry.rating);
        }
        ratings
    }

    /// Sets the rating for a title
    pub fn upsert(&mut self, title: impl Into<String>, rating: u8) {
        let title = title.into();
        // Update if exists, otherwise add
        if let Some(existing) = self.entries.iter_mut().find(|e| e.title == title) {
            existing.rating = rating;
        } else {
            self.entries.push(RatingEntry { title, rating });
        }
    }

    pub fn get(&self, title: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|e| e.title == title)
            .map(|e| e.rating)
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
