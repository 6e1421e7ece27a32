pub mod movie;
pub mod user_ratings;

pub use movie::{Movie, MovieId};
pub use user_ratings::{RatingEntry, UserRatings, MAX_RATING, MIN_RATING};
