use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::{
    db::{normalize_user, RatingStore},
    error::AppResult,
    models::{RatingEntry, UserRatings},
};

/// Stores each user's ratings as `{dir}/{user}_ratings.csv` with a
/// `Title,Rating` header
#[derive(Debug, Clone)]
pub struct FileRatingStore {
    dir: PathBuf,
}

impl FileRatingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the CSV file backing a user
    pub fn path_for(&self, user: &str) -> AppResult<PathBuf> {
        let user = normalize_user(user)?;
        Ok(self.dir.join(format!("{}_ratings.csv", user)))
    }

    fn read(path: &Path) -> AppResult<Option<UserRatings>> {
        let mut reader = match ReaderBuilder::new().from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                if let csv::ErrorKind::Io(io) = e.kind() {
                    if io.kind() == ErrorKind::NotFound {
                        return Ok(None);
                    }
                }
                return Err(e.into());
            }
        };

        let entries = reader
            .deserialize::<RatingEntry>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(UserRatings::from_entries(entries)))
    }

    fn write(path: &Path, ratings: &UserRatings) -> AppResult<()> {
        // Write to a sibling file first so a failed write never truncates
        // the previous list
        let tmp = path.with_extension("csv.tmp");
        let result = Self::write_csv(&tmp, ratings)
            .and_then(|()| std::fs::rename(&tmp, path).map_err(Into::into));
        if result.is_err() {
            if let Err(e) = std::fs::remove_file(&tmp) {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        error = %e,
                        path = %tmp.display(),
                        "Failed to remove temp ratings file"
                    );
                }
            }
        }
        result
    }

    fn write_csv(path: &Path, ratings: &UserRatings) -> AppResult<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(["Title", "Rating"])?;
        for entry in ratings.entries() {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RatingStore for FileRatingStore {
    async fn load(&self, user: &str) -> AppResult<UserRatings> {
        let path = self.path_for(user)?;
        let ratings = tokio::task::spawn_blocking(move || Self::read(&path))
            .await
            .map_err(|e| std::io::Error::new(ErrorKind::Other, e))??;

        match ratings {
            Some(ratings) => {
                tracing::debug!(user = %user, count = ratings.len(), "Loaded ratings file");
                Ok(ratings)
            }
            None => {
                tracing::debug!(user = %user, "No ratings file yet, starting empty");
                Ok(UserRatings::new())
            }
        }
    }

    async fn save(&self, user: &str, ratings: &UserRatings) -> AppResult<()> {
        let path = self.path_for(user)?;
        let ratings = ratings.clone();
        tokio::task::spawn_blocking(move || Self::write(&path, &ratings))
            .await
            .map_err(|e| std::io::Error::new(ErrorKind::Other, e))??;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
