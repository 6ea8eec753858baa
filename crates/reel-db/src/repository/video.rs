//! # Video Repository
//!
//! Database operations for the video catalogue.
//!
//! ## Key Operations
//! - Insert with validation (blank title, negative or inconsistent counts)
//! - Lookup by id
//! - Listing and counting

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use reel_core::validation::validate_new_video;
use reel_core::{NewVideo, Video, VideoId};

/// Columns selected for every `Video` row.
pub(crate) const VIDEO_COLUMNS: &str = "id, title, overview, release_date, image_url, \
     total_inventory, available_inventory, created_at, updated_at";

/// Repository for video database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = VideoRepository::new(pool);
/// let video = repo.insert(&NewVideo::new("Wonder Woman", release, 5)).await?;
/// let same = repo.get_by_id(video.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    /// Creates a new VideoRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VideoRepository { pool }
    }

    /// Inserts a new video and returns it with its assigned id.
    ///
    /// ## Returns
    /// * `Ok(Video)` - Stored video
    /// * `Err(DbError::Validation)` - Blank title/overview or bad counts
    pub async fn insert(&self, video: &NewVideo) -> DbResult<Video> {
        validate_new_video(video)?;

        debug!(title = %video.title, copies = video.total_inventory, "Inserting video");

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO videos (
                title, overview, release_date, image_url,
                total_inventory, available_inventory, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING {VIDEO_COLUMNS}"
        );

        let stored = sqlx::query_as::<_, Video>(&sql)
            .bind(&video.title)
            .bind(&video.overview)
            .bind(video.release_date)
            .bind(&video.image_url)
            .bind(video.total_inventory)
            .bind(video.available_inventory)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    /// Gets a video by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Video))` - Video found
    /// * `Ok(None)` - Video not found
    pub async fn get_by_id(&self, id: VideoId) -> DbResult<Option<Video>> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1");

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    /// Lists videos ordered by title.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Video>> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos ORDER BY title, id LIMIT ?1");

        let videos = sqlx::query_as::<_, Video>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = videos.len(), "Listed videos");
        Ok(videos)
    }

    /// Counts total videos (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    fn release() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 6, 2).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.videos();

        let stored = repo
            .insert(&NewVideo::new("Wonder Woman", release(), 5).overview("Amazon princess"))
            .await
            .unwrap();
        assert_eq!(stored.title, "Wonder Woman");
        assert_eq!(stored.total_inventory, 5);
        assert_eq!(stored.available_inventory, 5);

        let fetched = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.release_date, release());
        assert_eq!(fetched.overview, "Amazon princess");
        assert_eq!(fetched.formatted_release_date(), "June 2nd 2017");

        assert!(repo.get_by_id(VideoId(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_video() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.videos().insert(&NewVideo::new("", release(), 5)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = db
            .videos()
            .insert(&NewVideo::new("Black Widow", release(), -1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(db.videos().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_title() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.videos();
        repo.insert(&NewVideo::new("Wonder Woman", release(), 1)).await.unwrap();
        repo.insert(&NewVideo::new("Black Widow", release(), 1)).await.unwrap();

        let titles: Vec<String> = repo.list(10).await.unwrap().into_iter().map(|v| v.title).collect();
        assert_eq!(titles, vec!["Black Widow", "Wonder Woman"]);
        assert_eq!(repo.list(1).await.unwrap().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
