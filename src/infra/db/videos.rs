use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateVideoParams, RepoError, UpdateVideoParams, VideosRepo},
    domain::entities::VideoRecord,
};

use super::{
    PostgresRepositories,
    util::{expect_affected, map_sqlx_error},
};

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    title: String,
    embed_url: String,
    position: i32,
    created_at: OffsetDateTime,
}

impl From<VideoRow> for VideoRecord {
    fn from(row: VideoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            embed_url: row.embed_url,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl VideosRepo for PostgresRepositories {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, RepoError> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, title, embed_url, position, created_at
            FROM videos
            ORDER BY position ASC, created_at DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(VideoRecord::from).collect())
    }

    async fn create_video(&self, params: CreateVideoParams) -> Result<VideoRecord, RepoError> {
        let CreateVideoParams {
            title,
            embed_url,
            position,
        } = params;

        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            INSERT INTO videos (id, title, embed_url, position, created_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING id, title, embed_url, position, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(embed_url)
        .bind(position)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(VideoRecord::from(row))
    }

    async fn update_video(&self, params: UpdateVideoParams) -> Result<VideoRecord, RepoError> {
        let UpdateVideoParams {
            id,
            title,
            embed_url,
            position,
        } = params;

        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            UPDATE videos
            SET title = $2,
                embed_url = $3,
                position = $4
            WHERE id = $1
            RETURNING id, title, embed_url, position, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(embed_url)
        .bind(position)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(VideoRecord::from(row))
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        expect_affected(result.rows_affected())
    }
}
