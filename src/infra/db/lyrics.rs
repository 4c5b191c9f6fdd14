use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateLyricParams, LyricsRepo, RepoError, UpdateLyricParams},
    domain::entities::LyricRecord,
};

use super::{
    PostgresRepositories,
    util::{expect_affected, map_sqlx_error},
};

#[derive(sqlx::FromRow)]
struct LyricRow {
    id: Uuid,
    title: String,
    body: String,
    album: Option<String>,
    position: i32,
    created_at: OffsetDateTime,
}

impl From<LyricRow> for LyricRecord {
    fn from(row: LyricRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            album: row.album,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl LyricsRepo for PostgresRepositories {
    async fn list_lyrics(&self) -> Result<Vec<LyricRecord>, RepoError> {
        let rows = sqlx::query_as::<_, LyricRow>(
            r#"
            SELECT id, title, body, album, position, created_at
            FROM lyrics
            ORDER BY album NULLS LAST, position ASC, title
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LyricRecord::from).collect())
    }

    async fn create_lyric(&self, params: CreateLyricParams) -> Result<LyricRecord, RepoError> {
        let CreateLyricParams {
            title,
            body,
            album,
            position,
        } = params;

        let row = sqlx::query_as::<_, LyricRow>(
            r#"
            INSERT INTO lyrics (id, title, body, album, position, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING id, title, body, album, position, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(body)
        .bind(album)
        .bind(position)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(LyricRecord::from(row))
    }

    async fn update_lyric(&self, params: UpdateLyricParams) -> Result<LyricRecord, RepoError> {
        let UpdateLyricParams {
            id,
            title,
            body,
            album,
            position,
        } = params;

        let row = sqlx::query_as::<_, LyricRow>(
            r#"
            UPDATE lyrics
            SET title = $2,
                body = $3,
                album = $4,
                position = $5
            WHERE id = $1
            RETURNING id, title, body, album, position, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(album)
        .bind(position)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(LyricRecord::from(row))
    }

    async fn delete_lyric(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM lyrics WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        expect_affected(result.rows_affected())
    }
}
