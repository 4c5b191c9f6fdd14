use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{BioRepo, RepoError},
    domain::entities::BioRecord,
};

use super::{PostgresRepositories, util::map_sqlx_error};

#[derive(sqlx::FromRow)]
struct BioRow {
    body: String,
    updated_at: OffsetDateTime,
}

impl From<BioRow> for BioRecord {
    fn from(row: BioRow) -> Self {
        Self {
            body: row.body,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BioRepo for PostgresRepositories {
    async fn load_bio(&self) -> Result<Option<BioRecord>, RepoError> {
        let row = sqlx::query_as::<_, BioRow>("SELECT body, updated_at FROM bio WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(BioRecord::from))
    }

    async fn save_bio(&self, body: String) -> Result<BioRecord, RepoError> {
        let row = sqlx::query_as::<_, BioRow>(
            r#"
            INSERT INTO bio (id, body, updated_at)
            VALUES (1, $1, now())
            ON CONFLICT (id) DO UPDATE
            SET body = EXCLUDED.body,
                updated_at = EXCLUDED.updated_at
            RETURNING body, updated_at
            "#,
        )
        .bind(body)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BioRecord::from(row))
    }
}
