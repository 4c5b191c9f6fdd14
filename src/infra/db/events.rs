use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateEventParams, EventsRepo, RepoError, UpdateEventParams},
    domain::entities::EventRecord,
};

use super::{
    PostgresRepositories,
    util::{expect_affected, map_sqlx_error},
};

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    venue: String,
    city: String,
    starts_at: OffsetDateTime,
    ticket_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            venue: row.venue,
            city: row.city,
            starts_at: row.starts_at,
            ticket_url: row.ticket_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EventsRepo for PostgresRepositories {
    async fn list_events(&self) -> Result<Vec<EventRecord>, RepoError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, venue, city, starts_at, ticket_url, created_at, updated_at
            FROM events
            ORDER BY starts_at ASC, id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn create_event(&self, params: CreateEventParams) -> Result<EventRecord, RepoError> {
        let CreateEventParams {
            title,
            venue,
            city,
            starts_at,
            ticket_url,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (
                id, title, venue, city, starts_at, ticket_url,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, title, venue, city, starts_at, ticket_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(venue)
        .bind(city)
        .bind(starts_at)
        .bind(ticket_url)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(EventRecord::from(row))
    }

    async fn update_event(&self, params: UpdateEventParams) -> Result<EventRecord, RepoError> {
        let UpdateEventParams {
            id,
            title,
            venue,
            city,
            starts_at,
            ticket_url,
        } = params;

        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET title = $2,
                venue = $3,
                city = $4,
                starts_at = $5,
                ticket_url = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, venue, city, starts_at, ticket_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(venue)
        .bind(city)
        .bind(starts_at)
        .bind(ticket_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(EventRecord::from(row))
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        expect_affected(result.rows_affected())
    }
}
