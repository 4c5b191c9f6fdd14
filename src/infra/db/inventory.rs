use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateInventoryParams, InventoryRepo, RepoError, UpdateInventoryParams,
    },
    domain::entities::InventoryItem,
};

use super::{
    PostgresRepositories,
    util::{expect_affected, map_sqlx_error},
};

#[derive(sqlx::FromRow)]
struct InventoryRow {
    id: Uuid,
    sku: String,
    name: String,
    price_cents: i64,
    quantity: i32,
    updated_at: OffsetDateTime,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: row.id,
            sku: row.sku,
            name: row.name,
            price_cents: row.price_cents,
            quantity: row.quantity,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl InventoryRepo for PostgresRepositories {
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, RepoError> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, sku, name, price_cents, quantity, updated_at
            FROM inventory
            ORDER BY sku
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    async fn create_item(&self, params: CreateInventoryParams) -> Result<InventoryItem, RepoError> {
        let CreateInventoryParams {
            sku,
            name,
            price_cents,
            quantity,
        } = params;

        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            INSERT INTO inventory (id, sku, name, price_cents, quantity, updated_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING id, sku, name, price_cents, quantity, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sku)
        .bind(name)
        .bind(price_cents)
        .bind(quantity)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(InventoryItem::from(row))
    }

    async fn update_item(&self, params: UpdateInventoryParams) -> Result<InventoryItem, RepoError> {
        let UpdateInventoryParams {
            id,
            sku,
            name,
            price_cents,
            quantity,
        } = params;

        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            UPDATE inventory
            SET sku = $2,
                name = $3,
                price_cents = $4,
                quantity = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING id, sku, name, price_cents, quantity, updated_at
            "#,
        )
        .bind(id)
        .bind(sku)
        .bind(name)
        .bind(price_cents)
        .bind(quantity)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(InventoryItem::from(row))
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        expect_affected(result.rows_affected())
    }
}
