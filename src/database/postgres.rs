use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::models::item::{Item, ItemPatch, NewItem};
use crate::database::store::{ItemStore, StoreError};
use crate::types::Category;

/// PostgreSQL-backed store with one table per category
#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Connect using the configured URL and pool settings, then make sure
    /// every category table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config.url.as_deref().ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
        let parsed = url::Url::parse(url).map_err(|_| StoreError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Connected to database {}{}",
            parsed.host_str().unwrap_or("localhost"),
            parsed.path()
        );

        let store = Self { pool };
        store.ensure_tables().await?;
        Ok(store)
    }

    /// Create category tables that do not exist yet. Existing tables are left alone.
    pub async fn ensure_tables(&self) -> Result<(), StoreError> {
        for category in Category::ALL {
            sqlx::query(&create_table_sql(category)).execute(&self.pool).await?;
            sqlx::query(&create_owner_index_sql(category)).execute(&self.pool).await?;
        }
        info!("Category tables ready");
        Ok(())
    }
}

fn create_table_sql(category: Category) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{}" (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            rating DOUBLE PRECISION NOT NULL,
            status TEXT NOT NULL,
            cover TEXT NOT NULL,
            user_id TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
        category.table_name()
    )
}

fn create_owner_index_sql(category: Category) -> String {
    let table = category.table_name();
    format!(r#"CREATE INDEX IF NOT EXISTS "{table}_user_id_idx" ON "{table}" (user_id)"#)
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list(&self, category: Category, owner: &str) -> Result<Vec<Item>, StoreError> {
        let sql = format!(
            r#"SELECT * FROM "{}" WHERE user_id = $1 ORDER BY created_at, id"#,
            category.table_name()
        );
        let rows = sqlx::query_as::<_, Item>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, category: Category, owner: &str, fields: NewItem) -> Result<Item, StoreError> {
        let item = Item::new(owner, fields);
        let sql = format!(
            r#"INSERT INTO "{}" (id, title, rating, status, cover, user_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
            category.table_name()
        );
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(item.id)
            .bind(&item.title)
            .bind(item.rating)
            .bind(&item.status)
            .bind(&item.cover)
            .bind(&item.user_id)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        category: Category,
        owner: &str,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Option<Item>, StoreError> {
        let sql = format!(
            r#"UPDATE "{}" SET
                   title = COALESCE($3, title),
                   rating = COALESCE($4, rating),
                   status = COALESCE($5, status),
                   cover = COALESCE($6, cover),
                   updated_at = now()
               WHERE id = $1 AND user_id = $2
               RETURNING *"#,
            category.table_name()
        );
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.title)
            .bind(patch.rating)
            .bind(patch.status)
            .bind(patch.cover)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, category: Category, owner: &str, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!(
            r#"DELETE FROM "{}" WHERE id = $1 AND user_id = $2"#,
            category.table_name()
        );
        let result = sqlx::query(&sql).bind(id).bind(owner).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
